//! Per-source schema adapters
//!
//! Each adapter is a pure function `(property_id, raw payload) -> CanonicalProperty`.
//! Sources omit and relocate fields across payload vintages, so adapters never
//! fail: every lookup degrades to `None`/empty. Absent containers are treated
//! as empty, extracted strings are kept verbatim apart from secondary-A's
//! markup stripping, and per-source image caps silently drop extra entries.

mod primary;
mod secondary_a;
mod secondary_y;
mod value_ext;

pub use primary::map_primary;
pub use secondary_a::map_secondary_a;
pub use secondary_y::map_secondary_y;

/// Provenance tag of the primary source (merge ground truth)
pub const SOURCE_PRIMARY: &str = "primary";
/// Provenance tag of the first secondary listing source
pub const SOURCE_SECONDARY_A: &str = "secondary-A";
/// Provenance tag of the second secondary listing source
pub const SOURCE_SECONDARY_Y: &str = "secondary-Y";
