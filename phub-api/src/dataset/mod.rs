//! Property dataset access
//!
//! The consolidation core never reads the filesystem directly; it receives
//! already-parsed payloads through the [`PropertyStore`] capability, so tests
//! can inject fixture JSON and the core stays hermetic.

pub mod fs_store;

pub use fs_store::FsPropertyStore;

use async_trait::async_trait;
use phub_common::Result;
use serde_json::Value;

/// Raw payloads for one property, one per source, already parsed
#[derive(Debug, Clone)]
pub struct SourcePayloads {
    pub primary: Value,
    pub secondary_a: Value,
    pub secondary_y: Value,
}

/// Data provider for scraped property payloads
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Load the three source payloads for a property.
    ///
    /// Returns `Ok(None)` when the property directory or any of the three
    /// source captures cannot be located. Consolidation requires all three
    /// sources; the boundary maps `None` to a not-found response and never
    /// invokes the core with a partial set.
    async fn load(&self, property_id: &str) -> Result<Option<SourcePayloads>>;

    /// List ids of properties that have all three sources available
    async fn list(&self) -> Result<Vec<String>>;
}
