//! # Property Hub Common Library
//!
//! Shared code for the Property Hub services including:
//! - Canonical property model (the source-agnostic record every adapter produces)
//! - Common error types
//! - Configuration loading

pub mod config;
pub mod error;
pub mod model;

pub use error::{Error, Result};
pub use model::{CanonicalAddress, CanonicalImage, CanonicalProperty, NearbyAttraction};
