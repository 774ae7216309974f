//! phub-api library interface
//!
//! Exposes the consolidation pipeline and HTTP router for integration testing.

pub mod adapters;
pub mod api;
pub mod consolidate;
pub mod dataset;
pub mod error;
pub mod scoring;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::dataset::PropertyStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Injected property data provider
    pub store: Arc<dyn PropertyStore>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: Arc<dyn PropertyStore>) -> Self {
        Self {
            store,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// CORS is permissive on every route; the consolidation output is consumed by
/// a browser frontend served from a different origin.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::property_routes())
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
