//! Property listing and consolidation endpoints
//!
//! GET /properties lists ids with all three sources available; GET
//! /properties/:id runs the three adapters and the consolidation engine over
//! the freshly loaded payloads. Nothing is cached or stored — every response
//! is computed per request.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::adapters::{map_primary, map_secondary_a, map_secondary_y};
use crate::consolidate::{self, Consolidation};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /properties response
#[derive(Debug, Serialize)]
pub struct PropertyListResponse {
    pub properties: Vec<String>,
}

/// GET /properties
pub async fn list_properties(
    State(state): State<AppState>,
) -> ApiResult<Json<PropertyListResponse>> {
    let properties = state.store.list().await?;
    Ok(Json(PropertyListResponse { properties }))
}

/// GET /properties/:id
///
/// 404 when the property directory or any of the three source captures is
/// missing; consolidation never runs on a partial source set.
pub async fn get_property(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
) -> ApiResult<Json<Consolidation>> {
    let Some(payloads) = state.store.load(&property_id).await? else {
        return Err(ApiError::NotFound(format!(
            "Property {} not found or incomplete source captures",
            property_id
        )));
    };

    let primary = map_primary(&property_id, &payloads.primary);
    let secondary_a = map_secondary_a(&property_id, &payloads.secondary_a);
    let secondary_y = map_secondary_y(&property_id, &payloads.secondary_y);

    let result = consolidate::consolidate(primary, secondary_a, secondary_y);

    tracing::info!(
        property_id = %property_id,
        overall_vs_a = result.comparison.primary_vs_secondary_a.overall,
        overall_vs_y = result.comparison.primary_vs_secondary_y.overall,
        "Consolidated property"
    );

    Ok(Json(result))
}

/// Build property routes
pub fn property_routes() -> Router<AppState> {
    Router::new()
        .route("/properties", get(list_properties))
        .route("/properties/:id", get(get_property))
}
