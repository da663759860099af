//! services/api/src/web/config.rs
//!
//! Presentation-layer feature flags.

use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::FeatureFlags;
use crate::web::state::AppState;

#[derive(Serialize, ToSchema)]
pub struct FeatureFlagsResponse {
    pub flags: FeatureFlags,
}

/// Expose the named boolean toggles the client reads at startup.
#[utoipa::path(
    get,
    path = "/config/feature-flags",
    responses(
        (status = 200, description = "The current feature flags", body = FeatureFlagsResponse)
    )
)]
pub async fn feature_flags_handler(State(state): State<Arc<AppState>>) -> Json<FeatureFlagsResponse> {
    Json(FeatureFlagsResponse {
        flags: state.config.feature_flags,
    })
}
