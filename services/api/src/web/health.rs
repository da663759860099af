//! services/api/src/web/health.rs
//!
//! Liveness endpoint.

use axum::{extract::State, response::Json};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::web::state::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: f64,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "The service is alive", body = HealthResponse)
    )
)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}
