//! services/api/src/web/sermons.rs
//!
//! Handlers for sermon generation and owner reads.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use logos_core::access::require_artifact_for_user;
use logos_core::domain::{SermonMetadata, UsageSnapshot};
use logos_core::outline::{GenerationRequest, Outline};
use logos_core::ports::PortError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::state::AppState;

//=========================================================================================
// API Request and Response Payload Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct GenerateSermonRequest {
    pub category: Option<String>,
    pub theme: Option<String>,
    pub depth: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct UsageBody {
    pub used: i32,
    pub limit: i32,
}

impl From<UsageSnapshot> for UsageBody {
    fn from(snapshot: UsageSnapshot) -> Self {
        UsageBody {
            used: snapshot.used,
            limit: snapshot.limit,
        }
    }
}

/// The payload sent after a successful generation.
#[derive(Serialize, ToSchema)]
pub struct GenerateSermonResponse {
    pub id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub usage: UsageBody,
    #[schema(value_type = Object)]
    pub sermon: Value,
    #[schema(value_type = Object)]
    pub metadata: Value,
}

/// The payload for owner reads of a stored sermon.
#[derive(Serialize, ToSchema)]
pub struct SermonResponse {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = Object)]
    pub metadata: Value,
    #[schema(value_type = Object)]
    pub sermon: Value,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Resolves the caller-supplied identity, or mints a fresh one when it is
/// absent or malformed.
fn resolve_user_id(supplied: Option<&str>) -> Uuid {
    supplied
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .unwrap_or_else(Uuid::new_v4)
}

/// Generate a sermon outline against the caller's monthly free quota.
#[utoipa::path(
    post,
    path = "/generate",
    request_body = GenerateSermonRequest,
    responses(
        (status = 201, description = "Sermon generated and persisted", body = GenerateSermonResponse),
        (status = 400, description = "Missing category or theme"),
        (status = 402, description = "Monthly free quota exhausted"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn generate_sermon_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateSermonRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let category = body.category.as_deref().map(str::trim).unwrap_or_default();
    let theme = body.theme.as_deref().map(str::trim).unwrap_or_default();
    if category.is_empty() || theme.is_empty() {
        return Err(ApiError::Port(PortError::InvalidArgument(
            "category e theme são obrigatórios.".to_string(),
        )));
    }

    let user = state
        .repository
        .get_or_create_user(resolve_user_id(body.user_id.as_deref()))
        .await?;

    let request = GenerationRequest {
        category: category.to_string(),
        theme: theme.to_string(),
        depth: body
            .depth
            .as_deref()
            .map(str::trim)
            .filter(|depth| !depth.is_empty())
            .unwrap_or("curto")
            .to_string(),
    };
    let prompt = request.prompt();

    // Generation never fails the request: any collaborator trouble falls
    // back to the canned template.
    let outline = match state.generator.generate_outline(&request).await {
        Ok(outline) => outline,
        Err(cause) => {
            warn!("sermon generator unavailable, serving template fallback: {cause}");
            Outline::fallback(&request)
        }
    };

    let metadata = SermonMetadata {
        kind: "Sermão".to_string(),
        category: request.category.clone(),
        theme: request.theme.clone(),
        depth: request.depth.clone(),
    };

    let (artifact, usage) = state
        .repository
        .record_generation(user.id, &prompt, &outline, &metadata)
        .await?;

    let response = GenerateSermonResponse {
        id: artifact.id,
        created_at: artifact.created_at,
        user_id: user.id,
        usage: usage.into(),
        sermon: artifact.content.to_json(),
        metadata: serde_json::to_value(&metadata)
            .map_err(|e| ApiError::Internal(e.to_string()))?,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Read a stored sermon. Owner-only.
#[utoipa::path(
    get,
    path = "/sermon/{id}",
    responses(
        (status = 200, description = "The stored sermon", body = SermonResponse),
        (status = 400, description = "Malformed artifact id"),
        (status = 403, description = "Caller does not own the artifact"),
        (status = 404, description = "No such artifact")
    ),
    params(
        ("id" = String, Path, description = "The artifact id"),
        ("x-user-id" = String, Header, description = "The caller's user id")
    )
)]
pub async fn get_sermon_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let caller = headers.get("x-user-id").and_then(|v| v.to_str().ok());
    let artifact = require_artifact_for_user(state.repository.as_ref(), &id, caller).await?;

    let response = SermonResponse {
        id: artifact.id,
        user_id: artifact.user_id,
        created_at: artifact.created_at,
        metadata: serde_json::to_value(&artifact.metadata)
            .map_err(|e| ApiError::Internal(e.to_string()))?,
        sermon: artifact.content.to_json(),
    };
    Ok(Json(response))
}
