//! services/api/src/web/share.rs
//!
//! Handlers for the owner-managed share state and the public share path.
//!
//! The public lookup is deliberately unauthenticated: holding the token IS
//! the capability. Issuing and revoking the token stay owner-gated.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use logos_core::access::require_artifact_for_user;
use logos_core::domain::Artifact;
use logos_core::ports::PortError;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::state::AppState;

//=========================================================================================
// API Response Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct ShareStateResponse {
    pub shared: bool,
    #[serde(rename = "shareId", skip_serializing_if = "Option::is_none")]
    pub share_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ShareStateResponse {
    fn for_artifact(artifact: &Artifact) -> Self {
        match artifact.share_token {
            Some(token) => ShareStateResponse {
                shared: true,
                share_id: Some(token),
                url: Some(format!("/share/{token}")),
            },
            None => ShareStateResponse {
                shared: false,
                share_id: None,
                url: None,
            },
        }
    }
}

/// The payload served on the public share path; carries no owner identity.
#[derive(Serialize, ToSchema)]
pub struct SharedSermonResponse {
    pub id: Uuid,
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

/// Read the share state of a sermon. Owner-only.
#[utoipa::path(
    get,
    path = "/share/{id}",
    responses(
        (status = 200, description = "Current share state", body = ShareStateResponse),
        (status = 400, description = "Malformed artifact id"),
        (status = 403, description = "Caller does not own the artifact"),
        (status = 404, description = "No such artifact")
    ),
    params(
        ("id" = String, Path, description = "The artifact id"),
        ("x-user-id" = String, Header, description = "The caller's user id")
    )
)]
pub async fn share_status_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let caller = headers.get("x-user-id").and_then(|v| v.to_str().ok());
    let artifact = require_artifact_for_user(state.repository.as_ref(), &id, caller).await?;
    Ok(Json(ShareStateResponse::for_artifact(&artifact)))
}

/// Issue a fresh public share token for a sermon. Owner-only.
#[utoipa::path(
    post,
    path = "/share/{id}",
    responses(
        (status = 201, description = "Sharing enabled", body = ShareStateResponse),
        (status = 400, description = "Malformed artifact id"),
        (status = 403, description = "Caller does not own the artifact"),
        (status = 404, description = "No such artifact")
    ),
    params(
        ("id" = String, Path, description = "The artifact id"),
        ("x-user-id" = String, Header, description = "The caller's user id")
    )
)]
pub async fn enable_share_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let caller = headers.get("x-user-id").and_then(|v| v.to_str().ok());
    let artifact = require_artifact_for_user(state.repository.as_ref(), &id, caller).await?;

    let token = Uuid::new_v4();
    state
        .repository
        .set_share_token(artifact.id, Some(token))
        .await?;

    let response = ShareStateResponse {
        shared: true,
        share_id: Some(token),
        url: Some(format!("/share/{token}")),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Revoke the public share token of a sermon. Owner-only.
#[utoipa::path(
    delete,
    path = "/share/{id}",
    responses(
        (status = 204, description = "Sharing disabled"),
        (status = 400, description = "Malformed artifact id"),
        (status = 403, description = "Caller does not own the artifact"),
        (status = 404, description = "No such artifact")
    ),
    params(
        ("id" = String, Path, description = "The artifact id"),
        ("x-user-id" = String, Header, description = "The caller's user id")
    )
)]
pub async fn disable_share_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let caller = headers.get("x-user-id").and_then(|v| v.to_str().ok());
    let artifact = require_artifact_for_user(state.repository.as_ref(), &id, caller).await?;
    state.repository.set_share_token(artifact.id, None).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Read a publicly shared sermon by its token. Unauthenticated by design.
#[utoipa::path(
    get,
    path = "/share/public/{token}",
    responses(
        (status = 200, description = "The shared sermon", body = SharedSermonResponse),
        (status = 400, description = "Malformed share token"),
        (status = 404, description = "No sermon is shared under this token")
    ),
    params(
        ("token" = String, Path, description = "The public share token")
    )
)]
pub async fn public_share_handler(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let token = Uuid::parse_str(&token).map_err(|_| {
        PortError::InvalidArgument("Link de compartilhamento inválido.".to_string())
    })?;

    let artifact = state.repository.find_by_share_token(token).await?;
    let response = SharedSermonResponse {
        id: artifact.id,
        created_at: artifact.created_at,
        metadata: serde_json::to_value(&artifact.metadata)
            .map_err(|e| ApiError::Internal(e.to_string()))?,
        sermon: artifact.content.to_json(),
    };
    Ok(Json(response))
}
