//! services/api/src/web/export.rs
//!
//! Handler for exporting a stored sermon as a downloadable document.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::IntoResponse,
};
use logos_core::access::require_artifact_for_user;
use logos_core::ports::PortError;
use std::sync::Arc;

use crate::error::ApiError;
use crate::export::{build_filename, render, ExportFormat};
use crate::web::state::AppState;

/// Export a stored sermon as `{id}.{format}`, format one of pdf, docx, md.
/// Owner-only; degraded artifacts cannot be rendered.
#[utoipa::path(
    get,
    path = "/export/{file}",
    responses(
        (status = 200, description = "The rendered document as an attachment"),
        (status = 400, description = "Malformed id or unsupported format"),
        (status = 403, description = "Caller does not own the artifact"),
        (status = 404, description = "No such artifact"),
        (status = 422, description = "Stored content is not a well-formed outline")
    ),
    params(
        ("file" = String, Path, description = "Artifact id plus extension, e.g. `<uuid>.pdf`"),
        ("x-user-id" = String, Header, description = "The caller's user id")
    )
)]
pub async fn export_sermon_handler(
    State(state): State<Arc<AppState>>,
    Path(file): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let (id, extension) = file
        .rsplit_once('.')
        .ok_or_else(|| PortError::UnsupportedFormat(file.clone()))?;
    let format: ExportFormat = extension.parse().map_err(ApiError::Port)?;

    let caller = headers.get("x-user-id").and_then(|v| v.to_str().ok());
    let artifact = require_artifact_for_user(state.repository.as_ref(), id, caller).await?;

    let outline = artifact
        .content
        .as_outline()
        .ok_or(PortError::UnprocessableContent)?;
    let bytes = render(outline, &artifact.metadata, format)?;

    let filename = build_filename(&artifact.metadata, artifact.id);
    let disposition = format!(
        "attachment; filename=\"{}.{}\"",
        filename,
        format.extension()
    );
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
