//! crates/logos_core/src/access.rs
//!
//! The single authorization gate for owner-facing artifact operations.

use uuid::Uuid;

use crate::domain::Artifact;
use crate::ports::{PortError, PortResult, SermonRepository};

/// Resolves an artifact and enforces that the caller owns it.
///
/// Every owner-facing path (reading the outline, exporting it, viewing or
/// managing its share state) goes through this one gate. The
/// checks run in a fixed order: a malformed artifact id is
/// [`PortError::InvalidArgument`], a missing or malformed caller id is
/// [`PortError::Unauthenticated`], an unknown artifact is
/// [`PortError::NotFound`], and an owner mismatch is
/// [`PortError::Forbidden`]. Ownership is exact-match; there are no roles
/// and no overrides.
pub async fn require_artifact_for_user(
    repository: &dyn SermonRepository,
    artifact_id: &str,
    caller: Option<&str>,
) -> PortResult<Artifact> {
    let artifact_id = Uuid::parse_str(artifact_id)
        .map_err(|_| PortError::InvalidArgument("Identificador inválido.".to_string()))?;

    let caller = caller
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or(PortError::Unauthenticated)?;

    let artifact = repository.find_artifact(artifact_id).await?;

    if artifact.user_id != caller {
        return Err(PortError::Forbidden);
    }

    Ok(artifact)
}
