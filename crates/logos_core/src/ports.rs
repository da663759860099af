//! crates/logos_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like databases
//! or text-generation APIs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Artifact, SermonMetadata, UsageSnapshot, User};
use crate::outline::{GenerationRequest, Outline};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by all port operations.
///
/// Every variant except `Unexpected` is a normal, user-visible outcome with
/// a dedicated HTTP mapping; `Unexpected` covers storage and transport
/// faults, which are logged and surfaced generically.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// A malformed identifier or a missing required field.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The caller supplied no usable identity.
    #[error("caller identity is missing or malformed")]
    Unauthenticated,
    /// The caller is authenticated but does not own the artifact.
    #[error("artifact is not available to this caller")]
    Forbidden,
    #[error("not found: {0}")]
    NotFound(String),
    /// The monthly free-tier quota is exhausted. An expected outcome, not a
    /// fault; carries the counts the caller needs for its upgrade message.
    #[error("monthly free quota reached ({used}/{limit})")]
    QuotaExceeded { used: i32, limit: i32 },
    /// Stored artifact content that cannot be rendered.
    #[error("stored sermon content is not a well-formed outline")]
    UnprocessableContent,
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("an unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// How many outlines the free tier grants per user per calendar month.
pub const FREE_SERMON_LIMIT: i32 = 10;

/// The single quota class this service meters.
pub const SERMON_COUNTER_KEY: &str = "sermon_free_monthly";

/// Durable storage for users, artifacts, and the monthly usage ledger.
///
/// Quota admission is deliberately not a standalone operation on this port:
/// the check and the increment only exist fused inside
/// [`record_generation`](SermonRepository::record_generation), so no caller
/// can interleave them.
#[async_trait]
pub trait SermonRepository: Send + Sync {
    /// Idempotent "upsert on first sight" keyed by the supplied id.
    async fn get_or_create_user(&self, user_id: Uuid) -> PortResult<User>;

    /// Records one successful generation as a single atomic unit: admits the
    /// user against the monthly quota, increments the counter by exactly
    /// one, and persists the artifact inside one transactional boundary.
    /// Under concurrent invocations for the same user each call
    /// either fails with [`PortError::QuotaExceeded`] and mutates nothing,
    /// or succeeds with a `used` value no two successes share.
    async fn record_generation(
        &self,
        user_id: Uuid,
        prompt: &str,
        outline: &Outline,
        metadata: &SermonMetadata,
    ) -> PortResult<(Artifact, UsageSnapshot)>;

    async fn find_artifact(&self, artifact_id: Uuid) -> PortResult<Artifact>;

    /// Unauthenticated lookup by share token; the token is a read-capability,
    /// so no ownership check belongs here.
    async fn find_by_share_token(&self, token: Uuid) -> PortResult<Artifact>;

    /// Sets or clears (`None`) the public share token of an artifact.
    async fn set_share_token(&self, artifact_id: Uuid, token: Option<Uuid>) -> PortResult<()>;
}

/// The external text-generation collaborator.
#[async_trait]
pub trait SermonGenerator: Send + Sync {
    /// Produces a structurally valid outline for the request. Callers treat
    /// any failure as recoverable and fall back to the canned template.
    async fn generate_outline(&self, request: &GenerationRequest) -> PortResult<Outline>;
}
