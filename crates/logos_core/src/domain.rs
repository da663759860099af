//! crates/logos_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or HTTP framework.

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::outline::Outline;

/// Represents a user of the service.
///
/// Users are created lazily on their first generation request with a
/// synthesised guest identity; the id is caller-supplied or server-generated
/// and never changes afterwards.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// One persisted generated sermon outline, together with its ownership,
/// the exact prompt that produced it, and the optional public share token.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub id: Uuid,
    pub user_id: Uuid,
    pub prompt: String,
    pub content: SermonContent,
    pub metadata: SermonMetadata,
    pub share_token: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// The stored sermon payload.
///
/// Reads never fail on malformed content: anything that does not
/// re-materialise into an [`Outline`] is surfaced as a degraded artifact
/// wrapping the raw JSON payload.
#[derive(Debug, Clone)]
pub enum SermonContent {
    Outline(Outline),
    Raw(Value),
}

impl SermonContent {
    pub fn as_outline(&self) -> Option<&Outline> {
        match self {
            SermonContent::Outline(outline) => Some(outline),
            SermonContent::Raw(_) => None,
        }
    }

    /// The JSON payload as served to clients, structurally identical to what
    /// was stored. Degraded content is wrapped under a `raw` key.
    pub fn to_json(&self) -> Value {
        match self {
            SermonContent::Outline(outline) => {
                serde_json::to_value(outline).unwrap_or(Value::Null)
            }
            SermonContent::Raw(raw) => {
                Value::Object([("raw".to_string(), raw.clone())].into_iter().collect())
            }
        }
    }
}

/// Request-level metadata persisted alongside every artifact.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SermonMetadata {
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub theme: String,
    pub depth: String,
}

/// A point-in-time view of a user's monthly free-tier consumption,
/// returned by every successful admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct UsageSnapshot {
    pub used: i32,
    pub limit: i32,
}
