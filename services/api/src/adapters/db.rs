//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `SermonRepository` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use logos_core::domain::{Artifact, SermonContent, SermonMetadata, UsageSnapshot, User};
use logos_core::outline::Outline;
use logos_core::period::UsagePeriod;
use logos_core::ports::{
    PortError, PortResult, SermonRepository, FREE_SERMON_LIMIT, SERMON_COUNTER_KEY,
};
use serde_json::Value;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `SermonRepository` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
    name: String,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            email: self.email,
            name: self.name,
        }
    }
}

#[derive(FromRow)]
struct ArtifactRecord {
    id: Uuid,
    user_id: Uuid,
    prompt: String,
    content: Value,
    metadata: Value,
    share_token: Option<Uuid>,
    created_at: DateTime<Utc>,
}
impl ArtifactRecord {
    /// Re-materialises the stored JSON. Content that no longer deserialises
    /// into an outline becomes a degraded raw-wrapped artifact instead of a
    /// read error; unreadable metadata degrades to its empty default.
    fn to_domain(self) -> Artifact {
        let content = match serde_json::from_value::<Outline>(self.content.clone()) {
            Ok(outline) => SermonContent::Outline(outline),
            Err(_) => SermonContent::Raw(self.content),
        };
        let metadata = serde_json::from_value::<SermonMetadata>(self.metadata).unwrap_or_default();
        Artifact {
            id: self.id,
            user_id: self.user_id,
            prompt: self.prompt,
            content,
            metadata,
            share_token: self.share_token,
            created_at: self.created_at,
        }
    }
}

const ARTIFACT_COLUMNS: &str =
    "id, user_id, prompt, content, metadata, share_token, created_at";

//=========================================================================================
// Quota Admission (transaction-scoped)
//=========================================================================================

/// Admits one generation against the caller's monthly quota and increments
/// the counter, inside the transaction the caller opened.
///
/// The counter row is read with `FOR UPDATE`, so concurrent admissions for
/// the same user serialise on the row instead of interleaving the check and
/// the increment. First use in a period goes through an idempotent
/// `ON CONFLICT DO NOTHING` insert followed by a fresh locked read, so
/// concurrent first-callers cannot create two rows. On `QuotaExceeded`
/// nothing has been written; the caller's rollback releases the lock.
async fn consume_free_plan_usage(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> PortResult<UsageSnapshot> {
    let period = UsagePeriod::containing(Utc::now());

    let select_for_update = "SELECT id, counter_value \
         FROM usage_counters \
        WHERE user_id = $1 \
          AND counter_key = $2 \
          AND period_start = $3 \
          FOR UPDATE";

    let mut counter_row: Option<(i64, i32)> = sqlx::query_as(select_for_update)
        .bind(user_id)
        .bind(SERMON_COUNTER_KEY)
        .bind(period.start)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

    if counter_row.is_none() {
        sqlx::query(
            "INSERT INTO usage_counters (user_id, counter_key, counter_value, period_start, period_end) \
             VALUES ($1, $2, 0, $3, $4) \
             ON CONFLICT (user_id, counter_key, period_start) DO NOTHING",
        )
        .bind(user_id)
        .bind(SERMON_COUNTER_KEY)
        .bind(period.start)
        .bind(period.end)
        .execute(&mut *conn)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        counter_row = sqlx::query_as(select_for_update)
            .bind(user_id)
            .bind(SERMON_COUNTER_KEY)
            .bind(period.start)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
    }

    let (counter_id, counter_value) = counter_row
        .ok_or_else(|| PortError::Unexpected("usage counter could not be initialised".to_string()))?;

    if counter_value >= FREE_SERMON_LIMIT {
        return Err(PortError::QuotaExceeded {
            used: counter_value,
            limit: FREE_SERMON_LIMIT,
        });
    }

    let (used,): (i32,) = sqlx::query_as(
        "UPDATE usage_counters \
            SET counter_value = counter_value + 1, \
                updated_at = NOW() \
          WHERE id = $1 \
          RETURNING counter_value",
    )
    .bind(counter_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| PortError::Unexpected(e.to_string()))?;

    Ok(UsageSnapshot {
        used,
        limit: FREE_SERMON_LIMIT,
    })
}

//=========================================================================================
// `SermonRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl SermonRepository for DbAdapter {
    async fn get_or_create_user(&self, user_id: Uuid) -> PortResult<User> {
        sqlx::query(
            "INSERT INTO users (id, email, name) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(user_id)
        .bind(format!("guest+{user_id}@logosai.app"))
        .bind("Visitante Logos AI")
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let record: UserRecord =
            sqlx::query_as("SELECT id, email, name FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| match e {
                    sqlx::Error::RowNotFound => {
                        PortError::NotFound(format!("User {} not found", user_id))
                    }
                    _ => PortError::Unexpected(e.to_string()),
                })?;

        Ok(record.to_domain())
    }

    async fn record_generation(
        &self,
        user_id: Uuid,
        prompt: &str,
        outline: &Outline,
        metadata: &SermonMetadata,
    ) -> PortResult<(Artifact, UsageSnapshot)> {
        let content_json =
            serde_json::to_value(outline).map_err(|e| PortError::Unexpected(e.to_string()))?;
        let metadata_json =
            serde_json::to_value(metadata).map_err(|e| PortError::Unexpected(e.to_string()))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Any early return below drops `tx`, which rolls back the admission
        // together with the insert.
        let usage = consume_free_plan_usage(&mut tx, user_id).await?;

        let artifact_id = Uuid::new_v4();
        let (id, created_at): (Uuid, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO artifacts (id, user_id, prompt, content, metadata) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, created_at",
        )
        .bind(artifact_id)
        .bind(user_id)
        .bind(prompt)
        .bind(&content_json)
        .bind(&metadata_json)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let artifact = Artifact {
            id,
            user_id,
            prompt: prompt.to_string(),
            content: SermonContent::Outline(outline.clone()),
            metadata: metadata.clone(),
            share_token: None,
            created_at,
        };
        Ok((artifact, usage))
    }

    async fn find_artifact(&self, artifact_id: Uuid) -> PortResult<Artifact> {
        let record: ArtifactRecord = sqlx::query_as(&format!(
            "SELECT {ARTIFACT_COLUMNS} FROM artifacts WHERE id = $1"
        ))
        .bind(artifact_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?
        .ok_or_else(|| PortError::NotFound(format!("Artifact {} not found", artifact_id)))?;

        Ok(record.to_domain())
    }

    async fn find_by_share_token(&self, token: Uuid) -> PortResult<Artifact> {
        let record: ArtifactRecord = sqlx::query_as(&format!(
            "SELECT {ARTIFACT_COLUMNS} FROM artifacts WHERE share_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?
        .ok_or_else(|| PortError::NotFound(format!("Shared artifact {} not found", token)))?;

        Ok(record.to_domain())
    }

    async fn set_share_token(&self, artifact_id: Uuid, token: Option<Uuid>) -> PortResult<()> {
        let result = sqlx::query("UPDATE artifacts SET share_token = $1 WHERE id = $2")
            .bind(token)
            .bind(artifact_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Artifact {} not found",
                artifact_id
            )));
        }
        Ok(())
    }
}
