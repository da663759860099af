#![allow(dead_code)]
//! In-memory reference implementation of [`SermonRepository`].
//!
//! Mirrors the semantics the Postgres adapter provides with row locking:
//! one counter per (user, key, period-start), admission and artifact
//! persistence fused into a single critical section, and an injectable
//! clock for period-rollover tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use logos_core::domain::{Artifact, SermonContent, SermonMetadata, UsageSnapshot, User};
use logos_core::outline::Outline;
use logos_core::period::UsagePeriod;
use logos_core::ports::{
    PortError, PortResult, SermonRepository, FREE_SERMON_LIMIT, SERMON_COUNTER_KEY,
};
use uuid::Uuid;

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    artifacts: HashMap<Uuid, Artifact>,
    counters: HashMap<(Uuid, &'static str, DateTime<Utc>), i32>,
}

pub struct InMemoryRepository {
    state: Mutex<State>,
    /// When set, admission attributes requests to this instant instead of
    /// the real wall clock.
    frozen_now: Mutex<Option<DateTime<Utc>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        InMemoryRepository {
            state: Mutex::new(State::default()),
            frozen_now: Mutex::new(None),
        }
    }

    pub fn set_now(&self, at: DateTime<Utc>) {
        *self.frozen_now.lock().unwrap() = Some(at);
    }

    fn now(&self) -> DateTime<Utc> {
        self.frozen_now.lock().unwrap().unwrap_or_else(Utc::now)
    }

    pub fn artifact_count(&self) -> usize {
        self.state.lock().unwrap().artifacts.len()
    }
}

#[async_trait]
impl SermonRepository for InMemoryRepository {
    async fn get_or_create_user(&self, user_id: Uuid) -> PortResult<User> {
        let mut state = self.state.lock().unwrap();
        let user = state.users.entry(user_id).or_insert_with(|| User {
            id: user_id,
            email: format!("guest+{user_id}@logosai.app"),
            name: "Visitante Logos AI".to_string(),
        });
        Ok(user.clone())
    }

    async fn record_generation(
        &self,
        user_id: Uuid,
        prompt: &str,
        outline: &Outline,
        metadata: &SermonMetadata,
    ) -> PortResult<(Artifact, UsageSnapshot)> {
        let now = self.now();
        let period = UsagePeriod::containing(now);

        // One lock covers check, increment, and insert, the same way the
        // Postgres adapter's transaction does.
        let mut state = self.state.lock().unwrap();
        let count = state
            .counters
            .entry((user_id, SERMON_COUNTER_KEY, period.start))
            .or_insert(0);

        if *count >= FREE_SERMON_LIMIT {
            return Err(PortError::QuotaExceeded {
                used: *count,
                limit: FREE_SERMON_LIMIT,
            });
        }

        *count += 1;
        let used = *count;

        let artifact = Artifact {
            id: Uuid::new_v4(),
            user_id,
            prompt: prompt.to_string(),
            content: SermonContent::Outline(outline.clone()),
            metadata: metadata.clone(),
            share_token: None,
            created_at: now,
        };
        state.artifacts.insert(artifact.id, artifact.clone());

        Ok((
            artifact,
            UsageSnapshot {
                used,
                limit: FREE_SERMON_LIMIT,
            },
        ))
    }

    async fn find_artifact(&self, artifact_id: Uuid) -> PortResult<Artifact> {
        self.state
            .lock()
            .unwrap()
            .artifacts
            .get(&artifact_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("artifact {artifact_id}")))
    }

    async fn find_by_share_token(&self, token: Uuid) -> PortResult<Artifact> {
        self.state
            .lock()
            .unwrap()
            .artifacts
            .values()
            .find(|artifact| artifact.share_token == Some(token))
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("share token {token}")))
    }

    async fn set_share_token(&self, artifact_id: Uuid, token: Option<Uuid>) -> PortResult<()> {
        let mut state = self.state.lock().unwrap();
        let artifact = state
            .artifacts
            .get_mut(&artifact_id)
            .ok_or_else(|| PortError::NotFound(format!("artifact {artifact_id}")))?;
        artifact.share_token = token;
        Ok(())
    }
}

pub fn sample_request() -> logos_core::outline::GenerationRequest {
    logos_core::outline::GenerationRequest {
        category: "Expositivo".to_string(),
        theme: "Salmo 23".to_string(),
        depth: "curto".to_string(),
    }
}

pub fn sample_metadata() -> SermonMetadata {
    let request = sample_request();
    SermonMetadata {
        kind: "Sermão".to_string(),
        category: request.category,
        theme: request.theme,
        depth: request.depth,
    }
}
