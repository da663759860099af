//! Quota admission properties: monotonicity, concurrency safety, and
//! calendar-month rollover.

mod support;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::TimeZone;
use chrono::Utc;
use futures::future::join_all;
use logos_core::outline::Outline;
use logos_core::ports::{PortError, SermonRepository, FREE_SERMON_LIMIT};
use support::{sample_metadata, sample_request, InMemoryRepository};
use uuid::Uuid;

#[tokio::test]
async fn counter_tracks_successful_generations_exactly() {
    let repo = InMemoryRepository::new();
    let user = Uuid::new_v4();
    let request = sample_request();
    let outline = Outline::fallback(&request);

    for expected in 1..=FREE_SERMON_LIMIT {
        let (_, usage) = repo
            .record_generation(user, &request.prompt(), &outline, &sample_metadata())
            .await
            .unwrap();
        assert_eq!(usage.used, expected);
        assert_eq!(usage.limit, FREE_SERMON_LIMIT);
    }

    let err = repo
        .record_generation(user, &request.prompt(), &outline, &sample_metadata())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PortError::QuotaExceeded { used: 10, limit: 10 }
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn fifty_concurrent_requests_admit_exactly_ten() {
    let repo = Arc::new(InMemoryRepository::new());
    let user = Uuid::new_v4();
    let request = sample_request();
    let outline = Outline::fallback(&request);

    let tasks = (0..50).map(|_| {
        let repo = Arc::clone(&repo);
        let prompt = request.prompt();
        let outline = outline.clone();
        tokio::spawn(async move {
            repo.record_generation(user, &prompt, &outline, &sample_metadata())
                .await
        })
    });
    let outcomes: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let mut used_values = HashSet::new();
    let mut rejections = 0;
    for outcome in outcomes {
        match outcome {
            Ok((_, usage)) => {
                assert!(
                    used_values.insert(usage.used),
                    "duplicate used value {}",
                    usage.used
                );
            }
            Err(PortError::QuotaExceeded { used, limit }) => {
                assert_eq!(used, FREE_SERMON_LIMIT);
                assert_eq!(limit, FREE_SERMON_LIMIT);
                rejections += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(used_values, (1..=FREE_SERMON_LIMIT).collect::<HashSet<_>>());
    assert_eq!(rejections, 40);
    // Rejected requests leave no artifact behind.
    assert_eq!(repo.artifact_count(), FREE_SERMON_LIMIT as usize);
}

#[tokio::test]
async fn users_do_not_share_counters() {
    let repo = InMemoryRepository::new();
    let request = sample_request();
    let outline = Outline::fallback(&request);

    let first = Uuid::new_v4();
    for _ in 0..FREE_SERMON_LIMIT {
        repo.record_generation(first, &request.prompt(), &outline, &sample_metadata())
            .await
            .unwrap();
    }

    let second = Uuid::new_v4();
    let (_, usage) = repo
        .record_generation(second, &request.prompt(), &outline, &sample_metadata())
        .await
        .unwrap();
    assert_eq!(usage.used, 1);
}

#[tokio::test]
async fn exhausted_user_generates_again_after_month_rollover() {
    let repo = InMemoryRepository::new();
    let user = Uuid::new_v4();
    let request = sample_request();
    let outline = Outline::fallback(&request);

    repo.set_now(Utc.with_ymd_and_hms(2024, 5, 20, 10, 0, 0).single().unwrap());
    for _ in 0..FREE_SERMON_LIMIT {
        repo.record_generation(user, &request.prompt(), &outline, &sample_metadata())
            .await
            .unwrap();
    }
    let err = repo
        .record_generation(user, &request.prompt(), &outline, &sample_metadata())
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::QuotaExceeded { .. }));

    // The clock entering June opens a fresh period; May's row is inert.
    repo.set_now(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 1).single().unwrap());
    let (_, usage) = repo
        .record_generation(user, &request.prompt(), &outline, &sample_metadata())
        .await
        .unwrap();
    assert_eq!(usage.used, 1);
}
