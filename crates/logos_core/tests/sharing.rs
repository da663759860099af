//! Share-token semantics and ownership isolation, exercised through the
//! same gate the HTTP handlers use.

mod support;

use logos_core::access::require_artifact_for_user;
use logos_core::outline::Outline;
use logos_core::ports::{PortError, SermonRepository};
use support::{sample_metadata, sample_request, InMemoryRepository};
use uuid::Uuid;

#[tokio::test]
async fn share_token_round_trips_the_same_outline() {
    let repo = InMemoryRepository::new();
    let owner = Uuid::new_v4();
    let request = sample_request();
    let outline = Outline::fallback(&request);

    let (artifact, _) = repo
        .record_generation(owner, &request.prompt(), &outline, &sample_metadata())
        .await
        .unwrap();

    let token = Uuid::new_v4();
    repo.set_share_token(artifact.id, Some(token)).await.unwrap();

    let via_owner = require_artifact_for_user(
        &repo,
        &artifact.id.to_string(),
        Some(&owner.to_string()),
    )
    .await
    .unwrap();
    let via_public = repo.find_by_share_token(token).await.unwrap();

    assert_eq!(via_public.id, via_owner.id);
    assert_eq!(via_public.content.to_json(), via_owner.content.to_json());
}

#[tokio::test]
async fn revoking_the_token_closes_the_public_path_immediately() {
    let repo = InMemoryRepository::new();
    let owner = Uuid::new_v4();
    let request = sample_request();
    let outline = Outline::fallback(&request);

    let (artifact, _) = repo
        .record_generation(owner, &request.prompt(), &outline, &sample_metadata())
        .await
        .unwrap();

    let token = Uuid::new_v4();
    repo.set_share_token(artifact.id, Some(token)).await.unwrap();
    repo.find_by_share_token(token).await.unwrap();

    repo.set_share_token(artifact.id, None).await.unwrap();
    let err = repo.find_by_share_token(token).await.unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));

    // The owner path is unaffected by revocation.
    require_artifact_for_user(&repo, &artifact.id.to_string(), Some(&owner.to_string()))
        .await
        .unwrap();
}

#[tokio::test]
async fn another_user_cannot_read_or_manage_the_artifact() {
    let repo = InMemoryRepository::new();
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let request = sample_request();
    let outline = Outline::fallback(&request);

    let (artifact, _) = repo
        .record_generation(owner, &request.prompt(), &outline, &sample_metadata())
        .await
        .unwrap();

    let err = require_artifact_for_user(
        &repo,
        &artifact.id.to_string(),
        Some(&intruder.to_string()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, PortError::Forbidden));
}

#[tokio::test]
async fn setting_a_token_on_a_missing_artifact_is_not_found() {
    let repo = InMemoryRepository::new();
    let err = repo
        .set_share_token(Uuid::new_v4(), Some(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));
}
