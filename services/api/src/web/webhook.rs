//! services/api/src/web/webhook.rs
//!
//! Payment-provider webhook endpoint. The handler is an isolated, stateless
//! signature check: no event is processed, no storage is touched.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;
use tracing::error;

use crate::web::state::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Verifies a `Stripe-Signature` header (`t=<ts>,v1=<hex>,...`) against the
/// raw request body: the signed payload is `"{t}.{body}"` under HMAC-SHA256
/// with the webhook secret. Any listed `v1` value may match, since the
/// provider sends one per active secret during rotation.
fn verify_signature(secret: &str, header: &str, payload: &[u8]) -> bool {
    let mut timestamp = None;
    let mut candidates = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => candidates.push(value),
            _ => {}
        }
    }

    let Some(timestamp) = timestamp else {
        return false;
    };
    if candidates.is_empty() {
        return false;
    }

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);

    candidates.into_iter().any(|candidate| {
        hex::decode(candidate)
            .map(|digest| mac.clone().verify_slice(&digest).is_ok())
            .unwrap_or(false)
    })
}

/// Accept a payment-provider webhook delivery.
///
/// When a webhook secret is configured and a signature header is present,
/// the delivery is rejected with 400 unless the signature verifies.
#[utoipa::path(
    post,
    path = "/stripe/webhook",
    request_body(content = String, content_type = "application/json"),
    responses(
        (status = 200, description = "Delivery acknowledged"),
        (status = 400, description = "Signature verification failed")
    )
)]
pub async fn stripe_webhook_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let signature = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok());

    if let (Some(secret), Some(signature)) = (&state.config.stripe_webhook_secret, signature) {
        if !verify_signature(secret, signature, &body) {
            error!("stripe webhook signature verification failed");
            return (
                StatusCode::BAD_REQUEST,
                "Webhook Error: invalid signature".to_string(),
            )
                .into_response();
        }
    }

    Json(json!({ "received": true })).into_response()
}
