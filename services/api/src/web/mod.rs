//! services/api/src/web/mod.rs
//!
//! The Axum handlers and the master definition for the OpenAPI specification.

pub mod config;
pub mod export;
pub mod health;
pub mod sermons;
pub mod share;
pub mod state;
pub mod webhook;

use utoipa::OpenApi;

// Re-export the handlers to make them easily accessible to the binary that
// will build the web server router.
pub use config::feature_flags_handler;
pub use export::export_sermon_handler;
pub use health::health_handler;
pub use sermons::{generate_sermon_handler, get_sermon_handler};
pub use share::{
    disable_share_handler, enable_share_handler, public_share_handler, share_status_handler,
};
pub use webhook::stripe_webhook_handler;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        sermons::generate_sermon_handler,
        sermons::get_sermon_handler,
        export::export_sermon_handler,
        share::share_status_handler,
        share::enable_share_handler,
        share::disable_share_handler,
        share::public_share_handler,
        config::feature_flags_handler,
        health::health_handler,
        webhook::stripe_webhook_handler,
    ),
    components(
        schemas(
            sermons::GenerateSermonRequest,
            sermons::GenerateSermonResponse,
            sermons::SermonResponse,
            sermons::UsageBody,
            share::ShareStateResponse,
            share::SharedSermonResponse,
            config::FeatureFlagsResponse,
            crate::config::FeatureFlags,
            health::HealthResponse,
        )
    ),
    tags(
        (name = "Logos AI API", description = "API endpoints for AI-generated sermon outlines, exports, and public sharing.")
    )
)]
pub struct ApiDoc;
