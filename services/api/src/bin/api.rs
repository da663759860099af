//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, OpenAiSermonAdapter, TemplateSermonAdapter},
    config::Config,
    error::ApiError,
    web::{
        disable_share_handler, enable_share_handler, export_sermon_handler,
        feature_flags_handler, generate_sermon_handler, get_sermon_handler, health_handler,
        public_share_handler, share_status_handler, state::AppState, stripe_webhook_handler,
        ApiDoc,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use logos_core::ports::{SermonGenerator, SermonRepository};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool.clone()));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize the Generation Adapter ---
    // Without an API key the service still generates: every request is
    // answered by the deterministic template.
    let generator: Arc<dyn SermonGenerator> = match &config.openai_api_key {
        Some(api_key) => {
            let openai_config = OpenAIConfig::new().with_api_key(api_key);
            Arc::new(OpenAiSermonAdapter::new(
                Client::with_config(openai_config),
                config.sermon_model.clone(),
            ))
        }
        None => {
            info!("OPENAI_API_KEY not configured; serving template outlines only.");
            Arc::new(TemplateSermonAdapter)
        }
    };

    // --- 4. Build the Shared AppState ---
    let repository: Arc<dyn SermonRepository> = db_adapter;
    let app_state = Arc::new(AppState {
        repository,
        generator,
        config: config.clone(),
        started_at: Instant::now(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT, "x-user-id".parse().unwrap()]);

    // --- 5. Create the Web Router ---
    let api_router = Router::new()
        .route("/health", get(health_handler))
        .route("/config/feature-flags", get(feature_flags_handler))
        .route("/generate", post(generate_sermon_handler))
        .route("/sermon/{id}", get(get_sermon_handler))
        .route("/export/{file}", get(export_sermon_handler))
        .route("/share/public/{token}", get(public_share_handler))
        .route(
            "/share/{id}",
            get(share_status_handler)
                .post(enable_share_handler)
                .delete(disable_share_handler),
        )
        .route("/stripe/webhook", post(stripe_webhook_handler))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
