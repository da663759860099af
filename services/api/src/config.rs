//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Named boolean toggles consumed by the presentation layer only.
#[derive(Clone, Copy, Debug, serde::Serialize, utoipa::ToSchema)]
pub struct FeatureFlags {
    pub study: bool,
    pub rag: bool,
    pub export: bool,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub openai_api_key: Option<String>,
    pub sermon_model: String,
    pub stripe_webhook_secret: Option<String>,
    pub feature_flags: FeatureFlags,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load API Keys (as optional) ---
        // A placeholder key left over from a fresh .env counts as absent, so
        // the service falls back to the deterministic template generator.
        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty() && key != "replace_me");
        let stripe_webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty());

        // --- Load Adapter-specific Settings ---
        let sermon_model =
            std::env::var("SERMON_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".to_string());

        let feature_flags = FeatureFlags {
            study: env_flag("FF_STUDY"),
            rag: env_flag("FF_RAG"),
            export: env_flag("FF_EXPORT"),
        };

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            openai_api_key,
            sermon_model,
            stripe_webhook_secret,
            feature_flags,
        })
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
