//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and its mapping
//! onto the HTTP status taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use logos_core::ports::PortError;
use serde_json::json;
use tracing::error;

use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    /// Maps the error taxonomy onto HTTP statuses and user-facing messages.
    ///
    /// Quota and ownership outcomes carry specific, actionable messages;
    /// storage and transport faults are logged and answered generically so
    /// internals never leak.
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Port(PortError::InvalidArgument(message)) => {
                (StatusCode::BAD_REQUEST, json!({ "message": message }))
            }
            ApiError::Port(PortError::Unauthenticated) => (
                StatusCode::FORBIDDEN,
                json!({ "message": "Usuário não autorizado a acessar este recurso." }),
            ),
            ApiError::Port(PortError::Forbidden) => (
                StatusCode::FORBIDDEN,
                json!({ "message": "Sermão não disponível para este usuário." }),
            ),
            ApiError::Port(PortError::NotFound(_)) => (
                StatusCode::NOT_FOUND,
                json!({ "message": "Sermão não encontrado." }),
            ),
            ApiError::Port(PortError::QuotaExceeded { used, limit }) => (
                StatusCode::PAYMENT_REQUIRED,
                json!({ "message": "limite atingido", "used": used, "limit": limit }),
            ),
            ApiError::Port(PortError::UnsupportedFormat(_)) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Formato de exportação não suportado." }),
            ),
            ApiError::Port(PortError::UnprocessableContent) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "message": "Conteúdo do sermão inválido para exportação." }),
            ),
            other => {
                error!("request failed: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Não foi possível completar a operação no momento." }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_error_maps_to_402_with_counts() {
        let response = ApiError::Port(PortError::QuotaExceeded { used: 10, limit: 10 })
            .into_response();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn ownership_errors_share_the_forbidden_status() {
        assert_eq!(
            ApiError::Port(PortError::Unauthenticated)
                .into_response()
                .status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Port(PortError::Forbidden).into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn storage_faults_stay_generic() {
        let response = ApiError::Internal("pool exhausted".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
