//! Error types for the chat web interface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur in the chat web interface.
#[derive(Debug, Error)]
pub enum WebError {
    /// No user header and no default user configured.
    #[error("Not signed in")]
    Unauthorized,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            WebError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            WebError::Database(DatabaseError::Validation(err)) => {
                tracing::warn!("Rejected input: {}", err);
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            WebError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for web handlers.
pub type Result<T> = std::result::Result<T, WebError>;
