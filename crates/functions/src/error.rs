//! Error handling for the functions service.
//!
//! The wire contract is blunt: any failure is a 500 with `{"error": message}`.
//! Specifics still go to the log and Sentry before the response is built.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Function-level error type.
#[derive(Debug, Error)]
pub enum FunctionError {
    /// The maps key is not present in the environment.
    #[error("Maps API key not configured")]
    MapsKeyMissing,

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for FunctionError {
    fn into_response(self) -> Response {
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "function error"
        );

        // Raw message in the body, always 500.
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Result type alias for `FunctionError`.
pub type Result<T> = std::result::Result<T, FunctionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_is_500() {
        for err in [
            FunctionError::MapsKeyMissing,
            FunctionError::Internal("boom".to_string()),
        ] {
            assert_eq!(
                err.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    #[test]
    fn test_maps_key_message_is_stable() {
        // Clients match on this string.
        assert_eq!(
            FunctionError::MapsKeyMissing.to_string(),
            "Maps API key not configured"
        );
    }
}
