use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Failures surfaced by the API, one variant per outcome the HTTP layer
/// distinguishes. Provider and internal detail stays in the log; the
/// response body only carries messages that are safe to show a caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Upload(String),
    #[error("push provider credentials are not configured")]
    NotConfigured,
    #[error("provider publish failed: {0}")]
    Provider(String),
    #[error("notification not found")]
    NotFound,
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::Upload(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::NotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "push provider is not configured; set the Pusher Beams instance id and secret key"
                    .to_string(),
            ),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "notification not found".to_string()),
            ApiError::Provider(detail) => {
                tracing::error!(error = %detail, "provider publish failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to send notification".to_string(),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
