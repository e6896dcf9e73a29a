use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Error taxonomy for the HTTP boundary.
///
/// Every failure is surfaced synchronously as a status code plus a JSON body
/// of the form `{ "error": message }`. Internal errors are logged with full
/// detail server-side; clients only see a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or empty required field, or a malformed request body.
    #[error("{0}")]
    Validation(String),
    /// Unknown idea or attachment id.
    #[error("{0}")]
    NotFound(String),
    /// I/O or database failure. Not retried.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
