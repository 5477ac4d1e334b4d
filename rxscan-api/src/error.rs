//! Error types for rxscan-api
//!
//! Client input errors map to 400 and oversized bodies to 413, both with
//! the shared `{success:false, error}` envelope. Panics are answered by
//! [`crate::api::panic_response`] with a generic 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rxscan_common::api::{ErrorEnvelope, MSG_FILE_TOO_LARGE};
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Request body exceeded the upload limit (413)
    #[error("Payload too large")]
    PayloadTooLarge,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::PayloadTooLarge => MSG_FILE_TOO_LARGE.to_string(),
        };

        (status, Json(ErrorEnvelope::new(message))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
