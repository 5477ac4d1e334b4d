//! Error types for rxscan-ui
//!
//! Validation problems and backend faults both answer 400 with the shared
//! envelope; the backend's own message is passed through.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rxscan_common::api::ErrorEnvelope;
use thiserror::Error;
use tracing::warn;

use crate::backend::BackendError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Backend unreachable or rejected the request (400)
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Upload over the configured limit (413), limit in bytes
    #[error("Payload too large")]
    PayloadTooLarge(usize),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Backend(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

/// 413 message, limit rounded down to whole megabytes
pub fn file_too_large_message(limit_bytes: usize) -> String {
    format!("File too large. Maximum size: {}MB", limit_bytes / (1024 * 1024))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Backend(err) => {
                warn!("Backend call failed: {}", err);
                err.to_string()
            }
            ApiError::PayloadTooLarge(limit) => file_too_large_message(limit),
        };

        (status, Json(ErrorEnvelope::new(message))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
