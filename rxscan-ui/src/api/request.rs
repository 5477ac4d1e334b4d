//! Request body helpers shared by the handlers

use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// Unwrap a JSON body; any rejection except 413 counts as "no body"
pub fn json_body(
    body: Result<Json<Value>, JsonRejection>,
    limit_bytes: usize,
) -> ApiResult<Option<Value>> {
    match body {
        Ok(Json(value)) => Ok(Some(value)),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(ApiError::PayloadTooLarge(limit_bytes))
        }
        Err(_) => Ok(None),
    }
}

/// True when `body` is an object containing `field` (any value)
pub fn has_field(body: Option<&Value>, field: &str) -> bool {
    body.and_then(Value::as_object)
        .is_some_and(|object| object.contains_key(field))
}

pub fn multipart_error(err: MultipartError, limit_bytes: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(limit_bytes)
    } else {
        ApiError::bad_request(err.body_text())
    }
}
