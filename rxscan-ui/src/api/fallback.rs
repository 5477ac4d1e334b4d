//! Unknown routes

use axum::{http::StatusCode, response::IntoResponse, Json};
use rxscan_common::api::{ErrorEnvelope, MSG_PAGE_NOT_FOUND};

/// Router fallback
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorEnvelope::new(MSG_PAGE_NOT_FOUND)))
}
