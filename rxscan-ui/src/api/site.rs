//! Site endpoints that never touch the backend

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::request::{has_field, json_body};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

const CONTACT_FIELDS: [&str; 3] = ["name", "email", "message"];

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Vec<Value>,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: &'static str,
}

/// GET /api/history
///
/// Nothing is stored, so the history is always empty.
pub async fn history() -> Json<HistoryResponse> {
    Json(HistoryResponse {
        success: true,
        history: Vec::new(),
        message: "History feature coming soon",
    })
}

/// POST /api/contact
///
/// Acknowledged and logged only.
pub async fn contact_submit(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ContactResponse>> {
    let body = json_body(body, state.max_upload_bytes)?;
    if !CONTACT_FIELDS
        .iter()
        .all(|field| has_field(body.as_ref(), field))
    {
        return Err(ApiError::bad_request(
            "Missing required fields: name, email, message",
        ));
    }

    info!("Contact form submitted");
    Ok(Json(ContactResponse {
        success: true,
        message: "Contact form submitted successfully",
    }))
}
