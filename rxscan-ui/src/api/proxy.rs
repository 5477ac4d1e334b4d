//! Pass-through endpoints
//!
//! The gateway only checks that the required field is present; the
//! backend does the real validation and its body is returned verbatim.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

use super::request::{has_field, json_body};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

async fn forward(
    state: &AppState,
    path: &str,
    body: Result<Json<Value>, JsonRejection>,
    required: &str,
    missing: &str,
) -> ApiResult<Json<Value>> {
    let body = json_body(body, state.max_upload_bytes)?;
    let Some(body) = body.filter(|b| has_field(Some(b), required)) else {
        return Err(ApiError::bad_request(missing));
    };

    let data = state.backend.post_json(path, &body).await?;
    Ok(Json(data))
}

/// POST /api/extract-entities
pub async fn extract_entities(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    forward(&state, "/api/extract-entities", body, "text", "Missing \"text\" field").await
}

/// POST /api/batch-process
pub async fn batch_process(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    forward(
        &state,
        "/api/batch-process",
        body,
        "prescriptions",
        "Missing \"prescriptions\" field",
    )
    .await
}
