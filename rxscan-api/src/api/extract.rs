//! Text extraction endpoints
//!
//! Request bodies are taken as raw JSON so each field problem maps to its
//! own message instead of a generic deserialization rejection.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use rxscan_common::{BatchItem, ExtractionResult, MedicationEntities};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extraction::process_batch;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: ExtractionResult,
}

impl ProcessResponse {
    pub fn new(result: ExtractionResult) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EntitiesResponse {
    pub success: bool,
    pub entities: MedicationEntities,
    pub raw_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub count: usize,
    pub results: Vec<BatchItem>,
}

/// Unwrap a JSON body; any rejection except 413 counts as "no body"
pub(crate) fn json_body(body: Result<Json<Value>, JsonRejection>) -> ApiResult<Option<Value>> {
    match body {
        Ok(Json(value)) => Ok(Some(value)),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(ApiError::PayloadTooLarge)
        }
        Err(_) => Ok(None),
    }
}

/// Pull a non-blank `text` string out of a request body
fn required_text(body: Option<Value>, missing: &str, empty: &str) -> ApiResult<String> {
    let text = match body.as_ref().and_then(|b| b.get("text")) {
        None | Some(Value::Null) => return Err(ApiError::bad_request(missing)),
        Some(Value::String(text)) => text.trim(),
        Some(_) => return Err(ApiError::bad_request("\"text\" must be a string")),
    };

    if text.is_empty() {
        return Err(ApiError::bad_request(empty));
    }
    Ok(text.to_string())
}

/// POST /api/process-text
pub async fn process_text(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ProcessResponse>> {
    let text = required_text(
        json_body(body)?,
        "Missing \"text\" field in request body",
        "Prescription text cannot be empty",
    )?;

    let result = state.engine.process(&text).await;
    Ok(Json(ProcessResponse::new(result)))
}

/// POST /api/extract-entities
pub async fn extract_entities(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<EntitiesResponse>> {
    let text = required_text(json_body(body)?, "Missing \"text\" field", "Text cannot be empty")?;

    let result = state.engine.process(&text).await;
    Ok(Json(EntitiesResponse {
        success: true,
        entities: result.entities,
        raw_text: result.raw_text,
        error: result.error,
    }))
}

/// POST /api/batch-process
pub async fn batch_process(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<BatchResponse>> {
    let body = json_body(body)?;
    let prescriptions = match body.as_ref().and_then(|b| b.get("prescriptions")) {
        None => return Err(ApiError::bad_request("Missing \"prescriptions\" field")),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ApiError::bad_request("\"prescriptions\" must be a list")),
    };

    let results = process_batch(&state.engine, prescriptions).await;
    info!(
        submitted = prescriptions.len(),
        processed = results.len(),
        "Batch processed"
    );

    Ok(Json(BatchResponse {
        success: true,
        count: results.len(),
        results,
    }))
}
