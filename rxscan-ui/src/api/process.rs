//! Prescription processing endpoints
//!
//! Both handlers validate locally, relay to the backend and then try the
//! optional medication reminder. The email outcome is reported as
//! `data.email_sent` and never changes the HTTP status or `success`.

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use super::request::{has_field, json_body, multipart_error};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Allowed upload extensions, sorted
pub const ALLOWED_EXTENSIONS: &[&str] = &["gif", "jpeg", "jpg", "pdf", "png"];

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// POST /api/process-text
pub async fn process_text(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ProcessResponse>> {
    let body = json_body(body, state.max_upload_bytes)?;
    if !has_field(body.as_ref(), "text") {
        return Err(ApiError::bad_request("Missing \"text\" field in request body"));
    }

    let text = match body.as_ref().and_then(|b| b.get("text")) {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Null) => String::new(),
        _ => return Err(ApiError::bad_request("\"text\" must be a string")),
    };
    if text.is_empty() {
        return Err(ApiError::bad_request("Prescription text cannot be empty"));
    }

    let mut data = state
        .backend
        .post_json("/api/process-text", &json!({ "text": text }))
        .await?;

    let patient_email = body
        .as_ref()
        .and_then(|b| b.get("patient_email"))
        .and_then(Value::as_str);
    notify_patient(&state, &mut data, patient_email).await;

    Ok(Json(ProcessResponse {
        success: true,
        data,
        filename: None,
    }))
}

/// POST /api/process-image
pub async fn process_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ProcessResponse>> {
    let Ok(mut multipart) = multipart else {
        return Err(ApiError::bad_request("No file provided"));
    };
    let limit = state.max_upload_bytes;

    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut patient_email: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") if upload.is_none() => {
                let Some(filename) = field.file_name().map(str::to_string) else {
                    continue;
                };
                let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
                upload = Some((filename, bytes.to_vec()));
            }
            Some("patient_email") => {
                patient_email = Some(field.text().await.map_err(|e| multipart_error(e, limit))?);
            }
            _ => {}
        }
    }

    let Some((original_name, bytes)) = upload else {
        return Err(ApiError::bad_request("No file provided"));
    };
    if original_name.is_empty() {
        return Err(ApiError::bad_request("No file selected"));
    }
    let Some(extension) = allowed_extension(&original_name) else {
        return Err(ApiError::bad_request(format!(
            "Invalid file type. Allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    };

    let filename = sanitize_filename(&original_name);
    info!(filename = %filename, bytes = bytes.len(), "Relaying prescription upload");

    let mut data = state
        .backend
        .post_file("/api/process-image", &filename, content_type_for(&extension), bytes)
        .await?;
    notify_patient(&state, &mut data, patient_email.as_deref()).await;

    Ok(Json(ProcessResponse {
        success: true,
        data,
        filename: Some(filename),
    }))
}

/// Send the reminder when an address was given and medications were found
async fn notify_patient(state: &AppState, data: &mut Value, patient_email: Option<&str>) {
    let Some(email) = patient_email.map(str::trim).filter(|e| !e.is_empty()) else {
        return;
    };

    let medications = string_list(data.get("medications"));
    if medications.is_empty() {
        return;
    }
    let frequencies = string_list(data.get("frequencies"));

    let sent = state
        .notifier
        .send_medication_alert(email, &medications, &frequencies)
        .await;
    if let Some(object) = data.as_object_mut() {
        object.insert("email_sent".to_string(), Value::Bool(sent));
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Lowercased extension if it is on the allow list
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, extension) = filename.rsplit_once('.')?;
    let extension = extension.to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Reduce an uploaded filename to a safe ASCII basename
///
/// Path components are dropped, whitespace becomes `_`, anything outside
/// `[A-Za-z0-9._-]` is removed and leading/trailing `.`/`_` are stripped.
pub fn sanitize_filename(filename: &str) -> String {
    let basename = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    let cleaned: String = basename
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}
