//! Image upload endpoint

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use rxscan_common::ExtractionResult;
use tracing::{info, warn};

use super::extract::ProcessResponse;
use crate::error::{ApiError, ApiResult};
use crate::ocr::OcrOutcome;
use crate::AppState;

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::bad_request(err.body_text())
    }
}

/// Read the `file` part of an upload
///
/// Parts named `file` without a filename are ignored, like any other
/// non-file form field.
async fn read_file_part(multipart: &mut Multipart) -> ApiResult<(String, Vec<u8>)> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if filename.is_empty() {
            return Err(ApiError::bad_request("No file selected"));
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok((filename, bytes.to_vec()));
    }

    Err(ApiError::bad_request("No file provided"))
}

/// POST /api/process-image
///
/// OCR failures are not HTTP errors: the response is 200 with empty
/// containers and the OCR diagnostic in both `raw_text` and `error`.
pub async fn process_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ProcessResponse>> {
    let Ok(mut multipart) = multipart else {
        return Err(ApiError::bad_request("No file provided"));
    };

    let (filename, bytes) = read_file_part(&mut multipart).await?;
    info!(filename = %filename, bytes = bytes.len(), "Processing prescription image");

    let result = match state.ocr.extract_text(bytes).await {
        OcrOutcome::Text(text) => state.engine.process(&text).await,
        outcome => {
            let message = outcome.message().unwrap_or_default();
            warn!("OCR unavailable for {}: {}", filename, message);
            ExtractionResult::degraded(message.clone(), message)
        }
    };

    Ok(Json(ProcessResponse::new(result)))
}
