//! rxscan-api library - Prescription extraction backend
//!
//! OCR through a cloud text detector, entity extraction through the
//! three-pass engine, exposed over a small JSON API.

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};
use chrono::{DateTime, Utc};
use rxscan_common::api::panic_response;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod config;
pub mod error;
pub mod extraction;
pub mod ocr;

use extraction::ExtractionEngine;
use ocr::OcrAdapter;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ExtractionEngine>,
    pub ocr: Arc<OcrAdapter>,
    pub startup_time: DateTime<Utc>,
    /// Request body limit (multipart uploads included)
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(engine: ExtractionEngine, ocr: OcrAdapter, max_upload_bytes: usize) -> Self {
        Self {
            engine: Arc::new(engine),
            ocr: Arc::new(ocr),
            startup_time: Utc::now(),
            max_upload_bytes,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(api::api_index))
        .route("/api/process-text", post(api::process_text))
        .route("/api/process-image", post(api::process_image))
        .route("/api/extract-entities", post(api::extract_entities))
        .route("/api/batch-process", post(api::batch_process))
        .merge(api::health_routes())
        .fallback(api::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
