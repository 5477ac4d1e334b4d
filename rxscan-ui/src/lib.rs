//! rxscan-ui library - Prescription intelligence web gateway
//!
//! Serves the single-page UI and relays prescription text and uploads to
//! rxscan-api, optionally emailing a medication reminder afterwards.

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};
use rxscan_common::api::panic_response;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod notify;

use backend::BackendClient;
use notify::Notifier;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<BackendClient>,
    pub notifier: Arc<Notifier>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(backend: BackendClient, notifier: Notifier, max_upload_bytes: usize) -> Self {
        Self {
            backend: Arc::new(backend),
            notifier: Arc::new(notifier),
            max_upload_bytes,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    let pages = Router::new()
        .route("/", get(api::serve_index))
        .route("/upload", get(api::serve_index))
        .route("/dashboard", get(api::serve_index))
        .route("/about", get(api::serve_index))
        .route("/contact", get(api::serve_index))
        .route("/favicon.ico", get(api::favicon));

    let api_routes = Router::new()
        .route("/api/process-text", post(api::process_text))
        .route("/api/process-image", post(api::process_image))
        .route("/api/extract-entities", post(api::extract_entities))
        .route("/api/batch-process", post(api::batch_process))
        .route("/api/history", get(api::history))
        .route("/api/contact", post(api::contact_submit))
        .merge(api::health_routes());

    Router::new()
        .merge(pages)
        .merge(api_routes)
        .fallback(api::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
