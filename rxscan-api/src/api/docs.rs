//! API documentation endpoint

use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct ApiIndex {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
    pub status: &'static str,
}

/// GET /
pub async fn api_index() -> Json<ApiIndex> {
    let endpoints = BTreeMap::from([
        ("GET /api/health", "Health check"),
        ("POST /api/process-text", "Process prescription text"),
        ("POST /api/process-image", "Process prescription image"),
        ("POST /api/extract-entities", "Extract entities from text"),
        ("POST /api/batch-process", "Batch process prescriptions"),
    ]);

    Json(ApiIndex {
        name: "OCR Prescription Intelligence API",
        version: env!("CARGO_PKG_VERSION"),
        description: "Prescription digitization with NER",
        endpoints,
        status: "running",
    })
}
