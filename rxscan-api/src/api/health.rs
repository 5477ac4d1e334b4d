//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthComponents {
    pub api: &'static str,
    pub ner_model: &'static str,
    pub medical_ner: &'static str,
    pub textract: &'static str,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub components: HealthComponents,
    pub timestamp: String,
    pub version: &'static str,
    pub uptime_seconds: i64,
}

fn loaded(ready: bool) -> &'static str {
    if ready {
        "initialized"
    } else {
        "not_loaded"
    }
}

/// GET /api/health
///
/// Always 200; degraded components show up in `components`.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let models = state.engine.models();
    let now = chrono::Utc::now();

    Json(HealthResponse {
        status: "healthy",
        components: HealthComponents {
            api: "running",
            ner_model: loaded(models.general_ready()),
            medical_ner: loaded(models.medical_ready()),
            textract: if state.ocr.is_configured() {
                "configured"
            } else {
                "not_configured"
            },
        },
        timestamp: now.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: (now - state.startup_time).num_seconds(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/api/health", get(health_check))
}
