//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::Value;

use crate::AppState;

/// Outcome of the backend health call, mirrored into the response
#[derive(Debug, Serialize)]
pub struct BackendStatus {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub frontend: &'static str,
    pub backend: BackendStatus,
    pub timestamp: String,
}

/// GET /api/health
///
/// Always 200 so the frontend reports itself alive even when the backend
/// is down.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let backend = match state.backend.get("/api/health").await {
        Ok(data) => BackendStatus {
            success: true,
            data: Some(data),
            error: None,
            status_code: None,
        },
        Err(err) => BackendStatus {
            success: false,
            data: None,
            status_code: err.status_code(),
            error: Some(err.to_string()),
        },
    };

    Json(HealthResponse {
        frontend: "running",
        backend,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/api/health", get(health_check))
}
