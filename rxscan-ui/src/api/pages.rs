//! UI serving routes
//!
//! Every page path serves the same single-page shell; the client script
//! picks the view from `location.pathname`.

use axum::{http::StatusCode, response::Html};

const INDEX_HTML: &str = include_str!("../../ui/index.html");

/// GET /, /upload, /dashboard, /about, /contact
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /favicon.ico
///
/// No icon is bundled.
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}
