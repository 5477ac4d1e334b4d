//! rxscan-api client
//!
//! Every call uses the same fixed timeout. A 200 response yields the body
//! as JSON; anything else becomes a [`BackendError`] whose message is safe
//! to show to the end user.

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("rxscan-ui/", env!("CARGO_PKG_VERSION"));

/// Backend call errors
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Cannot connect to backend API at {0}. Ensure backend is running.")]
    Connect(String),

    #[error("Backend API request timeout")]
    Timeout,

    /// Non-200 response; `message` is the backend's `error` field
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Other(String),
}

impl BackendError {
    /// HTTP status reported by the backend, if it answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// HTTP client for rxscan-api
pub struct BackendClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Other(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<Value, BackendError> {
        debug!(path, "GET backend");
        let response = self
            .http_client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        read_json(response).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value, BackendError> {
        debug!(path, "POST backend");
        let response = self
            .http_client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        read_json(response).await
    }

    /// Upload one file as the multipart `file` field
    pub async fn post_file(
        &self,
        path: &str,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Value, BackendError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| BackendError::Other(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        debug!(path, filename, "POST file to backend");
        let response = self
            .http_client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        read_json(response).await
    }

    fn send_error(&self, err: reqwest::Error) -> BackendError {
        warn!("Backend request failed: {}", err);
        if err.is_timeout() {
            BackendError::Timeout
        } else if err.is_connect() {
            BackendError::Connect(self.base_url.clone())
        } else {
            BackendError::Other(err.to_string())
        }
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, BackendError> {
    let status = response.status();
    if status == reqwest::StatusCode::OK {
        return response.json().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout
            } else {
                BackendError::Other(format!("Invalid backend response: {}", e))
            }
        });
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "API Error".to_string());

    Err(BackendError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(url: &str) -> BackendClient {
        BackendClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            BackendError::Connect("http://localhost:5000".to_string()).to_string(),
            "Cannot connect to backend API at http://localhost:5000. Ensure backend is running."
        );
        assert_eq!(BackendError::Timeout.to_string(), "Backend API request timeout");
        assert_eq!(BackendError::Timeout.status_code(), None);
    }

    #[tokio::test]
    async fn test_post_json_ok() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/process-text")
            .match_body(mockito::Matcher::Json(json!({"text": "Aspirin 75mg"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"doses":["75mg"]}"#)
            .create_async()
            .await;

        let body = client(&server.url())
            .post_json("/api/process-text", &json!({"text": "Aspirin 75mg"}))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(body["doses"], json!(["75mg"]));
    }

    #[tokio::test]
    async fn test_non_200_uses_backend_error_field() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/process-text")
            .with_status(400)
            .with_body(r#"{"success":false,"error":"Prescription text cannot be empty"}"#)
            .create_async()
            .await;

        let err = client(&server.url())
            .post_json("/api/process-text", &json!({"text": ""}))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Prescription text cannot be empty");
        assert_eq!(err.status_code(), Some(400));
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/health")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let err = client(&server.url()).get("/api/health").await.unwrap_err();
        assert_eq!(err.to_string(), "API Error");
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let err = client("http://127.0.0.1:1")
            .get("/api/health")
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Connect(_)));
        assert_eq!(
            err.to_string(),
            "Cannot connect to backend API at http://127.0.0.1:1. Ensure backend is running."
        );
    }

    #[tokio::test]
    async fn test_post_file_sends_multipart() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/process-image")
            .match_header(
                "content-type",
                mockito::Matcher::Regex("^multipart/form-data".to_string()),
            )
            .match_body(mockito::Matcher::Regex(r#"filename="rx_scan.png""#.to_string()))
            .with_status(200)
            .with_body(r#"{"success":true,"raw_text":"x"}"#)
            .create_async()
            .await;

        let body = client(&server.url())
            .post_file("/api/process-image", "rx_scan.png", "image/png", b"png".to_vec())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(body["raw_text"], "x");
    }
}
