// Entity Recognizers - NER Capability Providers
//
// Both NER passes talk to a recognizer through the same trait. A recognizer
// is either backed by a token-classification inference endpoint or is the
// no-op variant used when a model could not be loaded, so the engine runs
// every pass without checking whether a model exists.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Recognizer errors
#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Inference API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// One labelled span returned by a recognizer
///
/// Field aliases accept the shapes produced by aggregated
/// (`entity_group`/`word`) and span-style (`label`/`text`) NER servers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecognizedEntity {
    #[serde(alias = "label", alias = "entity")]
    pub entity_group: String,
    #[serde(alias = "text")]
    pub word: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub start: Option<usize>,
    #[serde(default)]
    pub end: Option<usize>,
}

impl RecognizedEntity {
    pub fn new(entity_group: impl Into<String>, word: impl Into<String>) -> Self {
        Self {
            entity_group: entity_group.into(),
            word: word.into(),
            score: None,
            start: None,
            end: None,
        }
    }
}

/// Recognizer trait - general and domain NER both implement this
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// Recognizer identifier used in logs (e.g., "general-ner")
    fn source_id(&self) -> &str;

    /// Label spans in `text`
    ///
    /// # Returns
    /// * `Ok(entities)` - possibly empty
    /// * `Err(_)` - inference failed; the caller decides whether that is fatal
    async fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>, RecognizerError>;

    /// Whether a model is actually behind this recognizer
    fn is_available(&self) -> bool {
        true
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    aggregation_strategy: &'static str,
}

/// Token-classification inference endpoint client
///
/// Speaks the Hugging Face inference protocol: the text goes out as
/// `{"inputs": ..., "parameters": {"aggregation_strategy": "simple"}}`
/// and a JSON array of labelled spans comes back.
pub struct TokenClassifier {
    source_id: String,
    endpoint: String,
    api_token: Option<String>,
    client: reqwest::Client,
}

impl TokenClassifier {
    pub fn new(
        source_id: impl Into<String>,
        endpoint: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RecognizerError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("rxscan-api/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| RecognizerError::Network(e.to_string()))?;

        Ok(Self {
            source_id: source_id.into(),
            endpoint: endpoint.into(),
            api_token,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EntityRecognizer for TokenClassifier {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    async fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>, RecognizerError> {
        let body = InferenceRequest {
            inputs: text,
            parameters: InferenceParameters {
                aggregation_strategy: "simple",
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RecognizerError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RecognizerError::Api(status.as_u16(), detail));
        }

        let entities: Vec<RecognizedEntity> = response
            .json()
            .await
            .map_err(|e| RecognizerError::Parse(e.to_string()))?;

        debug!(
            source = %self.source_id,
            count = entities.len(),
            "Recognizer returned entities"
        );

        Ok(entities)
    }
}

/// No-op recognizer for a model that is not loaded
pub struct UnavailableRecognizer {
    source_id: String,
    reason: String,
}

impl UnavailableRecognizer {
    pub fn new(source_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[async_trait]
impl EntityRecognizer for UnavailableRecognizer {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    async fn recognize(&self, _text: &str) -> Result<Vec<RecognizedEntity>, RecognizerError> {
        Ok(Vec::new())
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_aliases() {
        let aggregated: RecognizedEntity =
            serde_json::from_str(r#"{"entity_group":"Medication","word":"aspirin","score":0.98,"start":0,"end":7}"#)
                .unwrap();
        assert_eq!(aggregated.entity_group, "Medication");
        assert_eq!(aggregated.word, "aspirin");
        assert_eq!(aggregated.end, Some(7));

        let span: RecognizedEntity =
            serde_json::from_str(r#"{"label":"ORG","text":"Crocin"}"#).unwrap();
        assert_eq!(span, RecognizedEntity::new("ORG", "Crocin"));
    }

    #[tokio::test]
    async fn test_unavailable_recognizer_is_noop() {
        let recognizer = UnavailableRecognizer::new("medical-ner", "not configured");
        assert!(!recognizer.is_available());
        assert_eq!(recognizer.reason(), "not configured");
        assert!(recognizer.recognize("Aspirin 75mg").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_token_classifier_parses_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/biomedical")
            .match_header("authorization", "Bearer hf_test")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "inputs": "Aspirin 75mg daily",
                "parameters": {"aggregation_strategy": "simple"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"entity_group":"Medication","word":"Aspirin","score":0.99,"start":0,"end":7},
                    {"entity_group":"Dosage","word":"75mg","score":0.91,"start":8,"end":12}]"#,
            )
            .create_async()
            .await;

        let classifier = TokenClassifier::new(
            "medical-ner",
            format!("{}/models/biomedical", server.url()),
            Some("hf_test".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        let entities = classifier.recognize("Aspirin 75mg daily").await.unwrap();
        mock.assert_async().await;

        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].word, "Aspirin");
        assert_eq!(entities[1].entity_group, "Dosage");
    }

    #[tokio::test]
    async fn test_token_classifier_reports_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/ner")
            .with_status(503)
            .with_body(r#"{"error":"Model is currently loading"}"#)
            .create_async()
            .await;

        let classifier = TokenClassifier::new(
            "general-ner",
            format!("{}/ner", server.url()),
            None,
            Duration::from_secs(5),
        )
        .unwrap();

        match classifier.recognize("text").await {
            Err(RecognizerError::Api(503, body)) => assert!(body.contains("loading")),
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_token_classifier_reports_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/ner")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let classifier = TokenClassifier::new(
            "general-ner",
            format!("{}/ner", server.url()),
            None,
            Duration::from_secs(5),
        )
        .unwrap();

        assert!(matches!(
            classifier.recognize("text").await,
            Err(RecognizerError::Parse(_))
        ));
    }
}
