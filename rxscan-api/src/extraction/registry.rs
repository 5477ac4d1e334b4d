//! Model handle registry
//!
//! Recognizers are loaded exactly once at startup and are read-only after
//! that. Loading probes each configured endpoint with a warm-up request; a
//! missing URL or a failed probe installs the no-op recognizer instead, so
//! readiness is decided here and queried everywhere else.

use std::sync::Arc;
use tracing::{info, warn};

use super::recognizer::{EntityRecognizer, TokenClassifier, UnavailableRecognizer};
use crate::config::NerSettings;

/// Source identifier of the general-purpose recognizer
pub const GENERAL_SOURCE: &str = "general-ner";

/// Source identifier of the biomedical recognizer
pub const MEDICAL_SOURCE: &str = "medical-ner";

const WARMUP_TEXT: &str = "Paracetamol 500mg twice daily";

/// Process-wide recognizer handles
#[derive(Clone)]
pub struct ModelRegistry {
    general: Arc<dyn EntityRecognizer>,
    medical: Arc<dyn EntityRecognizer>,
}

impl ModelRegistry {
    /// Build the registry from already-constructed recognizers
    pub fn new(general: Arc<dyn EntityRecognizer>, medical: Arc<dyn EntityRecognizer>) -> Self {
        Self { general, medical }
    }

    /// Registry with both recognizers unavailable
    pub fn unavailable() -> Self {
        Self::new(
            Arc::new(UnavailableRecognizer::new(GENERAL_SOURCE, "not configured")),
            Arc::new(UnavailableRecognizer::new(MEDICAL_SOURCE, "not configured")),
        )
    }

    /// Load both recognizers from settings
    pub async fn initialize(settings: &NerSettings) -> Self {
        info!("Loading general NER model...");
        let general = load_recognizer(GENERAL_SOURCE, settings.general_url.as_deref(), settings).await;

        info!("Loading medical NER model...");
        let medical = load_recognizer(MEDICAL_SOURCE, settings.medical_url.as_deref(), settings).await;
        if !medical.is_available() {
            warn!("Falling back to general NER only");
        }

        Self::new(general, medical)
    }

    pub fn general(&self) -> &dyn EntityRecognizer {
        self.general.as_ref()
    }

    pub fn medical(&self) -> &dyn EntityRecognizer {
        self.medical.as_ref()
    }

    /// Reported by the health endpoint
    pub fn general_ready(&self) -> bool {
        self.general.is_available()
    }

    pub fn medical_ready(&self) -> bool {
        self.medical.is_available()
    }
}

async fn load_recognizer(
    source_id: &str,
    url: Option<&str>,
    settings: &NerSettings,
) -> Arc<dyn EntityRecognizer> {
    let Some(url) = url else {
        warn!("{} endpoint not configured", source_id);
        return Arc::new(UnavailableRecognizer::new(source_id, "not configured"));
    };

    let classifier = match TokenClassifier::new(
        source_id,
        url,
        settings.api_token.clone(),
        settings.timeout,
    ) {
        Ok(classifier) => classifier,
        Err(e) => {
            warn!("Could not build {} client: {}", source_id, e);
            return Arc::new(UnavailableRecognizer::new(source_id, e.to_string()));
        }
    };

    match classifier.recognize(WARMUP_TEXT).await {
        Ok(_) => {
            info!("✓ {} ready at {}", source_id, url);
            Arc::new(classifier)
        }
        Err(e) => {
            warn!("Could not load {} from {}: {}", source_id, url, e);
            Arc::new(UnavailableRecognizer::new(source_id, e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settings(general_url: Option<String>, medical_url: Option<String>) -> NerSettings {
        NerSettings {
            general_url,
            medical_url,
            api_token: None,
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_endpoints_are_unavailable() {
        let registry = ModelRegistry::initialize(&settings(None, None)).await;
        assert!(!registry.general_ready());
        assert!(!registry.medical_ready());
    }

    #[tokio::test]
    async fn test_probe_decides_readiness() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/general")
            .with_status(200)
            .with_body(r#"[{"entity_group":"ORG","word":"Paracetamol"}]"#)
            .create_async()
            .await;
        server
            .mock("POST", "/medical")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let registry = ModelRegistry::initialize(&settings(
            Some(format!("{}/general", server.url())),
            Some(format!("{}/medical", server.url())),
        ))
        .await;

        assert!(registry.general_ready());
        assert!(!registry.medical_ready());
        assert_eq!(registry.medical().source_id(), MEDICAL_SOURCE);
    }
}
