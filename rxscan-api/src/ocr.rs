// OCR Adapter - Cloud Document Text Detection
//
// Image bytes go to a text detector; LINE blocks come back and are joined
// with newlines. Failures surface as a tagged outcome so failure messages
// never reach the extraction engine as if they were prescription text.

use async_trait::async_trait;
use aws_config::{timeout::TimeoutConfig, BehaviorVersion};
use aws_sdk_textract::{
    config::{Credentials, Region},
    error::DisplayErrorContext,
    primitives::Blob,
    types::{BlockType, Document},
    Client,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::OcrSettings;

/// Sentinel message reported when no detector is configured
pub const MSG_OCR_NOT_CONFIGURED: &str = "AWS Textract not configured";

/// OCR errors
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("{0}")]
    Service(String),

    #[error("Empty image")]
    EmptyImage,
}

/// Kind of a detected block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Page,
    Line,
    Word,
    Other,
}

/// One block returned by a text detector
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub kind: BlockKind,
    pub text: Option<String>,
}

impl TextBlock {
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Line,
            text: Some(text.into()),
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Word,
            text: Some(text.into()),
        }
    }
}

/// Document text detection capability
#[async_trait]
pub trait TextDetector: Send + Sync {
    /// Provider name used in logs
    fn provider(&self) -> &str;

    async fn detect_document_text(&self, image: Vec<u8>) -> Result<Vec<TextBlock>, OcrError>;
}

/// AWS Textract `DetectDocumentText` client
pub struct TextractDetector {
    client: Client,
}

impl TextractDetector {
    /// Build a client from explicit credentials
    ///
    /// Returns `None` when either half of the credential pair is missing.
    pub async fn connect(settings: &OcrSettings) -> Option<Self> {
        let (Some(key_id), Some(secret)) = (&settings.access_key_id, &settings.secret_access_key)
        else {
            return None;
        };

        let credentials = Credentials::new(key_id, secret, None, None, "rxscan-config");
        let timeouts = TimeoutConfig::builder()
            .operation_timeout(settings.timeout)
            .build();

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials)
            .timeout_config(timeouts)
            .load()
            .await;

        info!("Textract client ready in region {}", settings.region);
        Some(Self {
            client: Client::new(&sdk_config),
        })
    }
}

#[async_trait]
impl TextDetector for TextractDetector {
    fn provider(&self) -> &str {
        "aws-textract"
    }

    async fn detect_document_text(&self, image: Vec<u8>) -> Result<Vec<TextBlock>, OcrError> {
        let document = Document::builder().bytes(Blob::new(image)).build();

        let output = self
            .client
            .detect_document_text()
            .document(document)
            .send()
            .await
            .map_err(|e| OcrError::Service(DisplayErrorContext(&e).to_string()))?;

        let blocks = output
            .blocks()
            .iter()
            .map(|block| TextBlock {
                kind: match block.block_type() {
                    Some(BlockType::Line) => BlockKind::Line,
                    Some(BlockType::Word) => BlockKind::Word,
                    Some(BlockType::Page) => BlockKind::Page,
                    _ => BlockKind::Other,
                },
                text: block.text().map(str::to_string),
            })
            .collect();

        Ok(blocks)
    }
}

/// Result of one OCR attempt
#[derive(Debug, Clone, PartialEq)]
pub enum OcrOutcome {
    /// Detected text (possibly empty)
    Text(String),
    /// No detector configured
    NotConfigured,
    /// Detection failed
    Failed(String),
}

impl OcrOutcome {
    /// Diagnostic message for the non-text outcomes
    pub fn message(&self) -> Option<String> {
        match self {
            OcrOutcome::Text(_) => None,
            OcrOutcome::NotConfigured => Some(MSG_OCR_NOT_CONFIGURED.to_string()),
            OcrOutcome::Failed(detail) => Some(format!("Error extracting text: {}", detail)),
        }
    }
}

/// Image to text, through whichever detector was configured at startup
#[derive(Clone)]
pub struct OcrAdapter {
    detector: Option<Arc<dyn TextDetector>>,
}

impl OcrAdapter {
    pub fn new(detector: Arc<dyn TextDetector>) -> Self {
        Self {
            detector: Some(detector),
        }
    }

    pub fn unconfigured() -> Self {
        Self { detector: None }
    }

    /// Connect the production detector, or stay unconfigured
    pub async fn from_settings(settings: &OcrSettings) -> Self {
        match TextractDetector::connect(settings).await {
            Some(detector) => Self::new(Arc::new(detector)),
            None => {
                warn!("AWS credentials not found; OCR disabled");
                Self::unconfigured()
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.detector.is_some()
    }

    pub async fn extract_text(&self, image: Vec<u8>) -> OcrOutcome {
        let Some(detector) = &self.detector else {
            return OcrOutcome::NotConfigured;
        };

        if image.is_empty() {
            return OcrOutcome::Failed(OcrError::EmptyImage.to_string());
        }

        debug!(provider = detector.provider(), bytes = image.len(), "Detecting text");
        match detector.detect_document_text(image).await {
            Ok(blocks) => OcrOutcome::Text(join_lines(&blocks)),
            Err(e) => {
                error!("Textract error: {}", e);
                OcrOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Join the text of LINE blocks with `\n`
pub fn join_lines(blocks: &[TextBlock]) -> String {
    blocks
        .iter()
        .filter(|block| block.kind == BlockKind::Line)
        .filter_map(|block| block.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n")
}
