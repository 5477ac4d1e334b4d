// Entity Extraction Engine - Three-Pass Merge
//
// Pass 1: general NER (PRODUCT/ORG spans become medication candidates)
// Pass 2: domain NER (label-mapped into the four containers; optional)
// Pass 3: dose regex + frequency/route keyword search
//
// Containers are sets, so merging the passes deduplicates as it goes.

use futures::FutureExt;
use rxscan_common::{EntityCategory, ExtractionResult, MedicationEntities};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::patterns::pattern_entities;
use super::recognizer::RecognizerError;
use super::registry::ModelRegistry;

/// General-NER labels treated as medication names
pub const GENERAL_MEDICATION_LABELS: &[&str] = &["PRODUCT", "ORG"];

/// Faults that abort a single extraction
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("General NER failed: {0}")]
    GeneralRecognizer(#[from] RecognizerError),
}

/// Entity extraction engine
#[derive(Clone)]
pub struct ExtractionEngine {
    models: Arc<ModelRegistry>,
}

impl ExtractionEngine {
    pub fn new(models: Arc<ModelRegistry>) -> Self {
        Self { models }
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    /// Process text into an [`ExtractionResult`]; never fails
    ///
    /// A recognizer that is not loaded contributes nothing, so the pattern
    /// pass still runs on a bare install. Any fault during extraction
    /// (including a panic inside a pass) yields empty containers plus `error`.
    pub async fn process(&self, text: &str) -> ExtractionResult {
        match AssertUnwindSafe(self.extract_entities(text))
            .catch_unwind()
            .await
        {
            Ok(Ok(entities)) => ExtractionResult::new(text, entities),
            Ok(Err(e)) => {
                error!("Error in NER processing: {}", e);
                ExtractionResult::degraded(text, e.to_string())
            }
            Err(_) => {
                error!("Entity extraction panicked");
                ExtractionResult::degraded(text, "Entity extraction failed unexpectedly")
            }
        }
    }

    /// Run the three passes and merge their output
    pub async fn extract_entities(&self, text: &str) -> Result<MedicationEntities, EngineError> {
        let text = text.trim();
        let mut entities = MedicationEntities::new();

        // Pass 1: general NER
        for entity in self.models.general().recognize(text).await? {
            let is_medication = GENERAL_MEDICATION_LABELS
                .iter()
                .any(|label| entity.entity_group.eq_ignore_ascii_case(label));
            if is_medication {
                entities.insert(EntityCategory::Medication, entity.word.trim());
            }
        }

        // Pass 2: domain NER, errors swallowed
        match self.models.medical().recognize(text).await {
            Ok(found) => {
                for entity in found {
                    if let Some(category) = EntityCategory::from_label(&entity.entity_group) {
                        entities.insert(category, entity.word.trim());
                    }
                }
            }
            Err(e) => warn!("Medical NER error: {}", e),
        }

        // Pass 3: patterns
        entities.merge(pattern_entities(text));

        debug!(
            medications = entities.medications.len(),
            doses = entities.doses.len(),
            routes = entities.routes.len(),
            frequencies = entities.frequencies.len(),
            "Extraction complete"
        );

        Ok(entities)
    }
}
