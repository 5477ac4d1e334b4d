//! Medication entity extraction
//!
//! Three sources feed one deduplicated result: a general NER model, an
//! optional biomedical NER model and the regex/keyword pattern pass.

pub mod batch;
pub mod engine;
pub mod patterns;
pub mod recognizer;
pub mod registry;

pub use batch::process_batch;
pub use engine::{EngineError, ExtractionEngine};
pub use recognizer::{
    EntityRecognizer, RecognizedEntity, RecognizerError, TokenClassifier, UnavailableRecognizer,
};
pub use registry::{ModelRegistry, GENERAL_SOURCE, MEDICAL_SOURCE};
