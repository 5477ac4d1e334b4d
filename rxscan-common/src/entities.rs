//! Medication entity containers
//!
//! The four semantic containers (medications, doses, routes, frequencies)
//! are ordered sets. Identity is exact string equality, so `"Oral"` and
//! `"oral"` are distinct entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Identifier used for batch items that arrive without an `id`
pub const UNKNOWN_ID: &str = "unknown";

/// Target category of an extracted entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    Medication,
    Dose,
    Route,
    Frequency,
}

impl EntityCategory {
    /// Map a domain-model entity-group label onto a target category.
    ///
    /// Matching is case-insensitive. Labels outside the mapping
    /// (`medication`/`drug`, `dose`, `route`, `frequency`) return `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "medication" | "drug" => Some(Self::Medication),
            "dose" => Some(Self::Dose),
            "route" => Some(Self::Route),
            "frequency" => Some(Self::Frequency),
            _ => None,
        }
    }
}

/// Deduplicated medication entities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationEntities {
    #[serde(default)]
    pub medications: BTreeSet<String>,
    #[serde(default)]
    pub doses: BTreeSet<String>,
    #[serde(default)]
    pub routes: BTreeSet<String>,
    #[serde(default)]
    pub frequencies: BTreeSet<String>,
}

impl MedicationEntities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value into the container for `category`.
    ///
    /// Blank values are ignored. Returns `true` if the value was not
    /// already present.
    pub fn insert(&mut self, category: EntityCategory, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.trim().is_empty() {
            return false;
        }
        self.container_mut(category).insert(value)
    }

    fn container_mut(&mut self, category: EntityCategory) -> &mut BTreeSet<String> {
        match category {
            EntityCategory::Medication => &mut self.medications,
            EntityCategory::Dose => &mut self.doses,
            EntityCategory::Route => &mut self.routes,
            EntityCategory::Frequency => &mut self.frequencies,
        }
    }

    /// Union `other` into `self`
    pub fn merge(&mut self, other: MedicationEntities) {
        self.medications.extend(other.medications);
        self.doses.extend(other.doses);
        self.routes.extend(other.routes);
        self.frequencies.extend(other.frequencies);
    }

    /// True when all four containers are empty
    pub fn is_empty(&self) -> bool {
        self.medications.is_empty()
            && self.doses.is_empty()
            && self.routes.is_empty()
            && self.frequencies.is_empty()
    }
}

/// Per-request extraction result
///
/// `raw_text` is always populated. `error` carries a diagnostic when the
/// extraction degraded because of an internal fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(flatten)]
    pub entities: MedicationEntities,
    pub raw_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    pub fn new(raw_text: impl Into<String>, entities: MedicationEntities) -> Self {
        Self {
            entities,
            raw_text: raw_text.into(),
            error: None,
        }
    }

    /// Empty containers, raw text preserved, diagnostic attached
    pub fn degraded(raw_text: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            entities: MedicationEntities::default(),
            raw_text: raw_text.into(),
            error: Some(error.into()),
        }
    }
}

/// Batch result tagged with the caller's identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub id: Value,
    #[serde(flatten)]
    pub result: ExtractionResult,
}

impl BatchItem {
    pub fn new(id: Option<Value>, result: ExtractionResult) -> Self {
        Self {
            id: id.unwrap_or_else(|| Value::String(UNKNOWN_ID.to_string())),
            result,
        }
    }
}
