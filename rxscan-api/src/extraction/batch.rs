//! Batch coordinator
//!
//! Items run sequentially through the engine and keep their input order.
//! Items that are not objects, or whose `text` is missing, non-string or
//! empty, are skipped without a placeholder.

use rxscan_common::BatchItem;
use serde_json::Value;
use tracing::{debug, warn};

use super::engine::ExtractionEngine;

/// Run every usable item of `prescriptions` through `engine`
pub async fn process_batch(engine: &ExtractionEngine, prescriptions: &[Value]) -> Vec<BatchItem> {
    let mut results = Vec::with_capacity(prescriptions.len());

    for (index, item) in prescriptions.iter().enumerate() {
        let Some(object) = item.as_object() else {
            debug!(index, "Skipping batch item that is not an object");
            continue;
        };

        let text = match object.get("text").and_then(Value::as_str) {
            Some(text) if !text.is_empty() => text,
            _ => {
                debug!(index, "Skipping batch item without text");
                continue;
            }
        };

        let result = engine.process(text).await;
        if let Some(error) = &result.error {
            warn!(index, "Batch item degraded: {}", error);
        }
        results.push(BatchItem::new(object.get("id").cloned(), result));
    }

    results
}
