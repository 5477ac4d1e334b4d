// Pattern Pass - Regex and Keyword Matching
//
// Dose strings come from a case-insensitive regex; frequencies and routes
// from case-insensitive substring search over fixed vocabularies. Keyword
// hits are recorded with the vocabulary spelling, not the spelling found
// in the text.

use once_cell::sync::Lazy;
use regex::Regex;
use rxscan_common::{EntityCategory, MedicationEntities};

/// Positive integer, optional whitespace, then a unit
static DOSE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+\s*(mg|ml|g|mcg|units?|tablets?|capsules?)")
        .expect("dose pattern is a valid regex")
});

/// Frequency phrases, searched as substrings
pub const FREQUENCY_KEYWORDS: &[&str] = &[
    "once daily",
    "twice daily",
    "thrice daily",
    "every 6 hours",
    "every 8 hours",
    "every 12 hours",
    "as needed",
    "bd",
    "tid",
    "qid",
];

/// Administration routes, searched as substrings
pub const ROUTE_KEYWORDS: &[&str] = &[
    "oral",
    "iv",
    "im",
    "subcutaneous",
    "topical",
    "inhalation",
    "rectal",
    "transdermal",
    "po",
    "sc",
];

/// Every dose-pattern match in `text`, in order of appearance
pub fn find_doses(text: &str) -> Vec<&str> {
    DOSE_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Vocabulary entries that occur anywhere in `text`, ignoring case
pub fn find_keywords(text: &str, vocabulary: &[&'static str]) -> Vec<&'static str> {
    let haystack = text.to_lowercase();
    vocabulary
        .iter()
        .copied()
        .filter(|keyword| haystack.contains(&keyword.to_lowercase()))
        .collect()
}

/// Run the whole pattern pass
pub fn pattern_entities(text: &str) -> MedicationEntities {
    let mut entities = MedicationEntities::new();

    for dose in find_doses(text) {
        entities.insert(EntityCategory::Dose, dose);
    }
    for frequency in find_keywords(text, FREQUENCY_KEYWORDS) {
        entities.insert(EntityCategory::Frequency, frequency);
    }
    for route in find_keywords(text, ROUTE_KEYWORDS) {
        entities.insert(EntityCategory::Route, route);
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dose_with_and_without_space() {
        assert_eq!(find_doses("Paracetamol 500mg"), vec!["500mg"]);
        assert_eq!(find_doses("Ibuprofen 200 mg"), vec!["200 mg"]);
    }

    #[test]
    fn test_dose_units() {
        let text = "5 ml syrup, 2 tablets, 1 capsule, 250mcg, 10 Units, 1g";
        assert_eq!(
            find_doses(text),
            vec!["5 ml", "2 tablets", "1 capsule", "250mcg", "10 Units", "1g"]
        );
    }

    #[test]
    fn test_dose_case_insensitive() {
        assert_eq!(find_doses("Amoxicillin 500MG"), vec!["500MG"]);
    }

    #[test]
    fn test_no_dose_without_number() {
        assert!(find_doses("take some mg later").is_empty());
    }

    #[test]
    fn test_frequency_keywords() {
        let found = find_keywords("Take TWICE DAILY and as needed", FREQUENCY_KEYWORDS);
        assert_eq!(found, vec!["twice daily", "as needed"]);
    }

    #[test]
    fn test_route_substring_semantics() {
        // "po" and "sc" are plain substrings, so they also hit inside words
        let found = find_keywords("Apply topical cream, post-op", ROUTE_KEYWORDS);
        assert!(found.contains(&"topical"));
        assert!(found.contains(&"po"));
    }

    #[test]
    fn test_pattern_entities_sample() {
        let entities = pattern_entities("Paracetamol 500mg twice daily oral");
        assert!(entities.doses.contains("500mg"));
        assert!(entities.frequencies.contains("twice daily"));
        assert!(entities.routes.contains("oral"));
        assert!(entities.medications.is_empty());
    }

    #[test]
    fn test_pattern_entities_deduplicate() {
        let entities = pattern_entities("500mg in the morning, 500mg at night, oral, oral");
        assert_eq!(entities.doses.len(), 1);
        assert_eq!(entities.routes.iter().filter(|r| *r == "oral").count(), 1);
    }

    #[test]
    fn test_pattern_entities_empty_for_plain_text() {
        assert!(pattern_entities("Hello there").is_empty());
    }
}
