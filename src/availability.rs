// 🚫 Availability Detector - Recognises "no availability" pages
// Case-insensitive substring match of known negative phrases

use crate::config::ExtractionConfig;

pub struct AvailabilityDetector {
    phrases: Vec<String>,
}

impl AvailabilityDetector {
    pub fn new(config: &ExtractionConfig) -> Self {
        AvailabilityDetector {
            phrases: config
                .unavailability_phrases
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// First known negative phrase found in the page text
    pub fn matching_phrase(&self, page_text: &str) -> Option<&str> {
        let text = page_text.to_lowercase();
        self.phrases
            .iter()
            .find(|phrase| text.contains(phrase.as_str()))
            .map(String::as_str)
    }

    pub fn states_unavailable(&self, page_text: &str) -> bool {
        self.matching_phrase(page_text).is_some()
    }
}
