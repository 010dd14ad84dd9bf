// ⚙️ Extraction Config - Rules as data
// Every threshold, vocabulary and alias list the engine consults lives here
//
// Defaults reproduce the values observed on the live site. A JSON overlay
// replaces only the fields it names.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// KEYWORD VOCABULARY
// ============================================================================

/// KeywordEntry - A canonical label plus the spellings that map to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordEntry {
    /// Label written into records (e.g. "Bed & Breakfast")
    pub label: String,

    /// Spellings recognised in page text; empty means the label itself
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl KeywordEntry {
    pub fn new(label: impl Into<String>) -> Self {
        KeywordEntry {
            label: label.into(),
            patterns: Vec::new(),
        }
    }

    /// Builder: add an alternative spelling
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    /// Every spelling to search for, the label included
    pub fn spellings(&self) -> Vec<&str> {
        let mut spellings = vec![self.label.as_str()];
        spellings.extend(self.patterns.iter().map(String::as_str));
        spellings
    }
}

// ============================================================================
// EXTRACTION CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    // ========================================================================
    // PLAUSIBILITY (validator)
    // ========================================================================
    /// Inclusive lower bound of a genuine per-person price
    pub min_plausible_price: f64,

    /// Inclusive upper bound of a genuine per-person price
    pub max_plausible_price: f64,

    /// Whole-pound values seen in banners rather than as package prices
    pub promotional_values: Vec<i64>,

    // ========================================================================
    // STRUCTURED TRAVERSAL
    // ========================================================================
    /// A price field must exceed this to make its node a record
    pub structured_noise_floor: f64,

    /// Nodes this many levels below the root are never visited
    pub max_depth: usize,

    pub price_fields: Vec<String>,
    pub date_fields: Vec<String>,
    pub room_fields: Vec<String>,
    pub board_fields: Vec<String>,

    /// Shortest string accepted as a room label
    pub room_label_min_len: usize,

    /// Longest string accepted as a room label
    pub room_label_max_len: usize,

    /// Departure dates are truncated to this many characters
    pub date_max_len: usize,

    // ========================================================================
    // TEXT EXTRACTION
    // ========================================================================
    pub room_types: Vec<KeywordEntry>,
    pub board_bases: Vec<KeywordEntry>,

    /// Fragments containing any of these words are skipped
    pub promotional_words: Vec<String>,

    /// Class-name fragments marking a room/card/package grouping
    pub grouping_hints: Vec<String>,

    /// How many ancestors to climb looking for a grouping container
    pub max_ancestor_hops: usize,

    /// Markers that must follow an amount in main-content fallback
    pub per_person_markers: Vec<String>,

    // ========================================================================
    // AVAILABILITY
    // ========================================================================
    pub unavailability_phrases: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            min_plausible_price: 100.0,
            max_plausible_price: 20_000.0,
            promotional_values: vec![25, 50, 100, 150, 200],

            structured_noise_floor: 50.0,
            max_depth: 8,
            price_fields: strings(&[
                "pricePerPerson",
                "price",
                "leadInPrice",
                "pricePP",
                "fromPrice",
                "totalPricePerPerson",
                "adultPrice",
            ]),
            date_fields: strings(&["departureDate", "date", "outboundDate"]),
            room_fields: strings(&["roomType", "roomDescription", "name"]),
            board_fields: strings(&["boardBasis", "mealPlan", "board"]),
            room_label_min_len: 3,
            room_label_max_len: 60,
            date_max_len: 10,

            room_types: [
                "Standard",
                "Superior",
                "Family",
                "Suite",
                "Sea View",
                "Deluxe",
                "Premium",
                "Junior Suite",
                "Classic",
                "Studio",
                "Double",
                "Twin",
                "Single",
                "Economy",
                "Garden View",
                "Pool View",
            ]
            .into_iter()
            .map(KeywordEntry::new)
            .collect(),
            board_bases: vec![
                KeywordEntry::new("Self Catering").with_pattern("Self-Catering"),
                KeywordEntry::new("Bed & Breakfast")
                    .with_pattern("Bed and Breakfast")
                    .with_pattern("B&B"),
                KeywordEntry::new("Half Board"),
                KeywordEntry::new("Full Board"),
                KeywordEntry::new("All Inclusive").with_pattern("All-Inclusive"),
            ],
            promotional_words: strings(&["save", "off", "discount", "was "]),
            grouping_hints: strings(&["room", "card", "package", "result", "item"]),
            max_ancestor_hops: 6,
            per_person_markers: strings(&["pp", "per person"]),

            unavailability_phrases: strings(&[
                "no availability",
                "no holidays found",
                "currently unavailable",
                "no results",
                "sorry, there are no",
                "no packages available",
            ]),
        }
    }
}

impl ExtractionConfig {
    /// Load a JSON overlay on top of the defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: ExtractionConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot honour
    pub fn validate(&self) -> Result<()> {
        if !self.min_plausible_price.is_finite() || !self.max_plausible_price.is_finite() {
            return Err(anyhow!("Plausibility bounds must be finite"));
        }

        if self.min_plausible_price > self.max_plausible_price {
            return Err(anyhow!(
                "min_plausible_price ({}) exceeds max_plausible_price ({})",
                self.min_plausible_price,
                self.max_plausible_price
            ));
        }

        if !self.structured_noise_floor.is_finite() {
            return Err(anyhow!("structured_noise_floor must be finite"));
        }

        if self.max_depth == 0 {
            return Err(anyhow!("max_depth must be at least 1"));
        }

        if self.price_fields.is_empty() {
            return Err(anyhow!("price_fields must name at least one field"));
        }

        if self.room_label_min_len > self.room_label_max_len {
            return Err(anyhow!(
                "room_label_min_len ({}) exceeds room_label_max_len ({})",
                self.room_label_min_len,
                self.room_label_max_len
            ));
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractionConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.promotional_values, vec![25, 50, 100, 150, 200]);
        assert_eq!(config.price_fields[0], "pricePerPerson");
    }

    #[test]
    fn test_overlay_keeps_unnamed_defaults() {
        let config: ExtractionConfig =
            serde_json::from_str(r#"{"min_plausible_price": 80, "promotional_values": [99]}"#)
                .unwrap();

        assert_eq!(config.min_plausible_price, 80.0);
        assert_eq!(config.promotional_values, vec![99]);
        assert_eq!(config.max_plausible_price, 20_000.0);
        assert_eq!(config.room_types.len(), 16);
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let config = ExtractionConfig {
            min_plausible_price: 5000.0,
            max_plausible_price: 100.0,
            ..ExtractionConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let config = ExtractionConfig {
            max_depth: 0,
            ..ExtractionConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_reads_overlay() {
        let path = std::env::temp_dir().join("holiday_pricing_config_overlay.json");
        fs::write(&path, r#"{"max_plausible_price": 9000}"#).unwrap();

        let config = ExtractionConfig::from_file(&path).unwrap();
        assert_eq!(config.max_plausible_price, 9000.0);
        assert_eq!(config.min_plausible_price, 100.0);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_keyword_entry_spellings() {
        let entry = KeywordEntry::new("Bed & Breakfast").with_pattern("B&B");
        assert_eq!(entry.spellings(), vec!["Bed & Breakfast", "B&B"]);
    }
}
