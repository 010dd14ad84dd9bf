// 📝 Text Extractor - Recognises price mentions in rendered page text
//
// Two strategies, first non-empty result wins:
// 1. Targeted element scan over pre-filtered fragments, with room/board/date
//    inferred from the nearest grouping container
// 2. Main-content fallback accepting only amounts marked per person
//
// The collaborator hands over plain text plus ancestor context; nothing here
// touches a live page.

use crate::config::{ExtractionConfig, KeywordEntry};
use crate::extractor::PriceExtractor;
use crate::record::{PriceRecord, Provenance};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::debug;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// "£" + digits, optional thousands separators, optional pence
const AMOUNT_PATTERN: &str = r"£\s?(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d{2}))?";

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const DATE_PATTERN: &str =
    r"(?i)\b(\d{1,2})\s*(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.?,?\s*(\d{4})\b";

// ============================================================================
// SNAPSHOT TYPES
// ============================================================================

/// ContextNode - One ancestor of a price element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextNode {
    /// Structural class names of the container (e.g. "room-card__body")
    #[serde(default)]
    pub class_hint: String,

    /// Full text content of the container
    #[serde(default)]
    pub text: String,
}

impl ContextNode {
    pub fn new(class_hint: impl Into<String>, text: impl Into<String>) -> Self {
        ContextNode {
            class_hint: class_hint.into(),
            text: text.into(),
        }
    }
}

/// ElementFragment - Text of one candidate price element
///
/// Navigation, header, footer and banner regions are excluded by the
/// collaborator before fragments reach the extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementFragment {
    pub text: String,

    /// Ancestor chain, nearest first
    #[serde(default)]
    pub ancestors: Vec<ContextNode>,
}

impl ElementFragment {
    pub fn new(text: impl Into<String>) -> Self {
        ElementFragment {
            text: text.into(),
            ancestors: Vec::new(),
        }
    }

    /// Builder: append the next ancestor outward
    pub fn with_ancestor(mut self, ancestor: ContextNode) -> Self {
        self.ancestors.push(ancestor);
        self
    }
}

/// TextSnapshot - Everything the renderer captured for one unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextSnapshot {
    #[serde(default)]
    pub fragments: Vec<ElementFragment>,

    /// Text of the first main-content container, if one matched
    #[serde(default)]
    pub main_content: Option<String>,
}

// ============================================================================
// KEYWORD MATCHER
// ============================================================================

/// KeywordMatcher - Finds the first vocabulary keyword in a text blob
///
/// Leftmost occurrence wins; at the same position the longer spelling wins,
/// so "Junior Suite" beats "Suite".
pub struct KeywordMatcher {
    regex: Option<Regex>,
    labels: HashMap<String, String>,
}

impl KeywordMatcher {
    pub fn new(vocabulary: &[KeywordEntry]) -> Result<Self> {
        let mut spellings: Vec<(&str, &str)> = vocabulary
            .iter()
            .flat_map(|entry| {
                entry
                    .spellings()
                    .into_iter()
                    .map(move |spelling| (spelling, entry.label.as_str()))
            })
            .filter(|(spelling, _)| !spelling.trim().is_empty())
            .collect();

        spellings.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut labels = HashMap::new();
        let mut alternatives = Vec::new();
        for (spelling, label) in spellings {
            labels
                .entry(normalize_keyword(spelling))
                .or_insert_with(|| label.to_string());
            let words: Vec<String> = spelling.split_whitespace().map(regex::escape).collect();
            alternatives.push(words.join(r"\s+"));
        }

        let regex = if alternatives.is_empty() {
            None
        } else {
            let pattern = format!(r"(?i)\b({})\b", alternatives.join("|"));
            Some(Regex::new(&pattern).context("Failed to compile keyword vocabulary")?)
        };

        Ok(KeywordMatcher { regex, labels })
    }

    /// Canonical label of the first keyword in `text`
    pub fn find(&self, text: &str) -> Option<&str> {
        let caps = self.regex.as_ref()?.captures(text)?;
        let matched = caps.get(1)?.as_str();
        self.labels.get(&normalize_keyword(matched)).map(String::as_str)
    }
}

fn normalize_keyword(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn word_list_pattern(words: &[String]) -> Option<String> {
    let alternatives: Vec<String> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(|w| {
            w.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect();

    (!alternatives.is_empty()).then(|| alternatives.join("|"))
}

fn parse_amount(caps: &Captures) -> Option<f64> {
    let whole = caps.get(1)?.as_str().replace(',', "");
    let amount = match caps.get(2) {
        Some(pence) => format!("{}.{}", whole, pence.as_str()),
        None => whole,
    };
    amount.parse::<f64>().ok()
}

// ============================================================================
// TEXT EXTRACTOR
// ============================================================================

pub struct TextExtractor {
    amount: Regex,
    per_person: Option<Regex>,
    date: Regex,
    promotional_words: Vec<String>,
    rooms: KeywordMatcher,
    boards: KeywordMatcher,
    grouping_hints: Vec<String>,
    max_ancestor_hops: usize,
}

impl TextExtractor {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let amount = Regex::new(AMOUNT_PATTERN).context("Failed to compile amount pattern")?;
        let date = Regex::new(DATE_PATTERN).context("Failed to compile date pattern")?;

        let per_person = word_list_pattern(&config.per_person_markers)
            .map(|markers| Regex::new(&format!(r"(?i){}\s*(?:{})\b", AMOUNT_PATTERN, markers)))
            .transpose()
            .context("Failed to compile per-person pattern")?;

        Ok(TextExtractor {
            amount,
            per_person,
            date,
            promotional_words: config
                .promotional_words
                .iter()
                .filter(|word| !word.trim().is_empty())
                .map(|word| word.to_lowercase())
                .collect(),
            rooms: KeywordMatcher::new(&config.room_types)?,
            boards: KeywordMatcher::new(&config.board_bases)?,
            grouping_hints: config
                .grouping_hints
                .iter()
                .map(|hint| hint.to_lowercase())
                .collect(),
            max_ancestor_hops: config.max_ancestor_hops,
        })
    }

    /// Does this fragment carry promotional vocabulary?
    ///
    /// Plain case-insensitive containment, so "Savings" and "Discounted" count.
    pub fn is_promotional(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.promotional_words.iter().any(|word| text.contains(word.as_str()))
    }

    /// First valid day-month-year date, as `YYYY-Mon-DD`
    pub fn find_date(&self, text: &str) -> Option<String> {
        self.date.captures_iter(text).find_map(|caps| {
            let day: u32 = caps[1].parse().ok()?;
            let month_name = caps[2].to_lowercase();
            let month = MONTHS.iter().position(|m| *m == month_name)? as u32 + 1;
            let year: i32 = caps[3].parse().ok()?;
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            Some(date.format("%Y-%b-%d").to_string())
        })
    }

    /// Strategy 1: every amount in every non-promotional fragment
    pub fn scan_fragments(&self, fragments: &[ElementFragment]) -> Vec<PriceRecord> {
        let mut found = Vec::new();

        for fragment in fragments {
            if self.is_promotional(&fragment.text) {
                debug!("skipping promotional fragment: {}", fragment.text.trim());
                continue;
            }

            for caps in self.amount.captures_iter(&fragment.text) {
                let Some(record) = parse_amount(&caps).and_then(|p| PriceRecord::new(p, self.provenance()))
                else {
                    continue;
                };
                found.push(self.with_context(record, fragment));
            }
        }

        found
    }

    /// Strategy 2: per-person amounts in the main content container
    pub fn scan_main_content(&self, text: &str) -> Vec<PriceRecord> {
        let Some(per_person) = &self.per_person else {
            return Vec::new();
        };

        per_person
            .captures_iter(text)
            .filter_map(|caps| parse_amount(&caps))
            .filter_map(|price| PriceRecord::new(price, self.provenance()))
            .collect()
    }

    /// Text of the nearest grouping container within the hop limit
    fn grouping_context<'a>(&self, fragment: &'a ElementFragment) -> Option<&'a str> {
        fragment
            .ancestors
            .iter()
            .take(self.max_ancestor_hops)
            .find(|ancestor| {
                let class_hint = ancestor.class_hint.to_lowercase();
                self.grouping_hints.iter().any(|hint| class_hint.contains(hint))
            })
            .map(|ancestor| ancestor.text.as_str())
    }

    fn with_context(&self, record: PriceRecord, fragment: &ElementFragment) -> PriceRecord {
        let blobs: Vec<&str> = match self.grouping_context(fragment) {
            Some(container) => vec![container, fragment.text.as_str()],
            None => vec![fragment.text.as_str()],
        };

        let room = blobs.iter().find_map(|blob| self.rooms.find(blob));
        let board = blobs.iter().find_map(|blob| self.boards.find(blob));
        let date = blobs.iter().find_map(|blob| self.find_date(blob));

        record
            .with_room_type(room.unwrap_or_default())
            .with_board_basis(board.unwrap_or_default())
            .with_departure_date(date.unwrap_or_default())
    }
}

impl PriceExtractor for TextExtractor {
    type Input = TextSnapshot;

    fn extract(&self, input: &TextSnapshot) -> Vec<PriceRecord> {
        let targeted = self.scan_fragments(&input.fragments);
        if !targeted.is_empty() {
            return targeted;
        }

        match &input.main_content {
            Some(text) => self.scan_main_content(text),
            None => Vec::new(),
        }
    }

    fn provenance(&self) -> Provenance {
        Provenance::Text
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TextExtractor {
        TextExtractor::new(&ExtractionConfig::default()).unwrap()
    }

    #[test]
    fn test_promotional_fragment_skipped() {
        let snapshot = TextSnapshot {
            fragments: vec![ElementFragment::new("Save £50 today! Now £1,234.56pp")],
            main_content: None,
        };

        assert!(extractor().extract(&snapshot).is_empty());
    }

    #[test]
    fn test_promotional_words_match_inside_longer_words() {
        let ex = extractor();

        assert!(ex.is_promotional("Was £899, now £799"));
        assert!(ex.is_promotional("£100 OFF selected dates"));
        assert!(ex.is_promotional("Saver deal £599"));
        assert!(!ex.is_promotional("Family Room from £812"));
        assert!(!ex.is_promotional("Sea views, wasabi bar"));

        let snapshot = TextSnapshot {
            fragments: vec![
                ElementFragment::new("Savings of £300 on Family rooms"),
                ElementFragment::new("Discounted: £799"),
            ],
            main_content: None,
        };
        assert!(ex.extract(&snapshot).is_empty());
    }

    #[test]
    fn test_amounts_with_separators_and_pence() {
        let snapshot = TextSnapshot {
            fragments: vec![ElementFragment::new("£1,234.56 or £899 or £ 2,100")],
            main_content: None,
        };

        let prices: Vec<f64> = extractor()
            .extract(&snapshot)
            .iter()
            .map(PriceRecord::price)
            .collect();
        assert_eq!(prices, vec![1234.56, 899.0, 2100.0]);
    }

    #[test]
    fn test_context_from_grouping_ancestor() {
        let fragment = ElementFragment::new("£734pp")
            .with_ancestor(ContextNode::new("price__value", "£734pp"))
            .with_ancestor(ContextNode::new(
                "room-card",
                "Junior Suite - Half Board - departing 2 Jun 2026 - £734pp",
            ));

        let records = extractor().extract(&TextSnapshot {
            fragments: vec![fragment],
            main_content: None,
        });

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].room_type, "Junior Suite");
        assert_eq!(records[0].board_basis, "Half Board");
        assert_eq!(records[0].departure_date, "2026-Jun-02");
        assert_eq!(records[0].provenance, Provenance::Text);
    }

    #[test]
    fn test_grouping_ancestor_beyond_hop_limit_ignored() {
        let mut fragment = ElementFragment::new("£640");
        for _ in 0..6 {
            fragment = fragment.with_ancestor(ContextNode::new("wrapper", "£640"));
        }
        fragment = fragment.with_ancestor(ContextNode::new("result-item", "Family Room, All Inclusive"));

        let records = extractor().extract(&TextSnapshot {
            fragments: vec![fragment],
            main_content: None,
        });

        assert_eq!(records[0].room_type, "Standard");
        assert_eq!(records[0].board_basis, "Unknown");
    }

    #[test]
    fn test_fragment_text_fills_fields_missing_from_container() {
        let fragment = ElementFragment::new("Half Board £689pp")
            .with_ancestor(ContextNode::new("room-card", "Deluxe room with balcony"));

        let records = extractor().extract(&TextSnapshot {
            fragments: vec![fragment],
            main_content: None,
        });

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].room_type, "Deluxe");
        assert_eq!(records[0].board_basis, "Half Board");
    }

    #[test]
    fn test_configured_vocabulary_and_hop_limit() {
        let config = ExtractionConfig {
            room_types: vec![KeywordEntry::new("Swim-Up Suite").with_pattern("Swim Up")],
            max_ancestor_hops: 1,
            ..ExtractionConfig::default()
        };
        let ex = TextExtractor::new(&config).unwrap();

        let near = ElementFragment::new("£910")
            .with_ancestor(ContextNode::new("package-card", "Swim Up Suite or Standard"));
        let far = ElementFragment::new("£920")
            .with_ancestor(ContextNode::new("price", "£920"))
            .with_ancestor(ContextNode::new("package-card", "Swim Up Suite, Full Board"));

        let records = ex.extract(&TextSnapshot {
            fragments: vec![near, far],
            main_content: None,
        });

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].room_type, "Swim-Up Suite");
        assert_eq!(records[1].room_type, "Standard");
        assert_eq!(records[1].board_basis, "Unknown");
    }

    #[test]
    fn test_board_aliases() {
        let ex = extractor();
        assert_eq!(ex.boards.find("room only or b&b available"), Some("Bed & Breakfast"));
        assert_eq!(ex.boards.find("Bed and Breakfast"), Some("Bed & Breakfast"));
        assert_eq!(ex.boards.find("nothing here"), None);
    }

    #[test]
    fn test_room_keyword_leftmost_wins() {
        let ex = extractor();
        assert_eq!(ex.rooms.find("Superior Sea View"), Some("Superior"));
        assert_eq!(ex.rooms.find("Our junior  suite sleeps 3"), Some("Junior Suite"));
        assert_eq!(ex.rooms.find("Twinkle lights"), None);
    }

    #[test]
    fn test_find_date_rejects_impossible_days() {
        let ex = extractor();
        assert_eq!(ex.find_date("31 Feb 2026 or 14 March 2026"), Some("2026-Mar-14".to_string()));
        assert_eq!(ex.find_date("no dates"), None);
    }

    #[test]
    fn test_main_content_fallback_requires_per_person_marker() {
        let snapshot = TextSnapshot {
            fragments: vec![],
            main_content: Some("Total £1,468 for 2. From £734 pp. Or £689 per person.".to_string()),
        };

        let records = extractor().extract(&snapshot);
        let prices: Vec<f64> = records.iter().map(PriceRecord::price).collect();
        assert_eq!(prices, vec![734.0, 689.0]);
        assert!(records.iter().all(|r| r.room_type == "Standard" && r.board_basis == "Unknown"));
        assert!(records.iter().all(|r| r.departure_date.is_empty()));
    }

    #[test]
    fn test_fallback_not_used_when_fragments_yield_prices() {
        let snapshot = TextSnapshot {
            fragments: vec![ElementFragment::new("£812")],
            main_content: Some("From £500pp".to_string()),
        };

        let records = extractor().extract(&snapshot);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].price(), 812.0);
    }
}
