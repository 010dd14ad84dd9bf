// 📥 Captures - What the page collaborator hands to the engine
//
// CaptureFilter narrows intercepted responses the way the browser driver does
// (JSON content type + topical URL keyword). CaptureBundle is a recorded
// scrape on disk, replayable through the engine without a browser.

use crate::aggregate::{MonthKey, ProcessingUnit};
use crate::availability::AvailabilityDetector;
use crate::hotels::TrackedHotel;
use crate::payload::Node;
use crate::pipeline::UnitCapture;
use crate::text::{ElementFragment, TextSnapshot};
use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

// ============================================================================
// CAPTURE FILTER
// ============================================================================

pub struct CaptureFilter {
    url_keywords: Vec<String>,
}

impl CaptureFilter {
    pub fn new() -> Self {
        CaptureFilter {
            url_keywords: [
                "price", "avail", "package", "room", "search", "calendar", "holiday",
                "basket", "quote", "result",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }

    /// Should a response be handed to the structured extractor?
    pub fn accepts(&self, url: &str, content_type: &str) -> bool {
        if !content_type.to_lowercase().contains("json") {
            return false;
        }

        let url = url.to_lowercase();
        self.url_keywords.iter().any(|k| url.contains(k.as_str()))
    }
}

impl Default for CaptureFilter {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CAPTURE BUNDLE
// ============================================================================

/// UnitRecording - Everything recorded while one unit's page loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitRecording {
    pub airport: String,
    pub nights: u32,
    pub month: MonthKey,

    /// Decoded bodies, or raw body strings still to be decoded
    #[serde(default)]
    pub payloads: Vec<Value>,

    #[serde(default)]
    pub fragments: Vec<ElementFragment>,

    #[serde(default)]
    pub main_content: Option<String>,

    /// Visible page text, checked for unavailability phrases
    #[serde(default)]
    pub page_text: Option<String>,

    /// Explicit unavailability flag; wins over `page_text` when present
    #[serde(default)]
    pub unavailable: Option<bool>,
}

impl UnitRecording {
    pub fn unit(&self, hotel: &TrackedHotel) -> ProcessingUnit {
        ProcessingUnit {
            hotel: hotel.name.clone(),
            airport: self.airport.to_uppercase(),
            nights: self.nights,
            month: self.month,
        }
    }

    /// Decode payloads and resolve the availability signal
    ///
    /// Bodies that fail to decode are logged and skipped.
    pub fn to_capture(&self, availability: &AvailabilityDetector) -> UnitCapture {
        let payloads = self
            .payloads
            .iter()
            .filter_map(|payload| match payload {
                Value::String(body) => match Node::parse_str(body) {
                    Ok(node) => Some(node),
                    Err(e) => {
                        warn!(
                            "⚠️ skipping undecodable payload ({} {}N {}): {:#}",
                            self.airport, self.nights, self.month, e
                        );
                        None
                    }
                },
                other => Some(Node::from(other.clone())),
            })
            .collect();

        let unavailable = self.unavailable.unwrap_or_else(|| {
            self.page_text
                .as_deref()
                .is_some_and(|text| availability.states_unavailable(text))
        });

        UnitCapture {
            payloads,
            snapshot: TextSnapshot {
                fragments: self.fragments.clone(),
                main_content: self.main_content.clone(),
            },
            unavailable,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelCapture {
    pub hotel: TrackedHotel,

    #[serde(default)]
    pub units: Vec<UnitRecording>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureBundle {
    pub hotels: Vec<HotelCapture>,
}

impl CaptureBundle {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read capture bundle: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse capture bundle JSON")
    }

    pub fn unit_count(&self) -> usize {
        self.hotels.iter().map(|h| h.units.len()).sum()
    }
}

// ============================================================================
// TESTS
// ============================================================================
