// 🏨 Tracked Hotels - Which packages to price, and where to find them
//
// Each tracked hotel expands into processing units (airport × nights × month).
// URLs are built from the site's destination path, hotel slug and numeric
// airport id.

use crate::aggregate::{HotelProfile, MonthKey, ProcessingUnit};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const SITE_BASE_URL: &str = "https://www.jet2holidays.com";

/// Airport used when a hotel names a code the registry doesn't know
const FALLBACK_AIRPORT: &str = "MAN";

// ============================================================================
// AIRPORT REGISTRY
// ============================================================================

/// AirportRegistry - IATA code → the site's numeric airport id
pub struct AirportRegistry {
    ids: HashMap<String, String>,
}

impl AirportRegistry {
    pub fn new() -> Self {
        let ids = [
            ("LBA", "4"),
            ("MAN", "8"),
            ("EMA", "3"),
            ("BHX", "1"),
            ("EDI", "9"),
            ("GLA", "69"),
            ("NCL", "5"),
            ("STN", "7"),
            ("BFS", "63"),
            ("BRS", "77"),
            ("LGW", "99"),
            ("LTN", "127"),
            ("LPL", "98"),
            ("BOH", "118"),
        ]
        .into_iter()
        .map(|(code, id)| (code.to_string(), id.to_string()))
        .collect();

        AirportRegistry { ids }
    }

    /// Site id for an airport code (case-insensitive)
    pub fn get(&self, code: &str) -> Option<&str> {
        self.ids.get(&code.to_uppercase()).map(String::as_str)
    }

    /// Site id, falling back to Manchester for unknown codes
    pub fn site_id(&self, code: &str) -> &str {
        self.get(code)
            .or_else(|| self.get(FALLBACK_AIRPORT))
            .unwrap_or("8")
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }
}

impl Default for AirportRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TRACKED HOTEL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedHotel {
    pub name: String,

    /// Last URL segment (e.g. "zafiro-palace-alcudia")
    pub slug: String,

    /// Path between the site root and the slug (e.g. "balearics/majorca/alcudia")
    pub destination_path: String,

    /// Display label (e.g. "Majorca, Spain")
    pub destination_label: String,

    #[serde(default)]
    pub stars: Option<u8>,

    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default = "default_airports")]
    pub airports: Vec<String>,

    #[serde(default = "default_nights")]
    pub nights: Vec<u32>,
}

fn default_airports() -> Vec<String> {
    vec![FALLBACK_AIRPORT.to_string()]
}

fn default_nights() -> Vec<u32> {
    vec![7]
}

impl TrackedHotel {
    pub fn profile(&self) -> HotelProfile {
        HotelProfile {
            name: self.name.clone(),
            destination: self.destination_label.clone(),
            stars: self.stars,
            rating: self.rating,
        }
    }

    /// Package page for two adults departing from `airport` for `nights`
    pub fn package_url(&self, airports: &AirportRegistry, airport: &str, nights: u32) -> String {
        format!(
            "{}/{}/{}?airport={}&nights={}&adults=2&children=0&infants=0",
            SITE_BASE_URL,
            self.destination_path.trim_matches('/'),
            self.slug.trim_matches('/'),
            airports.site_id(airport),
            nights
        )
    }

    /// Every unit for this hotel over the given months
    ///
    /// Ordered airport, then duration, then month.
    pub fn plan_units(&self, months: &[MonthKey]) -> Vec<ProcessingUnit> {
        let mut units = Vec::new();
        for airport in &self.airports {
            for &nights in &self.nights {
                for &month in months {
                    units.push(ProcessingUnit {
                        hotel: self.name.clone(),
                        airport: airport.to_uppercase(),
                        nights,
                        month,
                    });
                }
            }
        }
        units
    }
}

/// The hotels tracked out of the box
pub fn default_hotels() -> Vec<TrackedHotel> {
    vec![
        TrackedHotel {
            name: "Sunwing Alcudia Beach".to_string(),
            slug: "alcudia-beach".to_string(),
            destination_path: "balearics/majorca/alcudia".to_string(),
            destination_label: "Majorca, Spain".to_string(),
            stars: Some(4),
            rating: Some(4.3),
            airports: vec!["MAN".to_string(), "LBA".to_string()],
            nights: vec![7],
        },
        TrackedHotel {
            name: "Hotel Flamingo Oasis".to_string(),
            slug: "flamingo-beach-resort".to_string(),
            destination_path: "spain/costa-blanca/benidorm".to_string(),
            destination_label: "Benidorm, Spain".to_string(),
            stars: Some(4),
            rating: Some(4.1),
            airports: vec!["MAN".to_string()],
            nights: vec![7],
        },
        TrackedHotel {
            name: "Zafiro Palace Alcudia".to_string(),
            slug: "zafiro-palace-alcudia".to_string(),
            destination_path: "balearics/majorca/alcudia".to_string(),
            destination_label: "Majorca, Spain".to_string(),
            stars: Some(5),
            rating: Some(4.7),
            airports: vec!["MAN".to_string(), "LBA".to_string()],
            nights: vec![7, 10],
        },
    ]
}

/// Load a hotel list from JSON
pub fn load_hotels<P: AsRef<Path>>(path: P) -> Result<Vec<TrackedHotel>> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read hotels file: {:?}", path.as_ref()))?;

    serde_json::from_str(&content).context("Failed to parse hotels JSON")
}

// ============================================================================
// TESTS
// ============================================================================
