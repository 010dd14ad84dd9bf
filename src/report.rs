// 📄 Pricing Report - Persisted form of the hotel calendars
// Field names match the dashboard's pricing_data.json

use crate::aggregate::RoomPriceEntry;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthReport {
    pub month_key: String,
    pub month_label: String,
    pub rooms: BTreeMap<String, RoomPriceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelReport {
    pub name: String,
    pub destination: String,
    pub stars: Option<u8>,
    pub rating: Option<f64>,
    /// Chronological
    pub months: Vec<MonthReport>,
    /// Sorted, distinct across all months
    pub room_types: Vec<String>,
}

impl HotelReport {
    pub fn price_count(&self) -> usize {
        self.months.iter().map(|m| m.rooms.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingReport {
    pub hotels: Vec<HotelReport>,
    pub scraped_at: DateTime<Utc>,
    /// Room entries across all months and hotels
    pub total_prices: usize,
}

impl PricingReport {
    pub fn new(hotels: Vec<HotelReport>) -> Self {
        Self::at(hotels, Utc::now())
    }

    pub fn at(hotels: Vec<HotelReport>, scraped_at: DateTime<Utc>) -> Self {
        let total_prices = hotels.iter().map(HotelReport::price_count).sum();
        PricingReport {
            hotels,
            scraped_at,
            total_prices,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize pricing report")
    }

    /// Write the report, creating parent directories as needed
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
        }

        fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write report: {:?}", path))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Provenance;
    use chrono::TimeZone;
    use serde_json::Value;

    fn hotel(rooms: &[(&str, f64)]) -> HotelReport {
        let rooms = rooms
            .iter()
            .map(|(room, price)| {
                (
                    room.to_string(),
                    RoomPriceEntry {
                        airport: "MAN".to_string(),
                        nights: 7,
                        departure_date: String::new(),
                        room_type: room.to_string(),
                        board_basis: "All Inclusive".to_string(),
                        price_pp: *price,
                        source: Provenance::Structured,
                    },
                )
            })
            .collect();

        HotelReport {
            name: "Hotel Flamingo Oasis".to_string(),
            destination: "Benidorm, Spain".to_string(),
            stars: Some(4),
            rating: Some(4.1),
            months: vec![MonthReport {
                month_key: "2026-06".to_string(),
                month_label: "June 2026".to_string(),
                rooms,
            }],
            room_types: vec!["Standard".to_string()],
        }
    }

    #[test]
    fn test_total_prices_counts_room_entries() {
        let report = PricingReport::new(vec![
            hotel(&[("Standard", 600.0), ("Suite", 900.0)]),
            hotel(&[("Standard", 610.0)]),
        ]);

        assert_eq!(report.total_prices, 3);
    }

    #[test]
    fn test_json_field_names() {
        let scraped_at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        let report = PricingReport::at(vec![hotel(&[("Standard", 600.0)])], scraped_at);

        let value: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["total_prices"], 1);
        assert_eq!(value["scraped_at"], "2026-10-16T09:30:00Z");
        let hotel = &value["hotels"][0];
        assert_eq!(hotel["name"], "Hotel Flamingo Oasis");
        assert_eq!(hotel["destination"], "Benidorm, Spain");
        assert_eq!(hotel["room_types"][0], "Standard");
        let month = &hotel["months"][0];
        assert_eq!(month["month_key"], "2026-06");
        assert_eq!(month["month_label"], "June 2026");
        assert_eq!(month["rooms"]["Standard"]["price_pp"], 600.0);
    }

    #[test]
    fn test_write_to_creates_directories() {
        let dir = std::env::temp_dir().join("holiday_pricing_report_test");
        let path = dir.join("public").join("pricing_data.json");

        PricingReport::new(vec![]).write_to(&path).unwrap();

        let written: PricingReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.total_prices, 0);

        fs::remove_dir_all(&dir).ok();
    }
}
