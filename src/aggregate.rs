// 📊 Aggregator - Best price per room type, per month, per hotel
//
// Unit level: validated, deduplicated records fold into a MonthPriceTable,
// replacing an entry only when the new price is strictly lower.
// Hotel level: month tables fold into a HotelPriceCalendar keyed by month,
// finalised once into a HotelReport with sorted room types.

use crate::record::{Provenance, ValidatedRecord};
use crate::report::{HotelReport, MonthReport};
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ============================================================================
// MONTH KEY
// ============================================================================

/// MonthKey - A calendar month; orders chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| MonthKey { year, month })
    }

    /// Parse "YYYY-MM"
    pub fn parse(key: &str) -> Result<Self> {
        let (year, month) = key
            .trim()
            .split_once('-')
            .ok_or_else(|| anyhow!("Month key must look like YYYY-MM: {:?}", key))?;

        let year: i32 = year
            .parse()
            .with_context(|| format!("Invalid year in month key: {:?}", key))?;
        let month: u32 = month
            .parse()
            .with_context(|| format!("Invalid month in month key: {:?}", key))?;

        MonthKey::new(year, month).ok_or_else(|| anyhow!("Month out of range: {:?}", key))
    }

    /// Machine key, e.g. "2026-06"
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Human label, e.g. "June 2026"
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| self.key())
    }

    /// This month and the `count - 1` months after it
    pub fn range(start: MonthKey, count: usize) -> Vec<MonthKey> {
        let mut months = Vec::with_capacity(count);
        let mut current = start;
        for _ in 0..count {
            months.push(current);
            current = current.next();
        }
        months
    }

    pub fn next(&self) -> MonthKey {
        if self.month == 12 {
            MonthKey { year: self.year + 1, month: 1 }
        } else {
            MonthKey { year: self.year, month: self.month + 1 }
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl Serialize for MonthKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        MonthKey::parse(&key).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// PROCESSING UNIT
// ============================================================================

/// ProcessingUnit - One (hotel, airport, duration, month) combination
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessingUnit {
    pub hotel: String,
    pub airport: String,
    pub nights: u32,
    pub month: MonthKey,
}

impl fmt::Display for ProcessingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}N | {}", self.hotel, self.airport, self.nights, self.month)
    }
}

// ============================================================================
// ROOM PRICE ENTRY
// ============================================================================

/// RoomPriceEntry - Cheapest observation for one room type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomPriceEntry {
    pub airport: String,
    pub nights: u32,
    pub departure_date: String,
    pub room_type: String,
    pub board_basis: String,
    pub price_pp: f64,
    pub source: Provenance,
}

impl RoomPriceEntry {
    fn from_record(record: &ValidatedRecord, unit: &ProcessingUnit) -> Self {
        RoomPriceEntry {
            airport: unit.airport.clone(),
            nights: unit.nights,
            departure_date: record.departure_date.clone(),
            room_type: record.room_type.clone(),
            board_basis: record.board_basis.clone(),
            price_pp: record.price(),
            source: record.provenance,
        }
    }
}

// ============================================================================
// MONTH PRICE TABLE
// ============================================================================

/// MonthPriceTable - Best price per room type for one month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthPriceTable {
    pub month: MonthKey,
    pub rooms: BTreeMap<String, RoomPriceEntry>,
}

impl MonthPriceTable {
    pub fn new(month: MonthKey) -> Self {
        MonthPriceTable {
            month,
            rooms: BTreeMap::new(),
        }
    }

    pub fn month_key(&self) -> String {
        self.month.key()
    }

    pub fn month_label(&self) -> String {
        self.month.label()
    }

    /// Offer an entry; it replaces the current one only if strictly cheaper
    ///
    /// Returns true when the table changed.
    pub fn offer(&mut self, entry: RoomPriceEntry) -> bool {
        match self.rooms.get_mut(&entry.room_type) {
            Some(current) if entry.price_pp < current.price_pp => {
                *current = entry;
                true
            }
            Some(_) => false,
            None => {
                self.rooms.insert(entry.room_type.clone(), entry);
                true
            }
        }
    }

    /// Fold another table for the same month into this one
    pub fn merge(&mut self, other: MonthPriceTable) {
        for (_, entry) in other.rooms {
            self.offer(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn to_report(&self) -> MonthReport {
        MonthReport {
            month_key: self.month_key(),
            month_label: self.month_label(),
            rooms: self.rooms.clone(),
        }
    }
}

// ============================================================================
// AGGREGATOR
// ============================================================================

#[derive(Debug, Default)]
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Aggregator
    }

    /// Build the month table for one unit
    ///
    /// No table when the page states unavailability (even if prices were
    /// extracted) or when nothing survived validation.
    pub fn build_month_table(
        &self,
        unit: &ProcessingUnit,
        records: &[ValidatedRecord],
        unavailable: bool,
    ) -> Option<MonthPriceTable> {
        if unavailable || records.is_empty() {
            return None;
        }

        let mut table = MonthPriceTable::new(unit.month);
        for record in records {
            table.offer(RoomPriceEntry::from_record(record, unit));
        }

        Some(table)
    }
}

// ============================================================================
// HOTEL PRICE CALENDAR
// ============================================================================

/// HotelProfile - Descriptive fields carried into the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotelProfile {
    pub name: String,
    pub destination: String,
    pub stars: Option<u8>,
    pub rating: Option<f64>,
}

/// HotelPriceCalendar - Month tables for one tracked hotel, built incrementally
#[derive(Debug, Clone)]
pub struct HotelPriceCalendar {
    profile: HotelProfile,
    months: BTreeMap<MonthKey, MonthPriceTable>,
    room_types: BTreeSet<String>,
}

impl HotelPriceCalendar {
    pub fn new(profile: HotelProfile) -> Self {
        HotelPriceCalendar {
            profile,
            months: BTreeMap::new(),
            room_types: BTreeSet::new(),
        }
    }

    pub fn profile(&self) -> &HotelProfile {
        &self.profile
    }

    /// Fold one unit's table in
    ///
    /// Units for a month already present (another airport or duration) merge
    /// cheapest-wins into the existing table.
    pub fn add_month(&mut self, table: MonthPriceTable) {
        self.room_types.extend(table.rooms.keys().cloned());

        match self.months.get_mut(&table.month) {
            Some(existing) => existing.merge(table),
            None => {
                self.months.insert(table.month, table);
            }
        }
    }

    /// Month tables in chronological order
    pub fn months(&self) -> impl Iterator<Item = &MonthPriceTable> {
        self.months.values()
    }

    pub fn price_count(&self) -> usize {
        self.months.values().map(MonthPriceTable::len).sum()
    }

    /// Close the calendar: months chronological, room types sorted
    pub fn finalize(self) -> HotelReport {
        HotelReport {
            name: self.profile.name,
            destination: self.profile.destination,
            stars: self.profile.stars,
            rating: self.profile.rating,
            months: self.months.values().map(MonthPriceTable::to_report).collect(),
            room_types: self.room_types.into_iter().collect(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
