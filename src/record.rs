// 🏷️ Price Records - Canonical unit of extracted data
// Every extractor produces PriceRecord; only the validator produces ValidatedRecord

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Room label used when no room type could be inferred
pub const DEFAULT_ROOM_TYPE: &str = "Standard";

/// Board label used when no board basis could be inferred
pub const DEFAULT_BOARD_BASIS: &str = "Unknown";

// ============================================================================
// PROVENANCE
// ============================================================================

/// Provenance - Which extractor produced a record
///
/// Diagnostics only. Nothing downstream branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Mined from an intercepted structured response
    Structured,

    /// Recognised in rendered page text
    Text,
}

impl Provenance {
    pub fn name(&self) -> &'static str {
        match self {
            Provenance::Structured => "structured",
            Provenance::Text => "text",
        }
    }
}

// ============================================================================
// PRICE RECORD
// ============================================================================

/// PriceRecord - One price observation, before validation
///
/// The price is per person, implicitly GBP. A record with a non-finite or
/// non-positive price cannot be constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRecord {
    price: f64,
    pub room_type: String,
    pub board_basis: String,
    /// ISO-like date string, empty when unknown
    pub departure_date: String,
    pub provenance: Provenance,
}

impl PriceRecord {
    /// Create a record with default room, board and date
    ///
    /// Returns `None` when `price` is not a finite positive number.
    pub fn new(price: f64, provenance: Provenance) -> Option<Self> {
        if !price.is_finite() || price <= 0.0 {
            return None;
        }

        Some(PriceRecord {
            price,
            room_type: DEFAULT_ROOM_TYPE.to_string(),
            board_basis: DEFAULT_BOARD_BASIS.to_string(),
            departure_date: String::new(),
            provenance,
        })
    }

    /// Builder: set room type (blank labels keep the default)
    pub fn with_room_type(mut self, room_type: impl Into<String>) -> Self {
        let room_type = room_type.into();
        if !room_type.trim().is_empty() {
            self.room_type = room_type.trim().to_string();
        }
        self
    }

    /// Builder: set board basis (blank labels keep the default)
    pub fn with_board_basis(mut self, board_basis: impl Into<String>) -> Self {
        let board_basis = board_basis.into();
        if !board_basis.trim().is_empty() {
            self.board_basis = board_basis.trim().to_string();
        }
        self
    }

    /// Builder: set departure date
    pub fn with_departure_date(mut self, departure_date: impl Into<String>) -> Self {
        self.departure_date = departure_date.into();
        self
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Price rounded to the nearest whole pound
    ///
    /// Used as identity by both the denylist and the deduplicator.
    pub fn rounded_price(&self) -> i64 {
        self.price.round() as i64
    }
}

// ============================================================================
// VALIDATED RECORD
// ============================================================================

/// ValidatedRecord - A PriceRecord that passed the plausibility rules
///
/// Only `PriceValidator` constructs these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedRecord(PriceRecord);

impl ValidatedRecord {
    pub(crate) fn new_unchecked(record: PriceRecord) -> Self {
        ValidatedRecord(record)
    }

    pub fn into_inner(self) -> PriceRecord {
        self.0
    }
}

impl Deref for ValidatedRecord {
    type Target = PriceRecord;

    fn deref(&self) -> &PriceRecord {
        &self.0
    }
}

// ============================================================================
// TESTS
// ============================================================================
