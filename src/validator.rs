// ✅ Price Validator - Plausibility and anti-noise rules
//
// Rules, in order (first match discards the record):
// 1. Price outside the plausibility window
// 2. Rounded price is a known promotional/decoy value
//
// The denylist is empirical: a genuine price equal to a decoy value is lost,
// and that is accepted.

use crate::config::ExtractionConfig;
use crate::record::{PriceRecord, ValidatedRecord};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// ============================================================================
// REJECT REASON
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    /// Below the plausibility window (banner numbers like "£50 off")
    BelowMinimum,

    /// Above the plausibility window (corrupted extraction)
    AboveMaximum,

    /// Rounded price is on the promotional denylist
    PromotionalValue,
}

impl RejectReason {
    pub fn name(&self) -> &'static str {
        match self {
            RejectReason::BelowMinimum => "below_minimum",
            RejectReason::AboveMaximum => "above_maximum",
            RejectReason::PromotionalValue => "promotional_value",
        }
    }
}

// ============================================================================
// FILTER REPORT
// ============================================================================

/// FilterReport - Survivors plus what was discarded and why
#[derive(Debug, Clone, Default)]
pub struct FilterReport {
    pub accepted: Vec<ValidatedRecord>,
    pub rejected: Vec<(PriceRecord, RejectReason)>,
}

impl FilterReport {
    pub fn rejected_by_reason(&self) -> BTreeMap<RejectReason, usize> {
        let mut counts = BTreeMap::new();
        for (_, reason) in &self.rejected {
            *counts.entry(*reason).or_insert(0) += 1;
        }
        counts
    }
}

// ============================================================================
// PRICE VALIDATOR
// ============================================================================

pub struct PriceValidator {
    /// Inclusive lower bound
    pub min_price: f64,

    /// Inclusive upper bound
    pub max_price: f64,

    /// Whole-pound decoy values
    promotional_values: HashSet<i64>,
}

impl PriceValidator {
    pub fn new(config: &ExtractionConfig) -> Self {
        PriceValidator {
            min_price: config.min_plausible_price,
            max_price: config.max_plausible_price,
            promotional_values: config.promotional_values.iter().copied().collect(),
        }
    }

    /// Check a single record against every rule
    pub fn check(&self, record: &PriceRecord) -> Result<(), RejectReason> {
        let price = record.price();

        if price < self.min_price {
            return Err(RejectReason::BelowMinimum);
        }

        if price > self.max_price {
            return Err(RejectReason::AboveMaximum);
        }

        if self.promotional_values.contains(&record.rounded_price()) {
            return Err(RejectReason::PromotionalValue);
        }

        Ok(())
    }

    /// Split records into survivors and rejects, keeping input order
    pub fn filter_with_report<I>(&self, records: I) -> FilterReport
    where
        I: IntoIterator<Item = PriceRecord>,
    {
        let mut report = FilterReport::default();

        for record in records {
            match self.check(&record) {
                Ok(()) => report.accepted.push(ValidatedRecord::new_unchecked(record)),
                Err(reason) => {
                    debug!(
                        "rejected £{:.2} ({}) from {}: {}",
                        record.price(),
                        record.room_type,
                        record.provenance.name(),
                        reason.name()
                    );
                    report.rejected.push((record, reason));
                }
            }
        }

        report
    }

    /// Only the records that plausibly are genuine prices
    pub fn filter<I>(&self, records: I) -> Vec<ValidatedRecord>
    where
        I: IntoIterator<Item = PriceRecord>,
    {
        self.filter_with_report(records).accepted
    }
}

// ============================================================================
// TESTS
// ============================================================================
