// 🚀 Price Engine - One processing unit, end to end
//
// structured payloads ─┐
//                      ├─> validate ─> dedup ─> aggregate ─> UnitOutcome
// rendered text ───────┘
//
// Pure and synchronous: no state survives between units. The caller owns the
// HotelPriceCalendar the outcomes are folded into.

use crate::aggregate::{Aggregator, HotelPriceCalendar, MonthPriceTable, ProcessingUnit};
use crate::availability::AvailabilityDetector;
use crate::config::ExtractionConfig;
use crate::dedup::Deduplicator;
use crate::extractor::PriceExtractor;
use crate::payload::Node;
use crate::structured::StructuredExtractor;
use crate::text::{TextExtractor, TextSnapshot};
use crate::validator::{PriceValidator, RejectReason};
use anyhow::Result;
use log::info;
use std::collections::BTreeMap;

// ============================================================================
// UNIT INPUT / OUTPUT
// ============================================================================

/// UnitCapture - Raw inputs the collaborator captured for one unit
#[derive(Debug, Clone, Default)]
pub struct UnitCapture {
    /// Decoded response bodies, already narrowed to price-related JSON
    pub payloads: Vec<Node>,

    /// Rendered text with ancestor context
    pub snapshot: TextSnapshot,

    /// Does the page state unavailability?
    pub unavailable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnitOutcome {
    /// At least one price survived; the unit's month table
    Priced(MonthPriceTable),

    /// Nothing survived the pipeline (not an error)
    NoPrices,

    /// The page states unavailability; `discarded` validated prices ignored
    Unavailable { discarded: usize },
}

impl UnitOutcome {
    pub fn table(&self) -> Option<&MonthPriceTable> {
        match self {
            UnitOutcome::Priced(table) => Some(table),
            _ => None,
        }
    }
}

/// ExtractionStats - Per-unit diagnostics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionStats {
    pub structured_found: usize,
    pub text_found: usize,
    pub rejected: BTreeMap<RejectReason, usize>,
    pub duplicates_dropped: usize,
    pub kept: usize,
}

impl ExtractionStats {
    pub fn summary(&self) -> String {
        format!(
            "structured: {}, text: {}, rejected: {}, duplicates: {}, kept: {}",
            self.structured_found,
            self.text_found,
            self.rejected.values().sum::<usize>(),
            self.duplicates_dropped,
            self.kept
        )
    }
}

#[derive(Debug, Clone)]
pub struct UnitResult {
    pub outcome: UnitOutcome,
    pub stats: ExtractionStats,
}

// ============================================================================
// PRICE ENGINE
// ============================================================================

pub struct PriceEngine {
    structured: StructuredExtractor,
    text: TextExtractor,
    validator: PriceValidator,
    deduplicator: Deduplicator,
    aggregator: Aggregator,
    availability: AvailabilityDetector,
}

impl PriceEngine {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        config.validate()?;

        Ok(PriceEngine {
            structured: StructuredExtractor::new(config),
            text: TextExtractor::new(config)?,
            validator: PriceValidator::new(config),
            deduplicator: Deduplicator::new(),
            aggregator: Aggregator::new(),
            availability: AvailabilityDetector::new(config),
        })
    }

    pub fn availability(&self) -> &AvailabilityDetector {
        &self.availability
    }

    /// Run extraction, validation, dedup and aggregation for one unit
    pub fn process_unit(&self, unit: &ProcessingUnit, capture: &UnitCapture) -> UnitResult {
        let mut stats = ExtractionStats::default();

        let mut candidates: Vec<_> = capture
            .payloads
            .iter()
            .flat_map(|payload| self.structured.extract(payload))
            .collect();
        stats.structured_found = candidates.len();

        let from_text = self.text.extract(&capture.snapshot);
        stats.text_found = from_text.len();
        candidates.extend(from_text);

        let report = self.validator.filter_with_report(candidates);
        stats.rejected = report.rejected_by_reason();

        let deduped = self.deduplicator.dedup(report.accepted);
        stats.duplicates_dropped = deduped.dropped;
        stats.kept = deduped.kept.len();

        let outcome = match self
            .aggregator
            .build_month_table(unit, &deduped.kept, capture.unavailable)
        {
            Some(table) => UnitOutcome::Priced(table),
            None if capture.unavailable => UnitOutcome::Unavailable {
                discarded: deduped.kept.len(),
            },
            None => UnitOutcome::NoPrices,
        };

        match &outcome {
            UnitOutcome::Priced(table) => {
                info!("✓ {}: {} room prices ({})", unit, table.len(), stats.summary())
            }
            UnitOutcome::NoPrices => info!("✗ {}: no prices ({})", unit, stats.summary()),
            UnitOutcome::Unavailable { discarded } => {
                info!("✗ {}: unavailable, {} prices discarded", unit, discarded)
            }
        }

        UnitResult { outcome, stats }
    }

    /// Process a unit and fold its table into the hotel's calendar
    pub fn process_into(
        &self,
        calendar: &mut HotelPriceCalendar,
        unit: &ProcessingUnit,
        capture: &UnitCapture,
    ) -> UnitResult {
        let result = self.process_unit(unit, capture);
        if let Some(table) = result.outcome.table() {
            calendar.add_month(table.clone());
        }
        result
    }
}

// ============================================================================
// TESTS
// ============================================================================
