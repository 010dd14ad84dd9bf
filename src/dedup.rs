// 🔍 Deduplicator - Collapses repeated observations within one unit
//
// Identity is (room_type, price rounded to the pound). The same genuine price
// is often surfaced by both channels, or repeated in the page; first
// occurrence wins and later ones are dropped, never merged.

use crate::record::ValidatedRecord;
use log::debug;
use std::collections::HashSet;

/// DedupOutcome - Survivors plus how many duplicates were dropped
#[derive(Debug, Clone, Default)]
pub struct DedupOutcome {
    pub kept: Vec<ValidatedRecord>,
    pub dropped: usize,
}

#[derive(Debug, Default)]
pub struct Deduplicator;

impl Deduplicator {
    pub fn new() -> Self {
        Deduplicator
    }

    /// Identity key of a record
    pub fn key(record: &ValidatedRecord) -> (String, i64) {
        (record.room_type.clone(), record.rounded_price())
    }

    pub fn dedup(&self, records: Vec<ValidatedRecord>) -> DedupOutcome {
        let mut seen = HashSet::new();
        let mut outcome = DedupOutcome::default();

        for record in records {
            if seen.insert(Self::key(&record)) {
                outcome.kept.push(record);
            } else {
                debug!(
                    "duplicate £{:.2} {} from {}",
                    record.price(),
                    record.room_type,
                    record.provenance.name()
                );
                outcome.dropped += 1;
            }
        }

        outcome
    }
}

// ============================================================================
// TESTS
// ============================================================================
