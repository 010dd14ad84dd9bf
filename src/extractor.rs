// 🏗️ Extractor Framework
// Both channels (structured payloads, rendered text) implement one trait

use crate::record::{PriceRecord, Provenance};

/// PriceExtractor - Core trait for a price-mining channel
///
/// Extraction never fails: malformed input is skipped and whatever could be
/// recovered is returned.
pub trait PriceExtractor {
    /// What this channel reads (a payload tree, a text snapshot)
    type Input: ?Sized;

    /// Mine every price observation from one input
    fn extract(&self, input: &Self::Input) -> Vec<PriceRecord>;

    /// Tag written into every record this channel produces
    fn provenance(&self) -> Provenance;
}
