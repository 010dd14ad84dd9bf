// 🔎 Structured Extractor - Mines decoded API responses for price records
//
// Depth-first walk over the payload tree. A map node becomes a record as soon
// as one of the price aliases holds a number above the noise floor; its
// children are then not visited. Everything else is recursed into.

use crate::config::ExtractionConfig;
use crate::extractor::PriceExtractor;
use crate::payload::Node;
use crate::record::{PriceRecord, Provenance};
use log::debug;

// ============================================================================
// FIELD ALIASES
// ============================================================================

/// FieldAliases - Ordered lookup tables for one site's field names
///
/// The upstream field names have shifted across site versions, so each
/// logical field is a list of candidates consulted in priority order.
#[derive(Debug, Clone)]
pub struct FieldAliases {
    pub price: Vec<String>,
    pub date: Vec<String>,
    pub room: Vec<String>,
    pub board: Vec<String>,
}

impl FieldAliases {
    pub fn from_config(config: &ExtractionConfig) -> Self {
        FieldAliases {
            price: config.price_fields.clone(),
            date: config.date_fields.clone(),
            room: config.room_fields.clone(),
            board: config.board_fields.clone(),
        }
    }
}

// ============================================================================
// STRUCTURED EXTRACTOR
// ============================================================================

pub struct StructuredExtractor {
    aliases: FieldAliases,
    noise_floor: f64,
    max_depth: usize,
    room_label_len: (usize, usize),
    date_max_len: usize,
}

impl StructuredExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        StructuredExtractor {
            aliases: FieldAliases::from_config(config),
            noise_floor: config.structured_noise_floor,
            max_depth: config.max_depth,
            room_label_len: (config.room_label_min_len, config.room_label_max_len),
            date_max_len: config.date_max_len,
        }
    }

    fn walk(&self, node: &Node, depth: usize, found: &mut Vec<PriceRecord>) {
        if depth >= self.max_depth || node.is_falsy() {
            return;
        }

        match node {
            Node::Map(entries) => {
                if let Some(record) = self.accept_record(node) {
                    debug!(
                        "structured record at depth {}: £{:.2} {}",
                        depth,
                        record.price(),
                        record.room_type
                    );
                    found.push(record);
                    return;
                }

                for (_, child) in entries {
                    self.walk(child, depth + 1, found);
                }
            }
            Node::Seq(items) => {
                for item in items {
                    self.walk(item, depth + 1, found);
                }
            }
            _ => {}
        }
    }

    /// Price of the first alias whose value clears the noise floor
    ///
    /// An alias holding something unparseable or too small does not end the
    /// search; later aliases are still consulted.
    fn node_price(&self, node: &Node) -> Option<f64> {
        self.aliases.price.iter().find_map(|alias| {
            node.get(alias)
                .and_then(Node::as_number)
                .filter(|price| *price > self.noise_floor)
        })
    }

    fn accept_record(&self, node: &Node) -> Option<PriceRecord> {
        let price = self.node_price(node)?;
        let record = PriceRecord::new(price, self.provenance())?;

        Some(
            record
                .with_departure_date(self.departure_date(node))
                .with_room_type(self.room_type(node).unwrap_or_default())
                .with_board_basis(self.board_basis(node).unwrap_or_default()),
        )
    }

    fn departure_date(&self, node: &Node) -> String {
        self.aliases
            .date
            .iter()
            .filter_map(|alias| node.get(alias))
            .find(|value| !value.is_falsy())
            .and_then(Node::scalar_string)
            .map(|date| date.chars().take(self.date_max_len).collect())
            .unwrap_or_default()
    }

    fn room_type(&self, node: &Node) -> Option<String> {
        let (min_len, max_len) = self.room_label_len;
        self.aliases
            .room
            .iter()
            .filter_map(|alias| node.get(alias).and_then(Node::as_text))
            .map(str::trim)
            .find(|label| {
                let len = label.chars().count();
                len >= min_len && len <= max_len
            })
            .map(str::to_string)
    }

    fn board_basis(&self, node: &Node) -> Option<String> {
        self.aliases
            .board
            .iter()
            .filter_map(|alias| node.get(alias).and_then(Node::as_text))
            .map(str::trim)
            .find(|label| !label.is_empty())
            .map(str::to_string)
    }
}

impl PriceExtractor for StructuredExtractor {
    type Input = Node;

    fn extract(&self, input: &Node) -> Vec<PriceRecord> {
        let mut found = Vec::new();
        self.walk(input, 0, &mut found);
        found
    }

    fn provenance(&self) -> Provenance {
        Provenance::Structured
    }
}

// ============================================================================
// TESTS
// ============================================================================
