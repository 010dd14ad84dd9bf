// Holiday Pricing - Core Library
// Price extraction & normalization engine for travel-package pages

pub mod record;
pub mod payload;
pub mod config;
pub mod extractor;
pub mod structured;   // Channel 1: intercepted API responses
pub mod text;         // Channel 2: rendered page text
pub mod validator;
pub mod dedup;
pub mod availability;
pub mod aggregate;
pub mod report;
pub mod pipeline;
pub mod hotels;
pub mod capture;

// Re-export commonly used types
pub use record::{PriceRecord, ValidatedRecord, Provenance, DEFAULT_ROOM_TYPE, DEFAULT_BOARD_BASIS};
pub use payload::Node;
pub use config::{ExtractionConfig, KeywordEntry};
pub use extractor::PriceExtractor;
pub use structured::{StructuredExtractor, FieldAliases};
pub use text::{TextExtractor, TextSnapshot, ElementFragment, ContextNode, KeywordMatcher};
pub use validator::{PriceValidator, RejectReason, FilterReport};
pub use dedup::{Deduplicator, DedupOutcome};
pub use availability::AvailabilityDetector;
pub use aggregate::{
    Aggregator, MonthKey, ProcessingUnit, RoomPriceEntry, MonthPriceTable,
    HotelPriceCalendar, HotelProfile,
};
pub use report::{PricingReport, HotelReport, MonthReport};
pub use pipeline::{PriceEngine, UnitCapture, UnitOutcome, UnitResult, ExtractionStats};
pub use hotels::{TrackedHotel, AirportRegistry, default_hotels, load_hotels};
pub use capture::{CaptureFilter, CaptureBundle, HotelCapture, UnitRecording};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
