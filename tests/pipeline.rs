// End-to-end checks through the public API

use holiday_pricing::{
    CaptureBundle, ContextNode, Deduplicator, ElementFragment, ExtractionConfig,
    HotelPriceCalendar, MonthKey, Node, PriceEngine, PriceExtractor, PriceRecord,
    PriceValidator, ProcessingUnit, Provenance, StructuredExtractor, TextExtractor,
    TextSnapshot, UnitCapture, UnitOutcome,
};
use serde_json::json;

fn engine() -> PriceEngine {
    PriceEngine::new(&ExtractionConfig::default()).unwrap()
}

fn june_unit() -> ProcessingUnit {
    ProcessingUnit {
        hotel: "Zafiro Palace Alcudia".to_string(),
        airport: "MAN".to_string(),
        nights: 7,
        month: MonthKey::new(2026, 6).unwrap(),
    }
}

#[test]
fn test_structured_prices_clear_noise_floor_and_depth_cap() {
    let extractor = StructuredExtractor::new(&ExtractionConfig::default());
    let payload = Node::from(json!({
        "calendar": [
            {"price": 30},
            {"price": 51, "nested": {"price": 999}},
            {"a":{"b":{"c":{"d":{"e":{"f":{"g":{"h":{"price": 999}}}}}}}}}
        ]
    }));

    let records = extractor.extract(&payload);

    assert_eq!(records.len(), 1);
    assert!(records.iter().all(|r| r.price() > 50.0));
    assert_eq!(records[0].price(), 51.0);
}

#[test]
fn test_save_fragment_yields_nothing() {
    let extractor = TextExtractor::new(&ExtractionConfig::default()).unwrap();
    let snapshot = TextSnapshot {
        fragments: vec![ElementFragment::new("Save big: £1,234.56")],
        main_content: None,
    };

    assert!(extractor.extract(&snapshot).is_empty());
}

#[test]
fn test_validator_idempotent_and_denylist() {
    let validator = PriceValidator::new(&ExtractionConfig::default());
    let records: Vec<PriceRecord> = [200.0, 734.0, 12.0, 1_000_000.0, 455.5]
        .into_iter()
        .map(|p| PriceRecord::new(p, Provenance::Structured).unwrap())
        .collect();

    let once = validator.filter(records);
    let twice = validator.filter(once.iter().map(|r| r.clone().into_inner()));

    assert_eq!(once, twice);
    let prices: Vec<f64> = once.iter().map(|r| r.price()).collect();
    assert_eq!(prices, vec![734.0, 455.5]);
}

#[test]
fn test_dedup_by_room_and_rounded_price() {
    let validator = PriceValidator::new(&ExtractionConfig::default());
    let records = validator.filter(vec![
        PriceRecord::new(499.0, Provenance::Structured).unwrap().with_room_type("Standard"),
        PriceRecord::new(499.40, Provenance::Text).unwrap().with_room_type("Standard"),
        PriceRecord::new(499.0, Provenance::Text).unwrap().with_room_type("Superior"),
    ]);

    let outcome = Deduplicator::new().dedup(records);

    let rooms: Vec<&str> = outcome.kept.iter().map(|r| r.room_type.as_str()).collect();
    assert_eq!(rooms, vec!["Standard", "Superior"]);
}

#[test]
fn test_cheapest_standard_price_wins() {
    let capture = UnitCapture {
        payloads: vec![Node::from(json!([
            {"price": 650, "roomType": "Standard"},
            {"price": 600, "roomType": "Standard"},
            {"price": 620, "roomType": "Standard"}
        ]))],
        ..UnitCapture::default()
    };

    let result = engine().process_unit(&june_unit(), &capture);

    let table = result.outcome.table().unwrap();
    assert_eq!(table.rooms["Standard"].price_pp, 600.0);
}

#[test]
fn test_unavailability_beats_extracted_prices() {
    let engine = engine();
    let capture = UnitCapture {
        payloads: vec![Node::from(json!({"price": 500, "roomType": "Standard"}))],
        snapshot: TextSnapshot::default(),
        unavailable: engine
            .availability()
            .states_unavailable("Sorry, there are no holidays matching your search"),
    };

    let result = engine.process_unit(&june_unit(), &capture);

    assert_eq!(result.outcome, UnitOutcome::Unavailable { discarded: 1 });
    assert!(result.outcome.table().is_none());
}

#[test]
fn test_denylisted_structured_price_dropped() {
    let capture = UnitCapture {
        payloads: vec![Node::from(json!({"price": 200.0}))],
        ..UnitCapture::default()
    };

    let result = engine().process_unit(&june_unit(), &capture);
    assert_eq!(result.outcome, UnitOutcome::NoPrices);
}

#[test]
fn test_end_to_end_promotional_duplicate_suppressed() {
    let banner = ElementFragment::new("Save £50 - now from £734pp").with_ancestor(ContextNode::new(
        "package-card",
        "Superior Sea View, All Inclusive, Save £50 - now from £734pp",
    ));

    let capture = UnitCapture {
        payloads: vec![Node::from(json!({
            "data": {
                "offers": [{
                    "pricePerPerson": 734.00,
                    "roomType": "Superior Sea View",
                    "boardBasis": "All Inclusive"
                }]
            }
        }))],
        snapshot: TextSnapshot {
            fragments: vec![banner],
            main_content: None,
        },
        unavailable: false,
    };

    let result = engine().process_unit(&june_unit(), &capture);

    assert_eq!(result.stats.text_found, 0);
    let table = result.outcome.table().unwrap();
    assert_eq!(table.len(), 1);
    let entry = &table.rooms["Superior Sea View"];
    assert_eq!(entry.price_pp, 734.0);
    assert_eq!(entry.board_basis, "All Inclusive");
}

#[test]
fn test_replay_bundle_into_report() {
    let bundle: CaptureBundle = serde_json::from_value(json!({
        "hotels": [{
            "hotel": {
                "name": "Sunwing Alcudia Beach",
                "slug": "alcudia-beach",
                "destination_path": "balearics/majorca/alcudia",
                "destination_label": "Majorca, Spain",
                "stars": 4,
                "rating": 4.3
            },
            "units": [
                {
                    "airport": "MAN", "nights": 7, "month": "2026-07",
                    "payloads": [{"rooms": [{"price": 780, "roomType": "Family Room", "board": "Half Board"}]}]
                },
                {
                    "airport": "MAN", "nights": 7, "month": "2026-06",
                    "fragments": [{
                        "text": "£689pp",
                        "ancestors": [{"class_hint": "result-item", "text": "Studio - Self Catering - 14 Jun 2026 - £689pp"}]
                    }]
                },
                {
                    "airport": "MAN", "nights": 7, "month": "2026-08",
                    "payloads": [{"price": 900}],
                    "page_text": "This hotel is currently unavailable"
                }
            ]
        }]
    }))
    .unwrap();

    let engine = engine();
    let hotel_capture = &bundle.hotels[0];
    let mut calendar = HotelPriceCalendar::new(hotel_capture.hotel.profile());
    for recording in &hotel_capture.units {
        let capture = recording.to_capture(engine.availability());
        engine.process_into(&mut calendar, &recording.unit(&hotel_capture.hotel), &capture);
    }

    let report = calendar.finalize();

    let keys: Vec<&str> = report.months.iter().map(|m| m.month_key.as_str()).collect();
    assert_eq!(keys, vec!["2026-06", "2026-07"]);
    assert_eq!(report.room_types, vec!["Family Room", "Studio"]);

    let studio = &report.months[0].rooms["Studio"];
    assert_eq!(studio.board_basis, "Self Catering");
    assert_eq!(studio.departure_date, "2026-Jun-14");
    assert_eq!(studio.price_pp, 689.0);
    assert_eq!(report.months[1].rooms["Family Room"].board_basis, "Half Board");
}
