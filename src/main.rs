use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Utc};
use std::env;
use std::path::Path;

use holiday_pricing::{
    default_hotels, load_hotels, AirportRegistry, CaptureBundle, ExtractionConfig,
    HotelPriceCalendar, MonthKey, PriceEngine, PricingReport, UnitOutcome,
};

const CONFIG_ENV: &str = "HOLIDAY_PRICING_CONFIG";
const DEFAULT_OUTPUT: &str = "pricing_data.json";
const DEFAULT_MONTHS: usize = 6;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("replay") => run_replay(&args[2..]),
        Some("hotels") => run_hotels(&args[2..]),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("holiday-pricing {}", holiday_pricing::VERSION);
    println!();
    println!("USAGE:");
    println!("  holiday-pricing replay <bundle.json> [--config cfg.json] [--out report.json]");
    println!("  holiday-pricing hotels [--hotels hotels.json] [--from YYYY-MM] [--months N]");
    println!();
    println!("The extraction config path may also be set with {}.", CONFIG_ENV);
}

/// Value following `--name`, if given
fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn load_config(args: &[String]) -> Result<ExtractionConfig> {
    let path = flag_value(args, "--config")
        .map(String::from)
        .or_else(|| env::var(CONFIG_ENV).ok());

    match path {
        Some(path) => {
            println!("⚙️  Loading config from {}", path);
            ExtractionConfig::from_file(&path)
        }
        None => Ok(ExtractionConfig::default()),
    }
}

fn run_replay(args: &[String]) -> Result<()> {
    let bundle_path = args
        .first()
        .filter(|a| !a.starts_with("--"))
        .ok_or_else(|| anyhow!("replay needs a capture bundle path"))?;
    let output = flag_value(args, "--out").unwrap_or(DEFAULT_OUTPUT);

    println!("🔁 Replaying captured pages");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = load_config(args)?;
    let engine = PriceEngine::new(&config).context("Failed to build price engine")?;

    let bundle = CaptureBundle::from_file(bundle_path)?;
    println!(
        "📂 {} hotels, {} units from {}",
        bundle.hotels.len(),
        bundle.unit_count(),
        bundle_path
    );

    let mut hotels = Vec::new();
    let (mut priced, mut empty, mut unavailable) = (0, 0, 0);

    for hotel_capture in &bundle.hotels {
        let hotel = &hotel_capture.hotel;
        println!("\n▶ {}", hotel.name);

        let mut calendar = HotelPriceCalendar::new(hotel.profile());
        for recording in &hotel_capture.units {
            let unit = recording.unit(hotel);
            let capture = recording.to_capture(engine.availability());

            match engine.process_into(&mut calendar, &unit, &capture).outcome {
                UnitOutcome::Priced(_) => priced += 1,
                UnitOutcome::NoPrices => empty += 1,
                UnitOutcome::Unavailable { .. } => unavailable += 1,
            }
        }

        println!(
            "  ✓ {} months, {} room prices",
            calendar.months().count(),
            calendar.price_count()
        );
        hotels.push(calendar.finalize());
    }

    let report = PricingReport::new(hotels);
    report.write_to(output)?;

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ Priced units: {}", priced);
    println!("✓ Units without prices: {}", empty);
    println!("✓ Unavailable units: {}", unavailable);
    println!("✓ Done: {} prices → {}", report.total_prices, output);

    Ok(())
}

fn run_hotels(args: &[String]) -> Result<()> {
    let hotels = match flag_value(args, "--hotels") {
        Some(path) => load_hotels(Path::new(path))?,
        None => default_hotels(),
    };

    let start = match flag_value(args, "--from") {
        Some(key) => MonthKey::parse(key)?,
        None => {
            let today = Utc::now().date_naive();
            MonthKey::new(today.year(), today.month())
                .ok_or_else(|| anyhow!("Current month out of range"))?
        }
    };

    let count = match flag_value(args, "--months") {
        Some(n) => n
            .parse::<usize>()
            .with_context(|| format!("Invalid --months value: {}", n))?,
        None => DEFAULT_MONTHS,
    };

    let months = MonthKey::range(start, count);
    let airports = AirportRegistry::new();

    for hotel in &hotels {
        println!("\n🏨 {} ({})", hotel.name, hotel.destination_label);
        for airport in &hotel.airports {
            for &nights in &hotel.nights {
                println!("  → {}", hotel.package_url(&airports, airport, nights));
            }
        }
        println!("  {} units planned", hotel.plan_units(&months).len());
    }

    Ok(())
}
