//! Demonstration of coordinate formatting

use geoshare::api::{JsonFormatter, TextFormatter};
use geoshare::{decimal_to_dms, Axis, Locale, LocationFormatter, LocationReading};

fn main() {
    geoshare::init_logging("geoshare=debug");

    println!("=== Geoshare - Formatting Demo ===\n");

    let reading = match LocationReading::new(52.52, 13.405, 12.4) {
        Ok(reading) => reading,
        Err(e) => {
            eprintln!("invalid sample reading: {}", e);
            return;
        }
    };

    demonstrate_dms();
    demonstrate_locales(&reading);
    demonstrate_text_formatting(&reading);
    demonstrate_json_formatting(&reading);
    demonstrate_share_text(&reading);
}

fn demonstrate_dms() {
    println!("1. Degrees/Minutes/Seconds:");
    for (value, axis) in [
        (52.5, Axis::Latitude),
        (-52.5, Axis::Latitude),
        (13.405, Axis::Longitude),
        (-74.0445, Axis::Longitude),
        (0.0, Axis::Latitude),
    ] {
        println!("   {:>10} -> {}", value, decimal_to_dms(value, axis));
    }
    println!();
}

fn demonstrate_locales(reading: &LocationReading) {
    println!("2. Locales:");
    for locale in [Locale::German, Locale::English] {
        let formatted = LocationFormatter::new(locale).format(reading);
        println!("   {:?}: {}", locale, formatted.dms);
    }
    println!();
}

fn demonstrate_text_formatting(reading: &LocationReading) {
    println!("3. Text Formatting:");
    let formatted = LocationFormatter::default().format(reading);

    print!("{}", TextFormatter::new().format_text(&formatted));
    let compact = TextFormatter { compact: true };
    println!("   Compact: {}\n", compact.format_text(&formatted));
}

fn demonstrate_json_formatting(reading: &LocationReading) {
    println!("4. JSON Formatting:");
    let formatted = LocationFormatter::default().format(reading);

    match JsonFormatter::pretty().format_json(&formatted) {
        Ok(json) => println!("{}\n", json),
        Err(e) => println!("   JSON formatting error: {}\n", e),
    }
}

fn demonstrate_share_text(reading: &LocationReading) {
    println!("5. Share Text:");
    let data = LocationFormatter::default().share_data(reading);
    println!("   Title: {}", data.title);
    for line in data.text.lines() {
        println!("   | {}", line);
    }
}
