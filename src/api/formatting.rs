//! Location output formatting and serialization
//!
//! Converts decimal-degree readings into the texts the widget shows:
//! fixed-precision decimals, degrees/minutes/seconds, a maps link, the share
//! message and the marker popup. Everything here is pure.

use crate::api::locale::Locale;
use crate::core::{Axis, Hemisphere, LatLng, LocationReading};
use crate::host::ShareData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places of the decimal-degree format
pub const DECIMAL_PRECISION: usize = 6;

/// Accuracy above which a what3words address is not worth looking up (meters)
pub const DEFAULT_HINT_THRESHOLD_M: f64 = 100.0;

/// A coordinate split into degrees, minutes and seconds.
///
/// Seconds are rounded to hundredths. A value that rounds to `60.00` is kept
/// as is and not carried into the minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dms {
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
    pub hemisphere: Hemisphere,
}

impl Dms {
    /// Split a signed decimal-degree value
    pub fn from_decimal(value: f64, axis: Axis) -> Self {
        let absolute = value.abs();
        let degrees = absolute.floor();
        let minutes_float = (absolute - degrees) * 60.0;
        let minutes = minutes_float.floor();
        let seconds = ((minutes_float - minutes) * 60.0 * 100.0).round() / 100.0;

        Self {
            degrees: degrees as u32,
            minutes: minutes as u32,
            seconds,
            hemisphere: Hemisphere::for_value(value, axis),
        }
    }

    /// Signed decimal degrees represented by this value
    pub fn to_decimal(&self) -> f64 {
        let magnitude =
            self.degrees as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0;
        self.hemisphere.sign() * magnitude
    }

    /// Render as `D° M' S.SS" H` with the locale's hemisphere letter
    pub fn display(&self, locale: Locale) -> String {
        format!(
            "{}° {}' {:.2}\" {}",
            self.degrees,
            self.minutes,
            self.seconds,
            locale.hemisphere_letter(self.hemisphere)
        )
    }
}

/// Degrees/minutes/seconds text for one coordinate, German hemisphere letters
pub fn decimal_to_dms(value: f64, axis: Axis) -> String {
    decimal_to_dms_localized(value, axis, Locale::German)
}

/// Degrees/minutes/seconds text for one coordinate
pub fn decimal_to_dms_localized(value: f64, axis: Axis, locale: Locale) -> String {
    Dms::from_decimal(value, axis).display(locale)
}

/// Maps `-0.0` to `0.0` so no coordinate text carries a sign on zero
fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// `"{lat}, {lng}"` with six decimals each
pub fn format_decimal(lat: f64, lng: f64) -> String {
    format!(
        "{:.prec$}, {:.prec$}",
        unsigned_zero(lat),
        unsigned_zero(lng),
        prec = DECIMAL_PRECISION
    )
}

/// Both coordinates in degrees/minutes/seconds, comma separated
pub fn format_dms_pair(coordinates: LatLng, locale: Locale) -> String {
    format!(
        "{}, {}",
        decimal_to_dms_localized(coordinates.lat, Axis::Latitude, locale),
        decimal_to_dms_localized(coordinates.lng, Axis::Longitude, locale)
    )
}

/// Google Maps search link for a coordinate pair
pub fn maps_url(coordinates: LatLng) -> String {
    format!(
        "https://www.google.com/maps?q={},{}",
        unsigned_zero(coordinates.lat),
        unsigned_zero(coordinates.lng)
    )
}

/// Note on whether the reading is precise enough for a what3words address
pub fn accuracy_hint(accuracy_m: f64, threshold_m: f64, locale: Locale) -> String {
    let m = locale.messages();
    if accuracy_m > threshold_m {
        format!(
            "{} ({}: {}m)",
            m.hint_too_coarse,
            m.accuracy_label,
            accuracy_m.round() as i64
        )
    } else {
        m.hint_precise.to_string()
    }
}

/// Content of the popup bound to the position marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPopup {
    pub title: String,
    pub coordinates: String,
    pub accuracy: String,
}

impl MarkerPopup {
    pub fn for_reading(reading: &LocationReading, locale: Locale) -> Self {
        let coords = reading.coordinates();
        let m = locale.messages();
        Self {
            title: m.popup_title.to_string(),
            coordinates: format_decimal(coords.lat, coords.lng),
            accuracy: format!("{}: ±{}m", m.accuracy_label, reading.rounded_accuracy_m()),
        }
    }
}

impl fmt::Display for MarkerPopup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}\n{}", self.title, self.coordinates, self.accuracy)
    }
}

/// Every textual rendering of one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedLocation {
    pub decimal: String,
    pub dms: String,
    pub maps_url: String,
    pub accuracy_m: f64,
    pub accuracy_hint: String,
}

/// Produces the widget's texts for a reading
#[derive(Debug, Clone)]
pub struct LocationFormatter {
    /// Language of labels and hemisphere letters
    pub locale: Locale,
    /// Accuracy above which the what3words hint warns (meters)
    pub hint_threshold_m: f64,
}

impl Default for LocationFormatter {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            hint_threshold_m: DEFAULT_HINT_THRESHOLD_M,
        }
    }
}

impl LocationFormatter {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Default::default()
        }
    }

    pub fn with_hint_threshold(mut self, threshold_m: f64) -> Self {
        self.hint_threshold_m = threshold_m;
        self
    }

    pub fn format(&self, reading: &LocationReading) -> FormattedLocation {
        let coords = reading.coordinates();
        FormattedLocation {
            decimal: format_decimal(coords.lat, coords.lng),
            dms: format_dms_pair(coords, self.locale),
            maps_url: maps_url(coords),
            accuracy_m: reading.accuracy_m(),
            accuracy_hint: accuracy_hint(reading.accuracy_m(), self.hint_threshold_m, self.locale),
        }
    }

    pub fn popup(&self, reading: &LocationReading) -> MarkerPopup {
        MarkerPopup::for_reading(reading, self.locale)
    }

    /// Title and multi-line message handed to the share sheet
    pub fn share_data(&self, reading: &LocationReading) -> ShareData {
        let m = self.locale.messages();
        let formatted = self.format(reading);
        let text = format!(
            "{}\n\n{}\n{}\n\n{}\n{}\n\n{}\n{}\n\n🎯 {}: ±{}m",
            m.share_heading,
            m.share_decimal,
            formatted.decimal,
            m.share_dms,
            formatted.dms,
            m.share_maps,
            formatted.maps_url,
            m.accuracy_label,
            reading.rounded_accuracy_m()
        );

        ShareData {
            title: m.share_title.to_string(),
            text,
        }
    }
}

/// Human-readable text formatter
#[derive(Debug, Default)]
pub struct TextFormatter {
    /// Single line instead of a block
    pub compact: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format_text(&self, formatted: &FormattedLocation) -> String {
        if self.compact {
            return format!(
                "{} | {} | ±{}m",
                formatted.decimal,
                formatted.dms,
                formatted.accuracy_m.round() as i64
            );
        }

        let mut output = String::new();
        output.push_str("Location:\n");
        output.push_str(&format!("  Decimal:  {}\n", formatted.decimal));
        output.push_str(&format!("  DMS:      {}\n", formatted.dms));
        output.push_str(&format!("  Map:      {}\n", formatted.maps_url));
        output.push_str(&format!("  Accuracy: ±{}m\n", formatted.accuracy_m.round() as i64));
        output.push_str(&format!("  {}\n", formatted.accuracy_hint));
        output
    }
}

/// JSON formatter for structured output
#[derive(Debug, Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format_json(&self, formatted: &FormattedLocation) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(formatted)
        } else {
            serde_json::to_string(formatted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn berlin() -> LocationReading {
        LocationReading::new(52.52, 13.405, 12.4).unwrap()
    }

    #[test]
    fn test_dms_latitude_north() {
        let text = decimal_to_dms(52.5, Axis::Latitude);
        assert!(text.starts_with("52° 30' 0.00\" N"), "got {}", text);
    }

    #[test]
    fn test_dms_latitude_south() {
        let text = decimal_to_dms(-52.5, Axis::Latitude);
        assert!(text.ends_with('S'), "got {}", text);
        assert_eq!(text, "52° 30' 0.00\" S");
    }

    #[test]
    fn test_dms_longitude_east_uses_locale_letter() {
        assert_eq!(decimal_to_dms(13.405, Axis::Longitude), "13° 24' 18.00\" O");
        assert_eq!(
            decimal_to_dms_localized(13.405, Axis::Longitude, Locale::English),
            "13° 24' 18.00\" E"
        );
        assert_eq!(decimal_to_dms(-13.405, Axis::Longitude), "13° 24' 18.00\" W");
    }

    #[test]
    fn test_dms_zero() {
        assert_eq!(decimal_to_dms(0.0, Axis::Latitude), "0° 0' 0.00\" N");
        assert_eq!(decimal_to_dms(0.0, Axis::Longitude), "0° 0' 0.00\" O");
    }

    #[test]
    fn test_dms_seconds_rounding_to_sixty_is_not_carried() {
        // 10° 59' 59.996" rounds its seconds up to 60.00
        let value = 10.0 + 59.0 / 60.0 + 59.996 / 3600.0;
        let dms = Dms::from_decimal(value, Axis::Latitude);
        assert_eq!(dms.degrees, 10);
        assert_eq!(dms.minutes, 59);
        assert_eq!(dms.seconds, 60.0);
        assert_eq!(dms.display(Locale::German), "10° 59' 60.00\" N");
    }

    #[test]
    fn test_dms_reconstructs_latitude() {
        let tolerance = 0.01 / 3600.0;
        let mut value = -90.0;
        while value <= 90.0 {
            let dms = Dms::from_decimal(value, Axis::Latitude);
            assert!(dms.minutes < 60);
            let rebuilt = dms.degrees as f64 + dms.minutes as f64 / 60.0 + dms.seconds / 3600.0;
            assert!(
                (rebuilt - value.abs()).abs() <= tolerance,
                "{} rebuilt as {}",
                value,
                rebuilt
            );
            assert!((dms.to_decimal() - value).abs() <= tolerance);
            value += 0.0137;
        }
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(52.52, 13.405), "52.520000, 13.405000");
        assert_eq!(format_decimal(-33.8688, 151.2093), "-33.868800, 151.209300");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        assert_eq!(format_decimal(-0.0, -0.0), "0.000000, 0.000000");
        assert_eq!(
            maps_url(LatLng::new(-0.0, 13.405)),
            "https://www.google.com/maps?q=0,13.405"
        );
        assert_eq!(format_decimal(-0.5, 0.0), "-0.500000, 0.000000");
    }

    #[test]
    fn test_maps_url() {
        assert_eq!(
            maps_url(LatLng::new(52.52, 13.405)),
            "https://www.google.com/maps?q=52.52,13.405"
        );
    }

    #[test]
    fn test_accuracy_hint_threshold() {
        assert_eq!(
            accuracy_hint(150.4, 100.0, Locale::German),
            "Standort zu ungenau für What3Words (Genauigkeit: 150m)"
        );
        assert_eq!(
            accuracy_hint(100.0, 100.0, Locale::German),
            "What3Words: Für genaue Adresse What3Words App verwenden"
        );
    }

    #[test]
    fn test_share_message() {
        let data = LocationFormatter::default().share_data(&berlin());
        assert_eq!(data.title, "Mein Standort");
        let expected = "📍 Mein Standort\n\n\
            🎯 Koordinaten (Dezimal):\n52.520000, 13.405000\n\n\
            🧭 Koordinaten (Grad/Min/Sek):\n52° 31' 12.00\" N, 13° 24' 18.00\" O\n\n\
            🗺 Google Maps:\nhttps://www.google.com/maps?q=52.52,13.405\n\n\
            🎯 Genauigkeit: ±12m";
        assert_eq!(data.text, expected);
    }

    #[test]
    fn test_marker_popup() {
        let popup = LocationFormatter::default().popup(&berlin());
        assert_eq!(
            popup.to_string(),
            "Deine Position\n52.520000, 13.405000\nGenauigkeit: ±12m"
        );
    }

    #[test]
    fn test_text_and_json_output() {
        let formatted = LocationFormatter::new(Locale::English).format(&berlin());
        assert_eq!(formatted.dms, "52° 31' 12.00\" N, 13° 24' 18.00\" E");

        let compact = TextFormatter { compact: true }.format_text(&formatted);
        assert_eq!(compact, "52.520000, 13.405000 | 52° 31' 12.00\" N, 13° 24' 18.00\" E | ±12m");

        let json = JsonFormatter::new().format_json(&formatted).unwrap();
        let back: FormattedLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, formatted);
    }
}
