//! User-facing text catalogues

use crate::core::Hemisphere;
use crate::host::AcquisitionError;
use serde::{Deserialize, Serialize};

/// Language of every string the widget shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "de")]
    German,
    #[serde(rename = "en")]
    English,
}

/// Fixed strings for one locale
#[derive(Debug)]
pub struct Messages {
    pub north: &'static str,
    pub south: &'static str,
    pub east: &'static str,
    pub west: &'static str,

    pub locate_button: &'static str,
    pub locate_busy: &'static str,
    pub locate_again: &'static str,

    pub unsupported: &'static str,
    pub acquisition_prefix: &'static str,
    pub permission_denied: &'static str,
    pub position_unavailable: &'static str,
    pub timeout: &'static str,
    pub unknown_error: &'static str,
    pub no_location_to_center: &'static str,

    pub map_hidden: &'static str,
    pub map_failed: &'static str,
    pub map_failed_hint: &'static str,
    pub show_map: &'static str,
    pub hide_map: &'static str,

    pub popup_title: &'static str,
    pub accuracy_label: &'static str,
    pub hint_too_coarse: &'static str,
    pub hint_precise: &'static str,

    pub share_title: &'static str,
    pub share_heading: &'static str,
    pub share_decimal: &'static str,
    pub share_dms: &'static str,
    pub share_maps: &'static str,
    pub share_dialog_title: &'static str,
    pub share_copied: &'static str,
    pub close: &'static str,

    pub copied: &'static str,
    pub copy_failed: &'static str,
    pub copy_impossible: &'static str,
}

static GERMAN: Messages = Messages {
    north: "N",
    south: "S",
    east: "O",
    west: "W",

    locate_button: "Standort abrufen",
    locate_busy: "Standort wird abgerufen...",
    locate_again: "Standort erneut abrufen",

    unsupported: "Geolocation wird von diesem Browser nicht unterstützt.",
    acquisition_prefix: "Fehler beim Abrufen des Standorts: ",
    permission_denied: "Standortzugriff wurde verweigert.",
    position_unavailable: "Standortinformationen sind nicht verfügbar.",
    timeout: "Zeitüberschreitung beim Abrufen des Standorts.",
    unknown_error: "Ein unbekannter Fehler ist aufgetreten.",
    no_location_to_center: "Kein Standort verfügbar zum Zentrieren der Karte.",

    map_hidden: "Karte ist ausgeblendet",
    map_failed: "⚠️ Karte konnte nicht geladen werden",
    map_failed_hint: "Möglicherweise ist keine Internetverbindung verfügbar",
    show_map: "Karte einblenden",
    hide_map: "Karte ausblenden",

    popup_title: "Deine Position",
    accuracy_label: "Genauigkeit",
    hint_too_coarse: "Standort zu ungenau für What3Words",
    hint_precise: "What3Words: Für genaue Adresse What3Words App verwenden",

    share_title: "Mein Standort",
    share_heading: "📍 Mein Standort",
    share_decimal: "🎯 Koordinaten (Dezimal):",
    share_dms: "🧭 Koordinaten (Grad/Min/Sek):",
    share_maps: "🗺 Google Maps:",
    share_dialog_title: "Standort teilen",
    share_copied: "Alle Standortdaten in Zwischenablage kopiert!",
    close: "Schließen",

    copied: "In Zwischenablage kopiert!",
    copy_failed: "Kopieren fehlgeschlagen. Text manuell auswählen und kopieren.",
    copy_impossible: "Kopieren nicht möglich. Text manuell auswählen und kopieren.",
};

static ENGLISH: Messages = Messages {
    north: "N",
    south: "S",
    east: "E",
    west: "W",

    locate_button: "Get location",
    locate_busy: "Getting location...",
    locate_again: "Get location again",

    unsupported: "Geolocation is not supported by this browser.",
    acquisition_prefix: "Error getting location: ",
    permission_denied: "Location access was denied.",
    position_unavailable: "Location information is unavailable.",
    timeout: "Timed out while getting the location.",
    unknown_error: "An unknown error occurred.",
    no_location_to_center: "No location available to center the map.",

    map_hidden: "Map is hidden",
    map_failed: "⚠️ Map could not be loaded",
    map_failed_hint: "There may be no internet connection",
    show_map: "Show map",
    hide_map: "Hide map",

    popup_title: "Your position",
    accuracy_label: "Accuracy",
    hint_too_coarse: "Location too imprecise for What3Words",
    hint_precise: "What3Words: use the What3Words app for a precise address",

    share_title: "My location",
    share_heading: "📍 My location",
    share_decimal: "🎯 Coordinates (decimal):",
    share_dms: "🧭 Coordinates (deg/min/sec):",
    share_maps: "🗺 Google Maps:",
    share_dialog_title: "Share location",
    share_copied: "All location data copied to clipboard!",
    close: "Close",

    copied: "Copied to clipboard!",
    copy_failed: "Copy failed. Select the text and copy it manually.",
    copy_impossible: "Copying is not possible. Select the text and copy it manually.",
};

impl Locale {
    /// String table for this locale
    pub fn messages(&self) -> &'static Messages {
        match self {
            Locale::German => &GERMAN,
            Locale::English => &ENGLISH,
        }
    }

    /// Single-letter hemisphere suffix
    pub fn hemisphere_letter(&self, hemisphere: Hemisphere) -> &'static str {
        let m = self.messages();
        match hemisphere {
            Hemisphere::North => m.north,
            Hemisphere::South => m.south,
            Hemisphere::East => m.east,
            Hemisphere::West => m.west,
        }
    }

    /// Full message for a failed acquisition
    pub fn acquisition_message(&self, error: AcquisitionError) -> String {
        let m = self.messages();
        let detail = match error {
            AcquisitionError::PermissionDenied => m.permission_denied,
            AcquisitionError::PositionUnavailable => m.position_unavailable,
            AcquisitionError::Timeout => m.timeout,
            AcquisitionError::Unknown => m.unknown_error,
        };
        format!("{}{}", m.acquisition_prefix, detail)
    }
}
