//! Geographic limits and widget defaults

use crate::core::types::LatLng;

/// Largest valid latitude magnitude (degrees)
pub const MAX_LATITUDE_DEG: f64 = 90.0;

/// Largest valid longitude magnitude (degrees)
pub const MAX_LONGITUDE_DEG: f64 = 180.0;

/// Map center used before any reading is available (Berlin)
pub const DEFAULT_CENTER: LatLng = LatLng::new(52.5200, 13.4050);

/// Preference key holding the selected theme
pub const THEME_PREFERENCE_KEY: &str = "theme";
