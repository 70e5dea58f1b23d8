//! Core data types for the location widget

use crate::core::constants::{MAX_LATITUDE_DEG, MAX_LONGITUDE_DEG};
use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which coordinate a decimal-degree value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Latitude,
    Longitude,
}

/// Compass side of a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Hemisphere for a signed value on the given axis. Zero counts as positive.
    pub fn for_value(value: f64, axis: Axis) -> Self {
        let positive = value >= 0.0;
        match (axis, positive) {
            (Axis::Latitude, true) => Hemisphere::North,
            (Axis::Latitude, false) => Hemisphere::South,
            (Axis::Longitude, true) => Hemisphere::East,
            (Axis::Longitude, false) => Hemisphere::West,
        }
    }

    /// Sign applied when converting back to decimal degrees
    pub fn sign(&self) -> f64 {
        match self {
            Hemisphere::North | Hemisphere::East => 1.0,
            Hemisphere::South | Hemisphere::West => -1.0,
        }
    }
}

/// Coordinate pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}

/// A single accepted location fix.
///
/// Latitude and longitude are only ever exposed together through
/// [`LocationReading::coordinates`]; there is no setter for either half.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationReading {
    latitude: f64,
    longitude: f64,
    accuracy_m: f64,
}

impl LocationReading {
    /// Create a reading, rejecting out-of-range or non-finite values
    pub fn new(latitude: f64, longitude: f64, accuracy_m: f64) -> Result<Self, ValidationError> {
        if !latitude.is_finite() || latitude.abs() > MAX_LATITUDE_DEG {
            return Err(ValidationError::LatitudeOutOfRange { value: latitude });
        }
        if !longitude.is_finite() || longitude.abs() > MAX_LONGITUDE_DEG {
            return Err(ValidationError::LongitudeOutOfRange { value: longitude });
        }
        if !accuracy_m.is_finite() || accuracy_m < 0.0 {
            return Err(ValidationError::InvalidAccuracy { value: accuracy_m });
        }

        Ok(Self {
            latitude,
            longitude,
            accuracy_m,
        })
    }

    /// Latitude and longitude of this reading
    pub fn coordinates(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Radius of uncertainty in meters
    pub fn accuracy_m(&self) -> f64 {
        self.accuracy_m
    }

    /// Accuracy rounded to whole meters, as shown to the user
    pub fn rounded_accuracy_m(&self) -> i64 {
        self.accuracy_m.round() as i64
    }
}

/// Raw fix as reported by a geolocation host, before validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: f64,
}

impl PositionFix {
    pub fn new(latitude: f64, longitude: f64, accuracy_m: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m,
        }
    }

    /// Validate into a [`LocationReading`]
    pub fn into_reading(self) -> Result<LocationReading, ValidationError> {
        LocationReading::new(self.latitude, self.longitude, self.accuracy_m)
    }
}

/// Color scheme of the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Value written to the preference store
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parse a stored preference value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}
