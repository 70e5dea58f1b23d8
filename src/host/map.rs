//! Interactive map capability

use crate::api::formatting::MarkerPopup;
use crate::core::LatLng;
use crate::host::HostResult;
use serde::{Deserialize, Serialize};

/// Handle to a marker or circle added to the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u32);

/// Raster tile source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    /// URL template with `{s}`, `{z}`, `{x}`, `{y}` placeholders
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
            max_zoom: 19,
        }
    }
}

/// Stroke and fill of the accuracy circle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleStyle {
    pub color: String,
    pub fill_color: String,
    pub fill_opacity: f32,
    pub weight: u8,
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self {
            color: "#667eea".to_string(),
            fill_color: "#667eea".to_string(),
            fill_opacity: 0.1,
            weight: 2,
        }
    }
}

/// Host map library bound to the widget's map container
pub trait MapSurface {
    /// Check that the container exists and the map library has loaded.
    /// Returns `HostError::NotReady` while either is missing.
    fn check_ready(&self) -> HostResult<()>;

    /// Create a map centered on `center`
    fn create_map(&mut self, center: LatLng, zoom: u8, tiles: &TileLayer) -> HostResult<()>;

    /// Tear down the map, dropping all its layers
    fn remove_map(&mut self);

    fn set_view(&mut self, center: LatLng, zoom: u8);

    fn add_marker(&mut self, at: LatLng, popup: &MarkerPopup) -> LayerId;

    fn add_circle(&mut self, center: LatLng, radius_m: f64, style: &CircleStyle) -> LayerId;

    fn remove_layer(&mut self, layer: LayerId);

    fn open_popup(&mut self, marker: LayerId);

    /// Recompute size after the container's layout changed
    fn invalidate_size(&mut self);
}
