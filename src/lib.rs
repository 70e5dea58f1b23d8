//! Geoshare
//!
//! A location-sharing widget core: acquire the device position through a
//! host geolocation service, render it as decimal and degrees/minutes/seconds
//! text, keep a map centered on it, and share or copy it.
//!
//! All browser-side effects go through the capability traits in [`host`], so
//! the same controller runs under wasm bindings, a native webview or tests.

pub mod core;
pub mod api;
pub mod host;
pub mod validation;
pub mod utils;

// Re-export commonly used types
pub use core::{Axis, Hemisphere, LatLng, LocationReading, PositionFix, Theme, DEFAULT_CENTER};
pub use api::{
    decimal_to_dms, AppError, AppEvent, AppResult, CopyField, Locale, LocationApp,
    LocationFormatter, MapStatus, ViewState,
};
pub use host::{AcquisitionError, DeferredTask, HostError, Hosts, RequestToken};
pub use utils::{init_logging, AppConfig, ConfigurationManager};
