//! Controller and presentation layer
//!
//! The controller reacts to user actions and host deliveries; formatting and
//! locale turn readings into display text; the view model carries the result
//! to the host.

pub mod controller;
pub mod formatting;
pub mod locale;
pub mod types;
pub mod view;

// Re-export commonly used API types
pub use controller::{AppState, CallbackHandle, EventCallback, LocationApp};
pub use formatting::{
    decimal_to_dms, format_decimal, maps_url, Dms, FormattedLocation, JsonFormatter,
    LocationFormatter, MarkerPopup, TextFormatter,
};
pub use locale::{Locale, Messages};
pub use types::{AppError, AppEvent, AppResult, CopyField, MapStatus};
pub use view::{ButtonState, MapPlaceholder, Notice, NoticeKind, ShareDialog, ViewState};
