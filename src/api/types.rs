//! Common controller types

use crate::core::{LocationReading, Theme};
use crate::host::{AcquisitionError, HostError, RequestToken};
use crate::validation::ValidationError;
use thiserror::Error;

/// Result type for controller operations
pub type AppResult<T> = Result<T, AppError>;

/// Everything that can go wrong in the widget. None of these are fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error("geolocation is not supported by this host")]
    GeolocationUnsupported,
    #[error("location acquisition failed: {0}")]
    Acquisition(AcquisitionError),
    #[error("host reported an invalid position: {0}")]
    InvalidReading(#[from] ValidationError),
    #[error("geolocation request could not be started: {0}")]
    RequestFailed(HostError),
    #[error("map initialization failed: {0}")]
    MapInitialization(HostError),
    #[error("map prerequisites still missing after {attempts} attempts")]
    MapNotReady { attempts: u32 },
    #[error("no location available")]
    NoLocation,
    #[error("clipboard write failed: {0}")]
    ClipboardWrite(HostError),
    #[error("share sheet failed: {0}")]
    Share(HostError),
    #[error("preference could not be saved: {0}")]
    Preference(HostError),
}

/// Lifecycle of the map widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapStatus {
    /// Waiting for container or library; `attempts` checks made so far
    Pending { attempts: u32 },
    Live,
    Hidden,
    Failed,
}

/// Which displayed value a copy button targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyField {
    Decimal,
    Dms,
    MapsLink,
}

/// Events published to registered callbacks
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A delivery was accepted as the current reading
    LocationUpdated {
        token: RequestToken,
        reading: LocationReading,
    },
    /// A delivery arrived for a request that is no longer current
    StaleDeliveryIgnored { token: RequestToken },
    /// An error was caught and shown to the user
    ErrorOccurred { error: AppError },
    MapStateChanged { old: MapStatus, new: MapStatus },
    ThemeChanged { theme: Theme },
}
