//! Host capability abstraction
//!
//! The widget never touches a browser API directly. Each capability it uses
//! is a trait here; a shell (wasm bindings, a native webview, tests) supplies
//! the implementations bundled in [`Hosts`].

pub mod clipboard;
pub mod error;
pub mod geolocation;
pub mod map;
pub mod mock;
pub mod preferences;
pub mod share;
pub mod timer;

pub use clipboard::Clipboard;
pub use error::{Capability, HostError, HostResult, RecoveryStrategy};
pub use geolocation::{AcquisitionError, GeolocationProvider, PositionOptions, RequestToken};
pub use map::{CircleStyle, LayerId, MapSurface, TileLayer};
pub use preferences::PreferenceStore;
pub use share::{ShareData, ShareSheet};
pub use timer::{DeferredTask, Timer};

/// The full set of host capabilities handed to the controller
pub struct Hosts {
    pub geolocation: Box<dyn GeolocationProvider>,
    pub map: Box<dyn MapSurface>,
    pub clipboard: Box<dyn Clipboard>,
    pub share: Box<dyn ShareSheet>,
    pub preferences: Box<dyn PreferenceStore>,
    pub timer: Box<dyn Timer>,
}
