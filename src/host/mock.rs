//! In-memory host capabilities for testing and demos
//!
//! Every mock is a cheap handle over shared state, so a test can keep one
//! clone for inspection while the controller owns another.

use crate::api::formatting::MarkerPopup;
use crate::core::LatLng;
use crate::host::{
    Capability, CircleStyle, Clipboard, DeferredTask, GeolocationProvider, HostError, HostResult,
    Hosts, LayerId, MapSurface, PositionOptions, PreferenceStore, RequestToken, ShareData,
    ShareSheet, TileLayer, Timer,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// Recorded geolocation traffic
#[derive(Debug, Default)]
pub struct GeolocationLog {
    pub supported: bool,
    pub requests: Vec<(RequestToken, PositionOptions)>,
    pub request_error: Option<HostError>,
}

/// Mock geolocation host
#[derive(Debug, Clone)]
pub struct MockGeolocation {
    inner: Rc<RefCell<GeolocationLog>>,
}

impl MockGeolocation {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(GeolocationLog {
                supported: true,
                ..Default::default()
            })),
        }
    }

    /// Host without a geolocation API
    pub fn unsupported() -> Self {
        let mock = Self::new();
        mock.inner.borrow_mut().supported = false;
        mock
    }

    /// Make the next requests fail immediately with `error`
    pub fn fail_requests_with(&self, error: HostError) {
        self.inner.borrow_mut().request_error = Some(error);
    }

    /// Tokens of all requests issued so far
    pub fn requested_tokens(&self) -> Vec<RequestToken> {
        self.inner.borrow().requests.iter().map(|(t, _)| *t).collect()
    }

    pub fn last_options(&self) -> Option<PositionOptions> {
        self.inner.borrow().requests.last().map(|(_, o)| o.clone())
    }
}

impl Default for MockGeolocation {
    fn default() -> Self {
        Self::new()
    }
}

impl GeolocationProvider for MockGeolocation {
    fn is_supported(&self) -> bool {
        self.inner.borrow().supported
    }

    fn request_current_position(
        &mut self,
        token: RequestToken,
        options: &PositionOptions,
    ) -> HostResult<()> {
        let mut inner = self.inner.borrow_mut();
        if let Some(err) = inner.request_error.clone() {
            return Err(err);
        }
        inner.requests.push((token, options.clone()));
        Ok(())
    }
}

/// Recorded map state
#[derive(Debug, Default)]
pub struct MapLog {
    pub ready: bool,
    pub fail_create: bool,
    pub live: bool,
    pub readiness_checks: u32,
    pub maps_created: u32,
    pub maps_removed: u32,
    pub size_invalidations: u32,
    pub view: Option<(LatLng, u8)>,
    pub tiles: Option<TileLayer>,
    pub markers: HashMap<LayerId, (LatLng, MarkerPopup)>,
    pub circles: HashMap<LayerId, (LatLng, f64)>,
    pub opened_popups: Vec<LayerId>,
    next_layer: u32,
}

/// Mock map surface
#[derive(Debug, Clone)]
pub struct MockMap {
    inner: Rc<RefCell<MapLog>>,
}

impl MockMap {
    /// Map whose container and library are already present
    pub fn ready() -> Self {
        Self {
            inner: Rc::new(RefCell::new(MapLog {
                ready: true,
                ..Default::default()
            })),
        }
    }

    /// Map whose prerequisites never appear until `set_ready(true)`
    pub fn not_ready() -> Self {
        Self {
            inner: Rc::new(RefCell::new(MapLog::default())),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        self.inner.borrow_mut().ready = ready;
    }

    /// Make `create_map` fail
    pub fn fail_create(&self) {
        self.inner.borrow_mut().fail_create = true;
    }

    /// Inspect the recorded state
    pub fn log(&self) -> std::cell::Ref<'_, MapLog> {
        self.inner.borrow()
    }
}

impl MapSurface for MockMap {
    fn check_ready(&self) -> HostResult<()> {
        let mut inner = self.inner.borrow_mut();
        inner.readiness_checks += 1;
        if inner.ready {
            Ok(())
        } else {
            Err(HostError::NotReady {
                capability: Capability::Map,
                detail: "map library not loaded".to_string(),
            })
        }
    }

    fn create_map(&mut self, center: LatLng, zoom: u8, tiles: &TileLayer) -> HostResult<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_create {
            return Err(HostError::Failed {
                capability: Capability::Map,
                reason: "tile layer rejected".to_string(),
            });
        }
        inner.live = true;
        inner.maps_created += 1;
        inner.view = Some((center, zoom));
        inner.tiles = Some(tiles.clone());
        Ok(())
    }

    fn remove_map(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.live = false;
        inner.maps_removed += 1;
        inner.markers.clear();
        inner.circles.clear();
        inner.view = None;
    }

    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.inner.borrow_mut().view = Some((center, zoom));
    }

    fn add_marker(&mut self, at: LatLng, popup: &MarkerPopup) -> LayerId {
        let mut inner = self.inner.borrow_mut();
        inner.next_layer += 1;
        let id = LayerId(inner.next_layer);
        inner.markers.insert(id, (at, popup.clone()));
        id
    }

    fn add_circle(&mut self, center: LatLng, radius_m: f64, _style: &CircleStyle) -> LayerId {
        let mut inner = self.inner.borrow_mut();
        inner.next_layer += 1;
        let id = LayerId(inner.next_layer);
        inner.circles.insert(id, (center, radius_m));
        id
    }

    fn remove_layer(&mut self, layer: LayerId) {
        let mut inner = self.inner.borrow_mut();
        inner.markers.remove(&layer);
        inner.circles.remove(&layer);
    }

    fn open_popup(&mut self, marker: LayerId) {
        self.inner.borrow_mut().opened_popups.push(marker);
    }

    fn invalidate_size(&mut self) {
        self.inner.borrow_mut().size_invalidations += 1;
    }
}

/// How the mock reacts to the selection-based copy path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegacyCopy {
    Succeeds,
    ReportsFailure,
    Errors,
}

/// Recorded clipboard traffic
#[derive(Debug)]
pub struct ClipboardLog {
    pub available: bool,
    pub write_fails: bool,
    pub legacy: LegacyCopy,
    pub written: Vec<String>,
    pub legacy_copies: Vec<String>,
}

/// Mock clipboard
#[derive(Debug, Clone)]
pub struct MockClipboard {
    inner: Rc<RefCell<ClipboardLog>>,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ClipboardLog {
                available: true,
                write_fails: false,
                legacy: LegacyCopy::Succeeds,
                written: Vec::new(),
                legacy_copies: Vec::new(),
            })),
        }
    }

    /// Host without the asynchronous clipboard API
    pub fn unavailable() -> Self {
        let mock = Self::new();
        mock.inner.borrow_mut().available = false;
        mock
    }

    pub fn fail_writes(&self) {
        self.inner.borrow_mut().write_fails = true;
    }

    pub fn set_legacy(&self, legacy: LegacyCopy) {
        self.inner.borrow_mut().legacy = legacy;
    }

    pub fn log(&self) -> std::cell::Ref<'_, ClipboardLog> {
        self.inner.borrow()
    }
}

impl Default for MockClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for MockClipboard {
    fn is_available(&self) -> bool {
        self.inner.borrow().available
    }

    fn write_text(&mut self, text: &str) -> HostResult<()> {
        let mut inner = self.inner.borrow_mut();
        if !inner.available {
            return Err(HostError::Unavailable {
                capability: Capability::Clipboard,
            });
        }
        if inner.write_fails {
            return Err(HostError::Rejected {
                capability: Capability::Clipboard,
                reason: "document not focused".to_string(),
            });
        }
        inner.written.push(text.to_string());
        Ok(())
    }

    fn legacy_copy(&mut self, text: &str) -> HostResult<bool> {
        let mut inner = self.inner.borrow_mut();
        match inner.legacy {
            LegacyCopy::Succeeds => {
                inner.legacy_copies.push(text.to_string());
                Ok(true)
            }
            LegacyCopy::ReportsFailure => Ok(false),
            LegacyCopy::Errors => Err(HostError::Failed {
                capability: Capability::Clipboard,
                reason: "copy command threw".to_string(),
            }),
        }
    }
}

/// Recorded share-sheet traffic
#[derive(Debug, Default)]
pub struct ShareLog {
    pub available: bool,
    pub fails: bool,
    pub shared: Vec<ShareData>,
}

/// Mock share sheet
#[derive(Debug, Clone)]
pub struct MockShareSheet {
    inner: Rc<RefCell<ShareLog>>,
}

impl MockShareSheet {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ShareLog {
                available: true,
                ..Default::default()
            })),
        }
    }

    /// Host without a share sheet
    pub fn unavailable() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ShareLog::default())),
        }
    }

    /// The user dismisses the sheet
    pub fn fail_shares(&self) {
        self.inner.borrow_mut().fails = true;
    }

    pub fn log(&self) -> std::cell::Ref<'_, ShareLog> {
        self.inner.borrow()
    }
}

impl Default for MockShareSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl ShareSheet for MockShareSheet {
    fn is_available(&self) -> bool {
        self.inner.borrow().available
    }

    fn share(&mut self, data: &ShareData) -> HostResult<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.fails {
            return Err(HostError::Rejected {
                capability: Capability::ShareSheet,
                reason: "share aborted".to_string(),
            });
        }
        inner.shared.push(data.clone());
        Ok(())
    }
}

/// In-memory preference store
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: Rc<RefCell<HashMap<String, String>>>,
    read_only: Rc<RefCell<bool>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let prefs = Self::new();
        prefs.values.borrow_mut().insert(key.to_string(), value.to_string());
        prefs
    }

    /// Reject all writes, like a storage quota error
    pub fn make_read_only(&self) {
        *self.read_only.borrow_mut() = true;
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> HostResult<()> {
        if *self.read_only.borrow() {
            return Err(HostError::Failed {
                capability: Capability::Preferences,
                reason: "quota exceeded".to_string(),
            });
        }
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Timer that only fires when the test says so
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    pending: Rc<RefCell<Vec<(Duration, DeferredTask)>>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every scheduled task in scheduling order
    pub fn take_pending(&self) -> Vec<DeferredTask> {
        self.pending.borrow_mut().drain(..).map(|(_, task)| task).collect()
    }

    pub fn pending(&self) -> Vec<(Duration, DeferredTask)> {
        self.pending.borrow().clone()
    }
}

impl Timer for ManualTimer {
    fn schedule(&mut self, delay: Duration, task: DeferredTask) {
        self.pending.borrow_mut().push((delay, task));
    }
}

/// A complete set of mocks plus the handles to inspect them
#[derive(Debug, Clone)]
pub struct MockHosts {
    pub geolocation: MockGeolocation,
    pub map: MockMap,
    pub clipboard: MockClipboard,
    pub share: MockShareSheet,
    pub preferences: MemoryPreferences,
    pub timer: ManualTimer,
}

impl MockHosts {
    /// Every capability present and working
    pub fn new() -> Self {
        Self {
            geolocation: MockGeolocation::new(),
            map: MockMap::ready(),
            clipboard: MockClipboard::new(),
            share: MockShareSheet::new(),
            preferences: MemoryPreferences::new(),
            timer: ManualTimer::new(),
        }
    }

    /// Boxed clones for handing to the controller
    pub fn hosts(&self) -> Hosts {
        Hosts {
            geolocation: Box::new(self.geolocation.clone()),
            map: Box::new(self.map.clone()),
            clipboard: Box::new(self.clipboard.clone()),
            share: Box::new(self.share.clone()),
            preferences: Box::new(self.preferences.clone()),
            timer: Box::new(self.timer.clone()),
        }
    }
}

impl Default for MockHosts {
    fn default() -> Self {
        Self::new()
    }
}
