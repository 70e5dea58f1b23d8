//! Event-driven controller for the location widget
//!
//! `LocationApp` owns all widget state. The host forwards user actions
//! (`request_location`, `share_location`, ...), geolocation deliveries and
//! elapsed timers (`run_task`) to it; the controller answers by calling host
//! capabilities and updating the [`ViewState`].

use crate::api::formatting::LocationFormatter;
use crate::api::locale::{Locale, Messages};
use crate::api::types::{AppError, AppEvent, CopyField, MapStatus};
use crate::api::view::{ButtonState, MapPlaceholder, NoticeKind, ShareDialog, ViewState};
use crate::core::{LocationReading, PositionFix, Theme, THEME_PREFERENCE_KEY};
use crate::host::{AcquisitionError, DeferredTask, HostError, Hosts, LayerId, RequestToken, ShareData};
use crate::utils::config::AppConfig;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Callback function type for controller events
pub type EventCallback = Box<dyn Fn(AppEvent)>;

/// Callback registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Mutable widget state, owned by the controller
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Last accepted reading
    pub current: Option<LocationReading>,
    /// Request whose delivery is awaited
    pub pending: Option<RequestToken>,
    pub map: MapStatus,
    pub marker: Option<LayerId>,
    pub accuracy_circle: Option<LayerId>,
    pub map_visible: bool,
    /// Bumped whenever map setup starts over; deferred map work from an
    /// older epoch is dropped
    pub map_epoch: u64,
    /// Sequence number of the notice currently shown
    pub notice_seq: u64,
    pub theme: Theme,
    next_token: u64,
}

impl AppState {
    fn new(theme: Theme) -> Self {
        Self {
            current: None,
            pending: None,
            map: MapStatus::Pending { attempts: 0 },
            marker: None,
            accuracy_circle: None,
            map_visible: true,
            map_epoch: 0,
            notice_seq: 0,
            theme,
            next_token: 0,
        }
    }

    fn issue_token(&mut self) -> RequestToken {
        self.next_token += 1;
        RequestToken::new(self.next_token)
    }
}

/// The location widget controller
pub struct LocationApp {
    config: AppConfig,
    formatter: LocationFormatter,
    hosts: Hosts,
    state: AppState,
    view: ViewState,
    callback_counter: u32,
    event_callbacks: HashMap<CallbackHandle, EventCallback>,
}

impl LocationApp {
    /// Build the controller, restore the theme preference and start map setup
    pub fn new(config: AppConfig, hosts: Hosts) -> Self {
        let theme = match hosts.preferences.get(THEME_PREFERENCE_KEY) {
            Some(stored) => Theme::parse(&stored).unwrap_or_else(|| {
                warn!(value = %stored, "ignoring unknown theme preference");
                config.default_theme
            }),
            None => config.default_theme,
        };

        let formatter = LocationFormatter::new(config.locale)
            .with_hint_threshold(config.accuracy_hint_threshold_m);
        let view = ViewState::new(config.locale, theme);

        let mut app = Self {
            config,
            formatter,
            hosts,
            state: AppState::new(theme),
            view,
            callback_counter: 0,
            event_callbacks: HashMap::new(),
        };
        app.init_map();
        app
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn current_reading(&self) -> Option<&LocationReading> {
        self.state.current.as_ref()
    }

    fn locale(&self) -> Locale {
        self.config.locale
    }

    fn messages(&self) -> &'static Messages {
        self.config.locale.messages()
    }

    /// Register an event callback
    pub fn register_event_callback(&mut self, callback: EventCallback) -> CallbackHandle {
        self.callback_counter += 1;
        let handle = CallbackHandle(self.callback_counter);
        self.event_callbacks.insert(handle, callback);
        handle
    }

    /// Unregister a callback. Returns `false` for an unknown handle.
    pub fn unregister_callback(&mut self, handle: CallbackHandle) -> bool {
        self.event_callbacks.remove(&handle).is_some()
    }

    fn emit(&self, event: AppEvent) {
        for callback in self.event_callbacks.values() {
            callback(event.clone());
        }
    }

    fn report_error(&self, error: AppError) {
        self.emit(AppEvent::ErrorOccurred { error });
    }

    fn set_map_status(&mut self, new: MapStatus) {
        let old = self.state.map;
        if old != new {
            self.state.map = new;
            self.emit(AppEvent::MapStateChanged { old, new });
        }
    }

    fn schedule(&mut self, delay_ms: u32, task: DeferredTask) {
        self.hosts
            .timer
            .schedule(Duration::from_millis(u64::from(delay_ms)), task);
    }

    // ---- location acquisition ----

    /// Start a position lookup.
    ///
    /// A new request supersedes any request still in flight: only the
    /// returned token will be accepted by [`LocationApp::deliver_position`].
    pub fn request_location(&mut self) -> Option<RequestToken> {
        let m = self.messages();

        if !self.hosts.geolocation.is_supported() {
            warn!("geolocation is not supported by this host");
            self.view.show_error(m.unsupported);
            self.report_error(AppError::GeolocationUnsupported);
            return None;
        }

        if let Some(previous) = self.state.pending {
            debug!(previous = %previous, "superseding in-flight position request");
        }

        let token = self.state.issue_token();
        self.state.pending = Some(token);
        self.view.locate_button = ButtonState {
            label: m.locate_busy.to_string(),
            enabled: false,
        };

        let options = self.config.geolocation.clone();
        match self.hosts.geolocation.request_current_position(token, &options) {
            Ok(()) => {
                info!(token = %token, high_accuracy = options.high_accuracy, "position requested");
                Some(token)
            }
            Err(err) => {
                warn!(token = %token, error = %err, "position request could not be started");
                self.state.pending = None;
                let message = match err {
                    HostError::Unavailable { .. } => m.unsupported.to_string(),
                    _ => self.locale().acquisition_message(AcquisitionError::Unknown),
                };
                self.view.show_error(message);
                self.reset_button();
                self.report_error(AppError::RequestFailed(err));
                None
            }
        }
    }

    /// Apply the outcome of a position request.
    ///
    /// Returns `false` when `token` is not the awaited request; such
    /// deliveries change nothing.
    pub fn deliver_position(
        &mut self,
        token: RequestToken,
        result: Result<PositionFix, AcquisitionError>,
    ) -> bool {
        if self.state.pending != Some(token) {
            debug!(token = %token, awaited = ?self.state.pending, "discarding stale position delivery");
            self.emit(AppEvent::StaleDeliveryIgnored { token });
            return false;
        }
        self.state.pending = None;

        let outcome = result
            .map_err(AppError::Acquisition)
            .and_then(|fix| fix.into_reading().map_err(AppError::from));

        match outcome {
            Ok(reading) => self.on_location_success(token, reading),
            Err(err) => self.on_location_error(token, err),
        }
        true
    }

    fn on_location_success(&mut self, token: RequestToken, reading: LocationReading) {
        info!(
            token = %token,
            accuracy_m = reading.accuracy_m(),
            "position acquired"
        );
        self.state.current = Some(reading);
        self.display_location(&reading);
        self.reset_button();
        self.view.hide_error();
        self.emit(AppEvent::LocationUpdated { token, reading });
    }

    fn on_location_error(&mut self, token: RequestToken, err: AppError) {
        let kind = match &err {
            AppError::Acquisition(kind) => *kind,
            _ => AcquisitionError::PositionUnavailable,
        };
        warn!(token = %token, error = %err, "position acquisition failed");
        let message = self.locale().acquisition_message(kind);
        self.view.show_error(message);
        self.reset_button();
        self.report_error(err);
    }

    fn display_location(&mut self, reading: &LocationReading) {
        let formatted = self.formatter.format(reading);
        self.view.decimal = Some(formatted.decimal);
        self.view.dms = Some(formatted.dms);
        self.view.maps_url = Some(formatted.maps_url);
        self.view.accuracy_hint = Some(formatted.accuracy_hint);
        self.view.location_info_visible = true;

        self.schedule(self.config.map.layout_settle_ms, DeferredTask::RefreshMap);
    }

    fn reset_button(&mut self) {
        self.view.locate_button = ButtonState {
            label: self.messages().locate_again.to_string(),
            enabled: true,
        };
    }

    // ---- deferred work ----

    /// Run a task whose delay has elapsed
    pub fn run_task(&mut self, task: DeferredTask) {
        match task {
            DeferredTask::InitMap(epoch) | DeferredTask::ShowMap(epoch) => {
                let pending = matches!(self.state.map, MapStatus::Pending { .. });
                if epoch != self.state.map_epoch || !pending {
                    debug!(?task, current_epoch = self.state.map_epoch, "dropping stale map task");
                    return;
                }
                self.try_init_map();
            }
            DeferredTask::RefreshMap => {
                self.update_map();
                if self.state.map == MapStatus::Live {
                    self.hosts.map.invalidate_size();
                }
            }
            DeferredTask::InvalidateMapSize => {
                if self.state.map == MapStatus::Live {
                    self.hosts.map.invalidate_size();
                }
            }
            DeferredTask::ClearNotice(seq) => {
                if seq == self.state.notice_seq {
                    self.view.notice = None;
                }
            }
        }
    }

    // ---- map ----

    /// Create the map at the default center, retrying while the host's map
    /// prerequisites are missing, up to `map.max_init_attempts` checks.
    ///
    /// Starts a new setup epoch, so retries scheduled by an earlier call are
    /// dropped instead of running alongside this one.
    pub fn init_map(&mut self) {
        if !self.state.map_visible {
            return;
        }
        self.state.map_epoch += 1;
        if let MapStatus::Pending { attempts } = self.state.map {
            if attempts > 0 {
                self.set_map_status(MapStatus::Pending { attempts: 0 });
            }
        }
        self.try_init_map();
    }

    fn try_init_map(&mut self) {
        if !self.state.map_visible {
            return;
        }

        if let Err(err) = self.hosts.map.check_ready() {
            if !err.is_retryable() {
                error!(error = %err, "map cannot be initialized");
                self.show_map_error(AppError::MapInitialization(err));
                return;
            }

            let attempts = match self.state.map {
                MapStatus::Pending { attempts } => attempts + 1,
                _ => 1,
            };
            if attempts >= self.config.map.max_init_attempts {
                error!(attempts, error = %err, "map prerequisites never became ready");
                self.show_map_error(AppError::MapNotReady { attempts });
            } else {
                debug!(attempts, error = %err, "map not ready, retrying");
                self.set_map_status(MapStatus::Pending { attempts });
                let epoch = self.state.map_epoch;
                self.schedule(self.config.map.init_retry_delay_ms, DeferredTask::InitMap(epoch));
            }
            return;
        }

        if self.state.map == MapStatus::Live {
            self.hosts.map.remove_map();
            self.state.marker = None;
            self.state.accuracy_circle = None;
        }

        let map_config = &self.config.map;
        match self.hosts.map.create_map(
            map_config.default_center,
            map_config.default_zoom,
            &map_config.tiles,
        ) {
            Ok(()) => {
                info!("map initialized");
                self.set_map_status(MapStatus::Live);
                self.view.map_placeholder = None;
                self.schedule(self.config.map.layout_settle_ms, DeferredTask::InvalidateMapSize);
                if self.state.current.is_some() {
                    self.update_map();
                }
            }
            Err(err) => {
                error!(error = %err, "map initialization failed");
                self.show_map_error(AppError::MapInitialization(err));
            }
        }
    }

    fn show_map_error(&mut self, err: AppError) {
        let m = self.messages();
        self.set_map_status(MapStatus::Failed);
        self.view.map_placeholder = Some(MapPlaceholder::Failed {
            title: m.map_failed.to_string(),
            hint: m.map_failed_hint.to_string(),
        });
        self.report_error(err);
    }

    /// Move the live map to the current reading and redraw its layers
    pub fn update_map(&mut self) {
        let reading = match (self.state.map, self.state.current) {
            (MapStatus::Live, Some(reading)) => reading,
            _ => return,
        };
        let coords = reading.coordinates();
        let map = &mut self.hosts.map;

        map.invalidate_size();
        map.set_view(coords, self.config.map.location_zoom);

        if let Some(marker) = self.state.marker.take() {
            map.remove_layer(marker);
        }
        let popup = self.formatter.popup(&reading);
        self.state.marker = Some(map.add_marker(coords, &popup));

        if let Some(circle) = self.state.accuracy_circle.take() {
            map.remove_layer(circle);
        }
        let accuracy = reading.accuracy_m();
        if accuracy > 0.0 && accuracy < self.config.map.max_circle_radius_m {
            self.state.accuracy_circle =
                Some(map.add_circle(coords, accuracy, &self.config.map.accuracy_circle));
        }

        debug!(lat = coords.lat, lng = coords.lng, "map updated");
    }

    /// Re-center the map on the current reading and open its popup
    pub fn center_map(&mut self) {
        let reading = match (self.state.map, self.state.current) {
            (MapStatus::Live, Some(reading)) => reading,
            _ => {
                let m = self.messages();
                self.view.show_error(m.no_location_to_center);
                self.report_error(AppError::NoLocation);
                return;
            }
        };

        self.hosts
            .map
            .set_view(reading.coordinates(), self.config.map.location_zoom);
        if let Some(marker) = self.state.marker {
            self.hosts.map.open_popup(marker);
        }
    }

    /// Hide the map, or show it again and rebuild it after layout settles
    pub fn toggle_map(&mut self) {
        let m = self.messages();

        if self.state.map_visible {
            if self.state.map == MapStatus::Live {
                self.hosts.map.remove_map();
            }
            self.state.marker = None;
            self.state.accuracy_circle = None;
            self.state.map_visible = false;
            self.state.map_epoch += 1;
            self.view.map_placeholder = Some(MapPlaceholder::Hidden {
                text: m.map_hidden.to_string(),
            });
            self.view.map_toggle_label = m.show_map.to_string();
            self.set_map_status(MapStatus::Hidden);
            info!("map hidden");
        } else {
            self.state.map_visible = true;
            self.view.map_placeholder = None;
            self.view.map_toggle_label = m.hide_map.to_string();
            self.set_map_status(MapStatus::Pending { attempts: 0 });
            self.state.map_epoch += 1;
            let epoch = self.state.map_epoch;
            self.schedule(self.config.map.layout_settle_ms, DeferredTask::ShowMap(epoch));
            info!("map shown");
        }
    }

    // ---- sharing and copying ----

    /// Share all formats of the current reading; no-op without a reading
    pub fn share_location(&mut self) {
        let reading = match self.state.current {
            Some(reading) => reading,
            None => {
                debug!("nothing to share yet");
                return;
            }
        };
        let data = self.formatter.share_data(&reading);

        if self.hosts.share.is_available() {
            match self.hosts.share.share(&data) {
                Ok(()) => info!("location shared"),
                Err(err) => {
                    warn!(error = %err, "sharing failed");
                    self.report_error(AppError::Share(err));
                }
            }
            return;
        }

        self.fallback_share(data);
    }

    fn fallback_share(&mut self, data: ShareData) {
        let m = self.messages();

        if self.hosts.clipboard.is_available() {
            match self.hosts.clipboard.write_text(&data.text) {
                Ok(()) => {
                    self.show_notice(NoticeKind::ShareCopied, m.share_copied);
                    return;
                }
                Err(err) => {
                    warn!(error = %err, "copying share text failed");
                    self.report_error(AppError::ClipboardWrite(err));
                }
            }
        }

        self.view.share_dialog = Some(ShareDialog {
            title: m.share_dialog_title.to_string(),
            text: data.text,
            close_label: m.close.to_string(),
        });
    }

    /// Copy one displayed value of the current reading
    pub fn copy_field(&mut self, field: CopyField) {
        let reading = match self.state.current {
            Some(reading) => reading,
            None => {
                debug!(?field, "nothing to copy yet");
                return;
            }
        };
        let formatted = self.formatter.format(&reading);
        let text = match field {
            CopyField::Decimal => formatted.decimal,
            CopyField::Dms => formatted.dms,
            CopyField::MapsLink => formatted.maps_url,
        };

        if self.hosts.clipboard.is_available() {
            match self.hosts.clipboard.write_text(&text) {
                Ok(()) => {
                    self.show_copy_feedback();
                    return;
                }
                Err(err) => {
                    error!(error = %err, "clipboard write failed");
                    self.report_error(AppError::ClipboardWrite(err));
                }
            }
        }

        self.fallback_copy(text);
    }

    fn fallback_copy(&mut self, text: String) {
        let m = self.messages();
        match self.hosts.clipboard.legacy_copy(&text) {
            Ok(true) => self.show_copy_feedback(),
            Ok(false) => {
                self.show_notice(NoticeKind::CopyFailed, m.copy_failed);
                self.view.manual_copy = Some(text);
            }
            Err(err) => {
                error!(error = %err, "fallback copy failed");
                self.show_notice(NoticeKind::CopyImpossible, m.copy_impossible);
                self.view.manual_copy = Some(text);
                self.report_error(AppError::ClipboardWrite(err));
            }
        }
    }

    fn show_copy_feedback(&mut self) {
        let m = self.messages();
        let seq = self.show_notice(NoticeKind::Copied, m.copied);
        self.schedule(self.config.copy_notice_ms, DeferredTask::ClearNotice(seq));
    }

    fn show_notice(&mut self, kind: NoticeKind, text: &str) -> u64 {
        self.state.notice_seq += 1;
        self.view.set_notice(kind, text);
        self.state.notice_seq
    }

    pub fn close_share_dialog(&mut self) {
        self.view.share_dialog = None;
    }

    pub fn dismiss_manual_copy(&mut self) {
        self.view.manual_copy = None;
    }

    pub fn dismiss_notice(&mut self) {
        self.view.notice = None;
    }

    // ---- theme ----

    /// Switch between light and dark and persist the choice
    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.state.theme.toggled();
        self.state.theme = theme;
        self.view.theme = theme;

        if let Err(err) = self.hosts.preferences.set(THEME_PREFERENCE_KEY, theme.as_str()) {
            warn!(error = %err, "theme preference not saved");
            self.report_error(AppError::Preference(err));
        }

        self.emit(AppEvent::ThemeChanged { theme });
        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::view::Notice;
    use crate::host::mock::{LegacyCopy, MemoryPreferences, MockClipboard, MockGeolocation, MockHosts, MockMap, MockShareSheet};
    use crate::host::Capability;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn app_with(mocks: &MockHosts) -> LocationApp {
        LocationApp::new(AppConfig::default(), mocks.hosts())
    }

    fn berlin_fix() -> PositionFix {
        PositionFix::new(52.52, 13.405, 12.4)
    }

    fn located(mocks: &MockHosts) -> LocationApp {
        let mut app = app_with(mocks);
        let token = app.request_location().unwrap();
        assert!(app.deliver_position(token, Ok(berlin_fix())));
        app
    }

    fn fire_pending(app: &mut LocationApp, mocks: &MockHosts) {
        for task in mocks.timer.take_pending() {
            app.run_task(task);
        }
    }

    #[test]
    fn test_startup_creates_map_at_default_center() {
        let mocks = MockHosts::new();
        let app = app_with(&mocks);

        assert_eq!(app.state().map, MapStatus::Live);
        let log = mocks.map.log();
        assert_eq!(log.maps_created, 1);
        let (center, zoom) = log.view.unwrap();
        assert_eq!(center.lat, 52.52);
        assert_eq!(center.lng, 13.405);
        assert_eq!(zoom, 13);
        assert_eq!(log.tiles.as_ref().unwrap().max_zoom, 19);
        assert_eq!(
            mocks.timer.take_pending(),
            vec![DeferredTask::InvalidateMapSize]
        );
    }

    #[test]
    fn test_successful_location_fills_view() {
        let mocks = MockHosts::new();
        let mut app = app_with(&mocks);

        let token = app.request_location().unwrap();
        assert_eq!(app.view().locate_button.label, "Standort wird abgerufen...");
        assert!(!app.view().locate_button.enabled);
        assert_eq!(mocks.geolocation.requested_tokens(), vec![token]);
        assert_eq!(mocks.geolocation.last_options().unwrap().timeout_ms, 10_000);

        assert!(app.deliver_position(token, Ok(berlin_fix())));
        let view = app.view();
        assert_eq!(view.decimal.as_deref(), Some("52.520000, 13.405000"));
        assert_eq!(view.dms.as_deref(), Some("52° 31' 12.00\" N, 13° 24' 18.00\" O"));
        assert_eq!(
            view.maps_url.as_deref(),
            Some("https://www.google.com/maps?q=52.52,13.405")
        );
        assert_eq!(
            view.accuracy_hint.as_deref(),
            Some("What3Words: Für genaue Adresse What3Words App verwenden")
        );
        assert!(view.location_info_visible);
        assert!(view.error.is_none());
        assert_eq!(view.locate_button.label, "Standort erneut abrufen");
        assert!(view.locate_button.enabled);
        assert!(app.state().pending.is_none());
    }

    #[test]
    fn test_refresh_places_marker_and_circle() {
        let mocks = MockHosts::new();
        let mut app = located(&mocks);
        fire_pending(&mut app, &mocks);

        let log = mocks.map.log();
        let (center, zoom) = log.view.unwrap();
        assert_eq!((center.lat, center.lng, zoom), (52.52, 13.405, 15));
        assert_eq!(log.markers.len(), 1);
        let (_, popup) = log.markers.values().next().unwrap();
        assert_eq!(popup.accuracy, "Genauigkeit: ±12m");
        assert_eq!(log.circles.len(), 1);
        assert!(log.size_invalidations >= 2);
    }

    #[test]
    fn test_second_reading_replaces_marker_and_circle() {
        let mocks = MockHosts::new();
        let mut app = located(&mocks);
        fire_pending(&mut app, &mocks);

        let token = app.request_location().unwrap();
        app.deliver_position(token, Ok(PositionFix::new(48.137, 11.575, 30.0)));
        fire_pending(&mut app, &mocks);

        let log = mocks.map.log();
        assert_eq!(log.markers.len(), 1);
        assert_eq!(log.circles.len(), 1);
        let (center, _) = log.circles.values().next().unwrap();
        assert_eq!(center.lat, 48.137);
    }

    #[test]
    fn test_no_circle_for_coarse_or_zero_accuracy() {
        let mocks = MockHosts::new();
        let mut app = app_with(&mocks);

        let token = app.request_location().unwrap();
        app.deliver_position(token, Ok(PositionFix::new(1.0, 2.0, 1500.0)));
        fire_pending(&mut app, &mocks);
        assert!(mocks.map.log().circles.is_empty());
        assert_eq!(
            app.view().accuracy_hint.as_deref(),
            Some("Standort zu ungenau für What3Words (Genauigkeit: 1500m)")
        );

        let token = app.request_location().unwrap();
        app.deliver_position(token, Ok(PositionFix::new(1.0, 2.0, 0.0)));
        fire_pending(&mut app, &mocks);
        assert!(mocks.map.log().circles.is_empty());
    }

    #[test]
    fn test_stale_delivery_is_discarded() {
        let mocks = MockHosts::new();
        let mut app = app_with(&mocks);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        app.register_event_callback(Box::new(move |e: AppEvent| sink.borrow_mut().push(e)));

        let first = app.request_location().unwrap();
        let second = app.request_location().unwrap();
        assert_ne!(first, second);

        assert!(app.deliver_position(second, Ok(berlin_fix())));
        assert!(!app.deliver_position(first, Ok(PositionFix::new(0.0, 0.0, 5.0))));

        let reading = app.current_reading().unwrap();
        assert_eq!(reading.coordinates().lat, 52.52);
        assert!(events
            .borrow()
            .contains(&AppEvent::StaleDeliveryIgnored { token: first }));
    }

    #[test]
    fn test_late_error_does_not_clobber_reading() {
        let mocks = MockHosts::new();
        let mut app = app_with(&mocks);

        let first = app.request_location().unwrap();
        let second = app.request_location().unwrap();
        app.deliver_position(second, Ok(berlin_fix()));
        assert!(!app.deliver_position(first, Err(AcquisitionError::Timeout)));
        assert!(app.view().error.is_none());

        // a repeated delivery for a finished request is stale too
        assert!(!app.deliver_position(second, Ok(PositionFix::new(1.0, 1.0, 1.0))));
        assert_eq!(app.current_reading().unwrap().coordinates().lat, 52.52);
    }

    #[test]
    fn test_acquisition_errors_show_messages() {
        let cases = [
            (AcquisitionError::PermissionDenied, "Standortzugriff wurde verweigert."),
            (AcquisitionError::PositionUnavailable, "Standortinformationen sind nicht verfügbar."),
            (AcquisitionError::Timeout, "Zeitüberschreitung beim Abrufen des Standorts."),
            (AcquisitionError::Unknown, "Ein unbekannter Fehler ist aufgetreten."),
        ];
        for (kind, detail) in cases {
            let mocks = MockHosts::new();
            let mut app = app_with(&mocks);
            let token = app.request_location().unwrap();
            app.deliver_position(token, Err(kind));

            let expected = format!("Fehler beim Abrufen des Standorts: {}", detail);
            assert_eq!(app.view().error.as_deref(), Some(expected.as_str()));
            assert!(app.view().locate_button.enabled);
            assert!(app.current_reading().is_none());
        }
    }

    #[test]
    fn test_invalid_fix_is_reported_as_unavailable() {
        let mocks = MockHosts::new();
        let mut app = app_with(&mocks);
        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = errors.clone();
        app.register_event_callback(Box::new(move |e: AppEvent| {
            if let AppEvent::ErrorOccurred { error } = e {
                sink.borrow_mut().push(error);
            }
        }));

        let token = app.request_location().unwrap();
        app.deliver_position(token, Ok(PositionFix::new(120.0, 0.0, 5.0)));
        assert!(app.current_reading().is_none());
        assert_eq!(
            app.view().error.as_deref(),
            Some("Fehler beim Abrufen des Standorts: Standortinformationen sind nicht verfügbar.")
        );
        assert!(matches!(errors.borrow()[0], AppError::InvalidReading(_)));
    }

    #[test]
    fn test_unsupported_geolocation() {
        let mut mocks = MockHosts::new();
        mocks.geolocation = MockGeolocation::unsupported();
        let mut app = app_with(&mocks);

        assert!(app.request_location().is_none());
        assert_eq!(
            app.view().error.as_deref(),
            Some("Geolocation wird von diesem Browser nicht unterstützt.")
        );
        assert!(app.view().locate_button.enabled);
    }

    #[test]
    fn test_request_start_failure_resets_button() {
        let mocks = MockHosts::new();
        mocks.geolocation.fail_requests_with(HostError::Failed {
            capability: Capability::Geolocation,
            reason: "insecure context".to_string(),
        });
        let mut app = app_with(&mocks);

        assert!(app.request_location().is_none());
        assert!(app.state().pending.is_none());
        assert!(app.view().locate_button.enabled);
        assert!(app.view().error.is_some());
    }

    #[test]
    fn test_map_retries_until_ready() {
        let mut mocks = MockHosts::new();
        mocks.map = MockMap::not_ready();
        let mut app = app_with(&mocks);

        assert_eq!(app.state().map, MapStatus::Pending { attempts: 1 });
        let pending = mocks.timer.pending();
        let epoch = app.state().map_epoch;
        assert_eq!(pending, vec![(Duration::from_millis(100), DeferredTask::InitMap(epoch))]);

        fire_pending(&mut app, &mocks);
        assert_eq!(app.state().map, MapStatus::Pending { attempts: 2 });

        mocks.map.set_ready(true);
        fire_pending(&mut app, &mocks);
        assert_eq!(app.state().map, MapStatus::Live);
        assert_eq!(mocks.map.log().maps_created, 1);
    }

    #[test]
    fn test_map_retry_is_bounded() {
        let mut mocks = MockHosts::new();
        mocks.map = MockMap::not_ready();
        let mut config = AppConfig::default();
        config.map.max_init_attempts = 3;
        let mut app = LocationApp::new(config, mocks.hosts());

        for _ in 0..10 {
            fire_pending(&mut app, &mocks);
        }

        assert_eq!(app.state().map, MapStatus::Failed);
        assert_eq!(mocks.map.log().readiness_checks, 3);
        assert!(mocks.timer.pending().is_empty());
        assert_eq!(
            app.view().map_placeholder,
            Some(MapPlaceholder::Failed {
                title: "⚠️ Karte konnte nicht geladen werden".to_string(),
                hint: "Möglicherweise ist keine Internetverbindung verfügbar".to_string(),
            })
        );
    }

    #[test]
    fn test_map_creation_failure_shows_placeholder() {
        let mocks = MockHosts::new();
        mocks.map.fail_create();
        let app = app_with(&mocks);

        assert_eq!(app.state().map, MapStatus::Failed);
        assert!(matches!(
            app.view().map_placeholder,
            Some(MapPlaceholder::Failed { .. })
        ));
    }

    #[test]
    fn test_center_map_requires_reading() {
        let mocks = MockHosts::new();
        let mut app = app_with(&mocks);

        app.center_map();
        assert_eq!(
            app.view().error.as_deref(),
            Some("Kein Standort verfügbar zum Zentrieren der Karte.")
        );
    }

    #[test]
    fn test_center_map_opens_popup() {
        let mocks = MockHosts::new();
        let mut app = located(&mocks);
        fire_pending(&mut app, &mocks);

        app.center_map();

        let log = mocks.map.log();
        let (center, zoom) = log.view.unwrap();
        assert_eq!((center.lat, zoom), (52.52, 15));
        assert_eq!(log.opened_popups, vec![app.state().marker.unwrap()]);
    }

    #[test]
    fn test_toggle_map_hides_and_restores() {
        let mocks = MockHosts::new();
        let mut app = located(&mocks);
        fire_pending(&mut app, &mocks);

        app.toggle_map();
        assert_eq!(app.state().map, MapStatus::Hidden);
        assert!(!mocks.map.log().live);
        assert_eq!(app.view().map_toggle_label, "Karte einblenden");
        assert_eq!(
            app.view().map_placeholder,
            Some(MapPlaceholder::Hidden {
                text: "Karte ist ausgeblendet".to_string()
            })
        );

        // centering while hidden is an error, not a crash
        app.center_map();
        assert!(app.view().error.is_some());

        app.toggle_map();
        assert_eq!(app.view().map_toggle_label, "Karte ausblenden");
        assert!(app.view().map_placeholder.is_none());
        assert_eq!(
            mocks.timer.pending(),
            vec![(
                Duration::from_millis(100),
                DeferredTask::ShowMap(app.state().map_epoch)
            )]
        );

        fire_pending(&mut app, &mocks);
        assert_eq!(app.state().map, MapStatus::Live);
        let log = mocks.map.log();
        assert_eq!(log.maps_created, 2);
        assert_eq!(log.markers.len(), 1);
        assert_eq!(log.view.unwrap().1, 15);
    }

    #[test]
    fn test_hidden_map_ignores_refresh() {
        let mocks = MockHosts::new();
        let mut app = app_with(&mocks);
        mocks.timer.take_pending();
        app.toggle_map();

        let token = app.request_location().unwrap();
        app.deliver_position(token, Ok(berlin_fix()));
        fire_pending(&mut app, &mocks);
        assert!(mocks.map.log().markers.is_empty());
        assert_eq!(app.state().map, MapStatus::Hidden);
    }

    #[test]
    fn test_share_uses_share_sheet() {
        let mocks = MockHosts::new();
        let mut app = located(&mocks);
        app.share_location();

        let log = mocks.share.log();
        assert_eq!(log.shared.len(), 1);
        assert_eq!(log.shared[0].title, "Mein Standort");
        assert!(log.shared[0].text.ends_with("🎯 Genauigkeit: ±12m"));
        assert!(mocks.clipboard.log().written.is_empty());
    }

    #[test]
    fn test_share_without_reading_is_noop() {
        let mocks = MockHosts::new();
        let mut app = app_with(&mocks);
        app.share_location();
        assert!(mocks.share.log().shared.is_empty());
        assert!(app.view().share_dialog.is_none());
    }

    #[test]
    fn test_share_falls_back_to_clipboard() {
        let mut mocks = MockHosts::new();
        mocks.share = MockShareSheet::unavailable();
        let mut app = located(&mocks);
        app.share_location();

        assert_eq!(mocks.clipboard.log().written.len(), 1);
        assert_eq!(
            app.view().notice,
            Some(Notice {
                kind: NoticeKind::ShareCopied,
                text: "Alle Standortdaten in Zwischenablage kopiert!".to_string(),
            })
        );
    }

    #[test]
    fn test_share_falls_back_to_dialog() {
        let mut mocks = MockHosts::new();
        mocks.share = MockShareSheet::unavailable();
        mocks.clipboard = MockClipboard::unavailable();
        let mut app = located(&mocks);
        app.share_location();

        let dialog = app.view().share_dialog.clone().unwrap();
        assert_eq!(dialog.title, "Standort teilen");
        assert_eq!(dialog.close_label, "Schließen");
        assert!(dialog.text.starts_with("📍 Mein Standort"));

        app.close_share_dialog();
        assert!(app.view().share_dialog.is_none());
    }

    #[test]
    fn test_share_dialog_after_clipboard_rejection() {
        let mut mocks = MockHosts::new();
        mocks.share = MockShareSheet::unavailable();
        mocks.clipboard.fail_writes();
        let mut app = located(&mocks);
        app.share_location();
        assert!(app.view().share_dialog.is_some());
    }

    #[test]
    fn test_share_sheet_failure_is_only_logged() {
        let mocks = MockHosts::new();
        mocks.share.fail_shares();
        let mut app = located(&mocks);
        app.share_location();
        assert!(app.view().share_dialog.is_none());
        assert!(app.view().error.is_none());
    }

    #[test]
    fn test_copy_field_writes_clipboard() {
        let mocks = MockHosts::new();
        let mut app = located(&mocks);
        mocks.timer.take_pending();

        app.copy_field(CopyField::Decimal);
        app.copy_field(CopyField::Dms);
        app.copy_field(CopyField::MapsLink);

        assert_eq!(
            mocks.clipboard.log().written,
            vec![
                "52.520000, 13.405000".to_string(),
                "52° 31' 12.00\" N, 13° 24' 18.00\" O".to_string(),
                "https://www.google.com/maps?q=52.52,13.405".to_string(),
            ]
        );
        assert_eq!(app.view().notice.as_ref().unwrap().text, "In Zwischenablage kopiert!");
        assert!(mocks
            .timer
            .pending()
            .contains(&(
                Duration::from_millis(2000),
                DeferredTask::ClearNotice(app.state().notice_seq)
            )));

        fire_pending(&mut app, &mocks);
        assert!(app.view().notice.is_none());
    }

    #[test]
    fn test_copy_falls_back_to_legacy_copy() {
        let mocks = MockHosts::new();
        mocks.clipboard.fail_writes();
        let mut app = located(&mocks);

        app.copy_field(CopyField::Decimal);
        assert_eq!(
            mocks.clipboard.log().legacy_copies,
            vec!["52.520000, 13.405000".to_string()]
        );
        assert_eq!(app.view().notice.as_ref().unwrap().kind, NoticeKind::Copied);
        assert!(app.view().manual_copy.is_none());
    }

    #[test]
    fn test_copy_offers_manual_selection_when_all_paths_fail() {
        let mut mocks = MockHosts::new();
        mocks.clipboard = MockClipboard::unavailable();
        mocks.clipboard.set_legacy(LegacyCopy::ReportsFailure);
        let mut app = located(&mocks);

        app.copy_field(CopyField::MapsLink);
        assert_eq!(
            app.view().notice.as_ref().unwrap().text,
            "Kopieren fehlgeschlagen. Text manuell auswählen und kopieren."
        );
        assert_eq!(
            app.view().manual_copy.as_deref(),
            Some("https://www.google.com/maps?q=52.52,13.405")
        );

        mocks.clipboard.set_legacy(LegacyCopy::Errors);
        app.copy_field(CopyField::Decimal);
        assert_eq!(app.view().notice.as_ref().unwrap().kind, NoticeKind::CopyImpossible);
        assert_eq!(app.view().manual_copy.as_deref(), Some("52.520000, 13.405000"));

        app.dismiss_manual_copy();
        assert!(app.view().manual_copy.is_none());
    }

    #[test]
    fn test_clear_notice_keeps_other_notices() {
        let mut mocks = MockHosts::new();
        mocks.share = MockShareSheet::unavailable();
        let mut app = located(&mocks);

        mocks.timer.take_pending();
        app.copy_field(CopyField::Decimal);
        let clear = mocks.timer.take_pending();
        app.share_location();
        for task in clear {
            app.run_task(task);
        }
        assert_eq!(app.view().notice.as_ref().unwrap().kind, NoticeKind::ShareCopied);

        app.dismiss_notice();
        assert!(app.view().notice.is_none());
    }

    #[test]
    fn test_older_clear_timer_keeps_newer_copy_notice() {
        let mocks = MockHosts::new();
        let mut app = located(&mocks);
        mocks.timer.take_pending();

        app.copy_field(CopyField::Decimal);
        let first = mocks.timer.take_pending();
        app.copy_field(CopyField::Dms);
        let second = mocks.timer.take_pending();

        for task in first {
            app.run_task(task);
        }
        assert_eq!(app.view().notice.as_ref().unwrap().kind, NoticeKind::Copied);

        for task in second {
            app.run_task(task);
        }
        assert!(app.view().notice.is_none());
    }

    #[test]
    fn test_toggle_during_retry_keeps_single_chain() {
        let mut mocks = MockHosts::new();
        mocks.map = MockMap::not_ready();
        let mut app = app_with(&mocks);
        assert_eq!(app.state().map, MapStatus::Pending { attempts: 1 });

        app.toggle_map();
        app.toggle_map();
        for _ in 0..3 {
            fire_pending(&mut app, &mocks);
        }

        let epoch = app.state().map_epoch;
        assert_eq!(app.state().map, MapStatus::Pending { attempts: 3 });
        assert_eq!(
            mocks.timer.pending(),
            vec![(Duration::from_millis(100), DeferredTask::InitMap(epoch))]
        );
    }

    #[test]
    fn test_repeated_toggles_create_map_once() {
        let mocks = MockHosts::new();
        let mut app = app_with(&mocks);
        mocks.timer.take_pending();

        app.toggle_map();
        app.toggle_map();
        app.toggle_map();
        app.toggle_map();
        fire_pending(&mut app, &mocks);

        assert_eq!(app.state().map, MapStatus::Live);
        // one at startup, one for the last show
        assert_eq!(mocks.map.log().maps_created, 2);

        // a show task that outlived its epoch does nothing
        let stale = app.state().map_epoch - 2;
        app.run_task(DeferredTask::ShowMap(stale));
        assert_eq!(mocks.map.log().maps_created, 2);
    }

    #[test]
    fn test_theme_loaded_and_persisted() {
        let mut mocks = MockHosts::new();
        mocks.preferences = MemoryPreferences::with_entry("theme", "dark");
        let mut app = app_with(&mocks);
        assert_eq!(app.view().theme, Theme::Dark);

        assert_eq!(app.toggle_theme(), Theme::Light);
        assert_eq!(app.view().theme, Theme::Light);
        assert_eq!(
            crate::host::PreferenceStore::get(&mocks.preferences, "theme").as_deref(),
            Some("light")
        );
    }

    #[test]
    fn test_unknown_theme_falls_back_to_default() {
        let mut mocks = MockHosts::new();
        mocks.preferences = MemoryPreferences::with_entry("theme", "neon");
        let app = app_with(&mocks);
        assert_eq!(app.state().theme, Theme::Light);
    }

    #[test]
    fn test_theme_toggle_survives_storage_failure() {
        let mocks = MockHosts::new();
        mocks.preferences.make_read_only();
        let mut app = app_with(&mocks);

        assert_eq!(app.toggle_theme(), Theme::Dark);
        assert_eq!(app.view().theme, Theme::Dark);
    }

    #[test]
    fn test_english_locale() {
        let mocks = MockHosts::new();
        let mut config = AppConfig::default();
        config.locale = Locale::English;
        let mut app = LocationApp::new(config, mocks.hosts());

        let token = app.request_location().unwrap();
        app.deliver_position(token, Ok(berlin_fix()));
        assert_eq!(app.view().dms.as_deref(), Some("52° 31' 12.00\" N, 13° 24' 18.00\" E"));
        assert_eq!(app.view().locate_button.label, "Get location again");
    }

    #[test]
    fn test_callbacks_can_be_unregistered() {
        let mocks = MockHosts::new();
        let mut app = app_with(&mocks);
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let handle = app.register_event_callback(Box::new(move |_: AppEvent| *sink.borrow_mut() += 1));

        app.toggle_theme();
        assert_eq!(*count.borrow(), 1);
        assert!(app.unregister_callback(handle));
        assert!(!app.unregister_callback(handle));
        app.toggle_theme();
        assert_eq!(*count.borrow(), 1);
    }
}
