//! Typed view model
//!
//! The controller writes into [`ViewState`]; the host renders it. No element
//! lookups happen anywhere else.

use crate::api::locale::Locale;
use crate::core::Theme;

/// The location button
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonState {
    pub label: String,
    pub enabled: bool,
}

/// What the map container shows instead of a map
#[derive(Debug, Clone, PartialEq)]
pub enum MapPlaceholder {
    Hidden { text: String },
    Failed { title: String, hint: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Copied,
    ShareCopied,
    CopyFailed,
    CopyImpossible,
}

/// Transient toast or alert
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// Modal holding the share text for manual copying
#[derive(Debug, Clone, PartialEq)]
pub struct ShareDialog {
    pub title: String,
    pub text: String,
    pub close_label: String,
}

/// Everything the widget displays
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub locate_button: ButtonState,
    pub decimal: Option<String>,
    pub dms: Option<String>,
    pub maps_url: Option<String>,
    pub accuracy_hint: Option<String>,
    pub location_info_visible: bool,
    pub error: Option<String>,
    pub map_placeholder: Option<MapPlaceholder>,
    pub map_toggle_label: String,
    pub theme: Theme,
    pub share_dialog: Option<ShareDialog>,
    /// Text offered in a selectable box after every copy path failed
    pub manual_copy: Option<String>,
    pub notice: Option<Notice>,
}

impl ViewState {
    /// Initial view before any interaction
    pub fn new(locale: Locale, theme: Theme) -> Self {
        let m = locale.messages();
        Self {
            locate_button: ButtonState {
                label: m.locate_button.to_string(),
                enabled: true,
            },
            decimal: None,
            dms: None,
            maps_url: None,
            accuracy_hint: None,
            location_info_visible: false,
            error: None,
            map_placeholder: None,
            map_toggle_label: m.hide_map.to_string(),
            theme,
            share_dialog: None,
            manual_copy: None,
            notice: None,
        }
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn hide_error(&mut self) {
        self.error = None;
    }

    pub fn set_notice(&mut self, kind: NoticeKind, text: &str) {
        self.notice = Some(Notice {
            kind,
            text: text.to_string(),
        });
    }
}
