//! Clipboard capability

use crate::host::{Capability, HostError, HostResult};

/// Host clipboard access
pub trait Clipboard {
    /// Whether the asynchronous clipboard API exists
    fn is_available(&self) -> bool;

    /// Write text through the clipboard API
    fn write_text(&mut self, text: &str) -> HostResult<()>;

    /// Selection-based copy used when `write_text` is missing or fails.
    /// `Ok(false)` means the host ran the copy but reported no success.
    fn legacy_copy(&mut self, _text: &str) -> HostResult<bool> {
        Err(HostError::Unavailable {
            capability: Capability::Clipboard,
        })
    }
}
