//! Geolocation capability

use crate::host::HostResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one geolocation request.
///
/// Tokens are issued in increasing order by the controller; a delivery is
/// applied only when its token is the one currently awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub(crate) fn new(id: u64) -> Self {
        RequestToken(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Options passed along with every position request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionOptions {
    /// Ask the host for its most precise source
    pub high_accuracy: bool,
    /// Host-enforced timeout (milliseconds)
    pub timeout_ms: u32,
    /// Maximum age of a cached fix the host may return (milliseconds)
    pub maximum_age_ms: u32,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 10_000,
            maximum_age_ms: 0,
        }
    }
}

/// Failure kinds delivered by the geolocation host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcquisitionError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
}

impl AcquisitionError {
    /// Map a numeric host error code (1, 2, 3) to a failure kind
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => AcquisitionError::PermissionDenied,
            2 => AcquisitionError::PositionUnavailable,
            3 => AcquisitionError::Timeout,
            _ => AcquisitionError::Unknown,
        }
    }
}

impl fmt::Display for AcquisitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AcquisitionError::PermissionDenied => "permission denied",
            AcquisitionError::PositionUnavailable => "position unavailable",
            AcquisitionError::Timeout => "timeout",
            AcquisitionError::Unknown => "unknown error",
        };
        f.write_str(text)
    }
}

/// Host geolocation service.
///
/// `request_current_position` only starts the lookup. The host later reports
/// the outcome through `LocationApp::deliver_position` with the same token.
pub trait GeolocationProvider {
    /// Whether the host exposes geolocation at all
    fn is_supported(&self) -> bool;

    /// Start an asynchronous position lookup
    fn request_current_position(
        &mut self,
        token: RequestToken,
        options: &PositionOptions,
    ) -> HostResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AcquisitionError::from_code(1), AcquisitionError::PermissionDenied);
        assert_eq!(AcquisitionError::from_code(2), AcquisitionError::PositionUnavailable);
        assert_eq!(AcquisitionError::from_code(3), AcquisitionError::Timeout);
        assert_eq!(AcquisitionError::from_code(0), AcquisitionError::Unknown);
        assert_eq!(AcquisitionError::from_code(42), AcquisitionError::Unknown);
    }

    #[test]
    fn test_default_options() {
        let options = PositionOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout_ms, 10_000);
        assert_eq!(options.maximum_age_ms, 0);
    }

    #[test]
    fn test_tokens_order() {
        assert!(RequestToken::new(1) < RequestToken::new(2));
        assert_eq!(RequestToken::new(7).to_string(), "#7");
    }
}
