//! Host capability error types and handling

use thiserror::Error;

/// Host capabilities the widget depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Geolocation,
    Map,
    Clipboard,
    ShareSheet,
    Preferences,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Capability::Geolocation => "geolocation",
            Capability::Map => "map",
            Capability::Clipboard => "clipboard",
            Capability::ShareSheet => "share sheet",
            Capability::Preferences => "preference store",
        };
        f.write_str(name)
    }
}

/// Errors reported by host capability adapters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    /// The capability does not exist in this host
    #[error("{capability} is not available")]
    Unavailable { capability: Capability },
    /// A prerequisite has not loaded yet
    #[error("{capability} not ready: {detail}")]
    NotReady { capability: Capability, detail: String },
    /// The user or the host refused the operation
    #[error("{capability} rejected the operation: {reason}")]
    Rejected { capability: Capability, reason: String },
    /// Any other failure inside the adapter
    #[error("{capability} failed: {reason}")]
    Failed { capability: Capability, reason: String },
}

/// Result type for host capability calls
pub type HostResult<T> = Result<T, HostError>;

/// How the controller should react to a host error
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecoveryStrategy {
    /// Try again after the configured delay
    RetryWithDelay,
    /// Take the documented fallback path
    Fallback,
    /// Surface the failure to the user
    Fail,
}

impl HostError {
    /// Get the recommended recovery strategy for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            HostError::NotReady { .. } => RecoveryStrategy::RetryWithDelay,
            HostError::Unavailable { .. } | HostError::Rejected { .. } => RecoveryStrategy::Fallback,
            HostError::Failed { .. } => RecoveryStrategy::Fail,
        }
    }

    /// Check if waiting and retrying may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self.recovery_strategy(), RecoveryStrategy::RetryWithDelay)
    }

    /// The capability that raised this error
    pub fn capability(&self) -> Capability {
        match self {
            HostError::Unavailable { capability }
            | HostError::NotReady { capability, .. }
            | HostError::Rejected { capability, .. }
            | HostError::Failed { capability, .. } => *capability,
        }
    }
}
