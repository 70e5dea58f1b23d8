//! Validation of host-reported location fixes

use thiserror::Error;

/// Reasons a reported fix cannot become a location reading
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("latitude {value} outside [-90, 90]")]
    LatitudeOutOfRange { value: f64 },
    #[error("longitude {value} outside [-180, 180]")]
    LongitudeOutOfRange { value: f64 },
    #[error("accuracy {value} m is not a non-negative number")]
    InvalidAccuracy { value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_value() {
        let err = ValidationError::LatitudeOutOfRange { value: 91.0 };
        assert_eq!(err.to_string(), "latitude 91 outside [-90, 90]");
    }
}
