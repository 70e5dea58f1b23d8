//! Validation of host-reported positions

pub mod reading;

pub use reading::ValidationError;
