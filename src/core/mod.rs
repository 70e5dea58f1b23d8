//! Core types and constants for the location widget

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
