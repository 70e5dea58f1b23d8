//! Utility modules for configuration and logging

pub mod config;
pub mod logging;

pub use config::{AppConfig, ConfigError, ConfigurationManager, MapConfig};
pub use logging::init_logging;
