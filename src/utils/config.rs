use crate::api::locale::Locale;
use crate::core::{LatLng, Theme, DEFAULT_CENTER, MAX_LATITUDE_DEG, MAX_LONGITUDE_DEG};
use crate::host::{CircleStyle, PositionOptions, TileLayer};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Widget-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Language of all displayed text
    pub locale: Locale,
    /// Options passed with every geolocation request
    pub geolocation: PositionOptions,
    /// Map behaviour
    pub map: MapConfig,
    /// Accuracy above which the what3words hint warns (meters)
    pub accuracy_hint_threshold_m: f64,
    /// How long the "copied" notice stays visible (milliseconds)
    pub copy_notice_ms: u32,
    /// Theme used when no preference is stored
    pub default_theme: Theme,
}

/// Map configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Center shown before the first reading
    pub default_center: LatLng,
    /// Zoom shown before the first reading
    pub default_zoom: u8,
    /// Zoom used when showing a reading
    pub location_zoom: u8,
    /// Tile source
    pub tiles: TileLayer,
    /// Accuracy circle appearance
    pub accuracy_circle: CircleStyle,
    /// Accuracy circles are drawn only below this radius (meters)
    pub max_circle_radius_m: f64,
    /// Delay between readiness checks (milliseconds)
    pub init_retry_delay_ms: u32,
    /// Readiness checks before giving up
    pub max_init_attempts: u32,
    /// Delay before touching the map after a layout change (milliseconds)
    pub layout_settle_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locale: Locale::German,
            geolocation: PositionOptions::default(),
            map: MapConfig::default(),
            accuracy_hint_threshold_m: 100.0,
            copy_notice_ms: 2000,
            default_theme: Theme::Light,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: DEFAULT_CENTER,
            default_zoom: 13,
            location_zoom: 15,
            tiles: TileLayer::default(),
            accuracy_circle: CircleStyle::default(),
            max_circle_radius_m: 1000.0,
            init_retry_delay_ms: 100,
            max_init_attempts: 50,
            layout_settle_ms: 100,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    #[error("I/O error: {message}")]
    IoError { message: String },
    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether configuration is valid
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<ConfigError>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

/// Owns the active configuration and its backing file
pub struct ConfigurationManager {
    config: AppConfig,
    config_file_path: Option<String>,
    is_modified: bool,
    warnings: Vec<String>,
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationManager {
    /// Create a manager holding the default configuration
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            config_file_path: None,
            is_modified: false,
            warnings: Vec::new(),
        }
    }

    /// Create a manager from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// Replace the configuration after validating it
    pub fn update_config(&mut self, config: AppConfig) -> Result<(), ConfigError> {
        self.accept(&config)?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: AppConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        self.accept(&config)?;

        info!(path = %path_str, "configuration loaded");
        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content =
            serde_json::to_string_pretty(&self.config).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        debug!(path = %path_str, "configuration saved");
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if let Some(path) = self.config_file_path.clone() {
            self.save_to_file(path)
        } else {
            Err(ConfigError::IoError {
                message: "No file path set for saving configuration".to_string(),
            })
        }
    }

    /// Warnings raised by the configuration currently in use
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Validate `config`, keeping and logging its warnings when it passes
    fn accept(&mut self, config: &AppConfig) -> Result<(), ConfigError> {
        let validation = self.validate_config(config);
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }
        for warning in &validation.warnings {
            warn!(warning = %warning, "configuration warning");
        }
        self.warnings = validation.warnings;
        Ok(())
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Check a configuration without applying it
    pub fn validate_config(&self, config: &AppConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let invalid = |parameter: &str, value: String, reason: &str| ConfigError::InvalidParameter {
            parameter: parameter.to_string(),
            value,
            reason: reason.to_string(),
        };

        if config.geolocation.timeout_ms == 0 {
            errors.push(invalid("geolocation.timeout_ms", "0".to_string(), "must be positive"));
        } else if config.geolocation.timeout_ms > 60_000 {
            warnings.push(format!(
                "Geolocation timeout of {} ms keeps the button disabled for a long time",
                config.geolocation.timeout_ms
            ));
        }
        if config.geolocation.maximum_age_ms > 0 {
            warnings.push("Cached positions may be returned instead of a fresh fix".to_string());
        }

        let center = config.map.default_center;
        if !center.lat.is_finite() || center.lat.abs() > MAX_LATITUDE_DEG {
            errors.push(invalid(
                "map.default_center.lat",
                center.lat.to_string(),
                "must be within [-90, 90]",
            ));
        }
        if !center.lng.is_finite() || center.lng.abs() > MAX_LONGITUDE_DEG {
            errors.push(invalid(
                "map.default_center.lng",
                center.lng.to_string(),
                "must be within [-180, 180]",
            ));
        }

        let max_zoom = config.map.tiles.max_zoom;
        for (name, zoom) in [
            ("map.default_zoom", config.map.default_zoom),
            ("map.location_zoom", config.map.location_zoom),
        ] {
            if zoom > max_zoom {
                errors.push(invalid(
                    name,
                    zoom.to_string(),
                    &format!("exceeds tile max zoom {}", max_zoom),
                ));
            }
        }
        if config.map.location_zoom < config.map.default_zoom {
            warnings.push("Location zoom is wider than the default zoom".to_string());
        }

        if config.map.max_init_attempts == 0 {
            errors.push(invalid("map.max_init_attempts", "0".to_string(), "must be at least 1"));
        }
        if config.map.init_retry_delay_ms == 0 {
            errors.push(invalid("map.init_retry_delay_ms", "0".to_string(), "must be positive"));
        }
        if !(config.map.max_circle_radius_m > 0.0) {
            errors.push(invalid(
                "map.max_circle_radius_m",
                config.map.max_circle_radius_m.to_string(),
                "must be positive",
            ));
        }
        let opacity = config.map.accuracy_circle.fill_opacity;
        if !(0.0..=1.0).contains(&opacity) {
            errors.push(invalid(
                "map.accuracy_circle.fill_opacity",
                opacity.to_string(),
                "must be within [0, 1]",
            ));
        }
        if !(config.accuracy_hint_threshold_m >= 0.0) {
            errors.push(invalid(
                "accuracy_hint_threshold_m",
                config.accuracy_hint_threshold_m.to_string(),
                "must be non-negative",
            ));
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.locale, Locale::German);
        assert!(config.geolocation.high_accuracy);
        assert_eq!(config.geolocation.timeout_ms, 10_000);
        assert_eq!(config.map.default_center, LatLng::new(52.52, 13.405));
        assert_eq!(config.map.default_zoom, 13);
        assert_eq!(config.map.location_zoom, 15);
        assert_eq!(config.map.tiles.max_zoom, 19);
    }

    #[test]
    fn test_default_config_is_valid() {
        let manager = ConfigurationManager::new();
        let result = manager.validate_config(manager.get_config());
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        assert!(!manager.is_modified());
    }

    #[test]
    fn test_invalid_config() {
        let manager = ConfigurationManager::new();
        let mut config = AppConfig::default();
        config.geolocation.timeout_ms = 0;
        config.map.default_center = LatLng::new(95.0, 0.0);
        config.map.location_zoom = 22;
        config.map.max_init_attempts = 0;

        let result = manager.validate_config(&config);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 4);
    }

    #[test]
    fn test_update_rejects_invalid_config() {
        let mut manager = ConfigurationManager::new();
        let mut config = AppConfig::default();
        config.map.accuracy_circle.fill_opacity = 1.5;

        let err = manager.update_config(config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { .. }));
        assert!(!manager.is_modified());

        let mut config = AppConfig::default();
        config.locale = Locale::English;
        manager.update_config(config).unwrap();
        assert!(manager.is_modified());
        assert_eq!(manager.get_config().locale, Locale::English);
    }

    #[test]
    fn test_config_serialization() {
        let mut manager = ConfigurationManager::new();
        let mut config = AppConfig::default();
        config.default_theme = Theme::Dark;
        config.map.max_init_attempts = 20;
        manager.update_config(config).unwrap();

        let temp_path = std::env::temp_dir()
            .join(format!("geoshare_test_config_{}.json", std::process::id()));
        manager.save_to_file(&temp_path).unwrap();
        assert!(!manager.is_modified());

        let loaded = ConfigurationManager::from_file(&temp_path).unwrap();
        assert_eq!(loaded.get_config().default_theme, Theme::Dark);
        assert_eq!(loaded.get_config().map.max_init_attempts, 20);

        let _ = fs::remove_file(temp_path);
    }

    #[test]
    fn test_loaded_config_keeps_warnings() {
        let mut config = AppConfig::default();
        config.geolocation.maximum_age_ms = 30_000;
        config.geolocation.timeout_ms = 90_000;

        let temp_path = std::env::temp_dir()
            .join(format!("geoshare_test_warnings_{}.json", std::process::id()));
        fs::write(&temp_path, serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = ConfigurationManager::from_file(&temp_path).unwrap();
        assert_eq!(loaded.warnings().len(), 2);
        assert!(loaded.warnings()[0].contains("90000 ms"));

        let mut manager = ConfigurationManager::new();
        assert!(manager.warnings().is_empty());
        manager.update_config(config).unwrap();
        assert_eq!(manager.warnings().len(), 2);
        manager.update_config(AppConfig::default()).unwrap();
        assert!(manager.warnings().is_empty());

        let _ = fs::remove_file(temp_path);
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigurationManager::from_file("/nonexistent/geoshare.json");
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn test_save_without_path() {
        let mut manager = ConfigurationManager::new();
        assert!(manager.save().is_err());
    }
}
