//! Configuration management for the Skycast application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::SkycastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the Skycast application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkycastConfig {
    /// Weather provider API configuration
    pub api: ApiConfig,
    /// Search behavior
    #[serde(default)]
    pub search: SearchConfig,
    /// Device geolocation settings
    #[serde(default)]
    pub geolocation: GeolocationConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather provider API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Provider API key; fetches fail with a configuration error without it
    pub api_key: Option<String>,
    /// Base URL for current-conditions and forecast endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Base URL for the geocoding endpoints
    #[serde(default = "default_geo_url")]
    pub geo_url: String,
    /// Response language
    #[serde(default = "default_language")]
    pub language: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u64,
}

/// Search-as-you-type settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a search fires, in millis
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Maximum number of suggestions per search
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

/// Device geolocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// Timeout for a position request in seconds
    #[serde(default = "default_geolocation_timeout")]
    pub timeout_seconds: u64,
    /// Fixed latitude for the static geolocator
    pub latitude: Option<f64>,
    /// Fixed longitude for the static geolocator
    pub longitude: Option<f64>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geo_url() -> String {
    "https://api.openweathermap.org/geo/1.0".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_api_timeout() -> u64 {
    8
}

fn default_debounce_ms() -> u64 {
    crate::debounce::DEFAULT_DEBOUNCE_MS
}

fn default_max_suggestions() -> usize {
    5
}

fn default_geolocation_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            geo_url: default_geo_url(),
            language: default_language(),
            timeout_seconds: default_api_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_geolocation_timeout(),
            latitude: None,
            longitude: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for SkycastConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            search: SearchConfig::default(),
            geolocation: GeolocationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SkycastConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. SKYCAST_API__API_KEY, SKYCAST_SEARCH__DEBOUNCE_MS
        builder = builder.add_source(
            Environment::with_prefix("SKYCAST")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: SkycastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skycast").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_api(&self) -> Result<()> {
        // The key may be absent at load time; fetches classify that themselves
        if let Some(api_key) = &self.api.api_key {
            if api_key.is_empty() {
                return Err(SkycastError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }

            if api_key.len() < 8 {
                return Err(SkycastError::config(
                    "Weather API key appears to be invalid (too short). Please check your API key.",
                )
                .into());
            }

            if api_key.len() > 100 {
                return Err(SkycastError::config(
                    "Weather API key appears to be invalid (too long). Please check your API key.",
                )
                .into());
            }
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(
                SkycastError::config("Weather API base URL must be a valid HTTP or HTTPS URL")
                    .into(),
            );
        }

        if !self.api.geo_url.starts_with("http://") && !self.api.geo_url.starts_with("https://") {
            return Err(
                SkycastError::config("Geocoding base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.api.timeout_seconds == 0 || self.api.timeout_seconds > 300 {
            return Err(
                SkycastError::config("API timeout must be between 1 and 300 seconds").into(),
            );
        }

        if self.geolocation.timeout_seconds == 0 || self.geolocation.timeout_seconds > 300 {
            return Err(SkycastError::config(
                "Geolocation timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        if self.search.debounce_ms > 60_000 {
            return Err(
                SkycastError::config("Search debounce cannot exceed 60000 milliseconds").into(),
            );
        }

        if self.search.max_suggestions == 0 || self.search.max_suggestions > 10 {
            return Err(
                SkycastError::config("Search suggestion limit must be between 1 and 10").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SkycastConfig::default();
        assert_eq!(config.api.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(config.api.geo_url, "https://api.openweathermap.org/geo/1.0");
        assert_eq!(config.api.timeout_seconds, 8);
        assert_eq!(config.geolocation.timeout_seconds, 10);
        assert_eq!(config.search.debounce_ms, 500);
        assert_eq!(config.search.max_suggestions, 5);
        assert_eq!(config.logging.level, "info");
        assert!(config.api.api_key.is_none());
    }

    #[test]
    fn test_default_config_validates() {
        assert!(SkycastConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_api_key_length() {
        let mut config = SkycastConfig::default();
        config.api.api_key = Some("short".to_string());
        assert!(config.validate().is_err());

        config.api.api_key = Some("valid_api_key_123".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = SkycastConfig::default();
        config.logging.level = "shouting".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = SkycastConfig::default();
        config.api.timeout_seconds = 500;
        assert!(config.validate().is_err());

        let mut config = SkycastConfig::default();
        config.search.max_suggestions = 50;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_base_url_scheme() {
        let mut config = SkycastConfig::default();
        config.api.base_url = "ftp://example.org".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_path_generation() {
        let path = SkycastConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("skycast"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
