use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::state::params::ExtractionParameters;

/// Application configuration, read from `<config dir>/palette-extractor/config.json`.
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Extraction service endpoint (multipart POST)
    pub endpoint: String,
    /// Upper bound on one extraction round-trip
    pub request_timeout_secs: u64,
    /// Largest image accepted for upload
    pub max_asset_bytes: u64,
    /// tracing max level: error, warn, info, debug or trace
    pub log_level: String,
    /// Parameters the entry view starts with
    pub default_parameters: ExtractionParameters,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000/extract_palette".to_string(),
            request_timeout_secs: 30,
            max_asset_bytes: 25 * 1024 * 1024,
            log_level: "info".to_string(),
            default_parameters: ExtractionParameters::default(),
        }
    }
}

impl AppConfig {
    /// Load from the default location.
    ///
    /// A missing file is not an error: defaults are returned.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load and validate a specific config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        Self::from_json(&contents).map_err(|e| match e {
            ConfigError::Parse(_, err) => ConfigError::Parse(path.to_path_buf(), err),
            other => other,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: AppConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.default_parameters = config.default_parameters.clamped();
        config.validate()?;
        Ok(config)
    }

    /// Get the path where the config file is expected
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("palette-extractor");
        path.push("config.json");
        Some(path)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint must not be empty".to_string()));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.max_asset_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_asset_bytes must be greater than 0".to_string(),
            ));
        }

        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "unknown log_level {:?}",
                self.log_level
            )));
        }

        if self.default_parameters.color_count == 0 {
            return Err(ConfigError::Invalid(
                "default_parameters.color_count must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn max_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = AppConfig::from_json(
            r#"{ "endpoint": "http://palette.local/extract", "default_parameters": { "color_count": 8 } }"#,
        )
        .unwrap();

        assert_eq!(config.endpoint, "http://palette.local/extract");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.default_parameters.color_count, 8);
        assert_eq!(config.default_parameters.brightness, 0);
        assert!(!config.default_parameters.grayscale);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            AppConfig::from_json(r#"{ "request_timeout_secs": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{ "endpoint": "  " }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{ "log_level": "loud" }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{ "default_parameters": { "color_count": 0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            AppConfig::from_json("{ endpoint"),
            Err(ConfigError::Parse(_, _))
        ));
    }
}
