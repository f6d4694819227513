//! Configuration management for `WeatherSense`
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::WeatherSenseError;
use crate::query::{DEFAULT_MAX_QUERY_LENGTH, DateOrder};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Hard ceiling for `parser.max_query_length`
const MAX_QUERY_LENGTH_LIMIT: usize = 10_000;

/// One week
const MAX_CACHE_TTL_SECONDS: u64 = 604_800;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherSenseConfig {
    /// Query parsing configuration
    #[serde(default)]
    pub parser: ParserConfig,
    /// Response cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Query parsing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Maximum accepted query length in characters
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,
    /// How to read all-numeric dates such as 10/05/2025
    #[serde(default)]
    pub date_order: DateOrder,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of a cached response in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
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
fn default_max_query_length() -> usize {
    DEFAULT_MAX_QUERY_LENGTH
}

fn default_cache_ttl() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_query_length: default_max_query_length(),
            date_order: DateOrder::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
        }
    }
}

impl CacheConfig {
    /// Configured TTL as a [`Duration`]
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
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

impl WeatherSenseConfig {
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

        // WEATHERSENSE__CACHE__TTL_SECONDS=60 overrides cache.ttl_seconds
        builder = builder.add_source(
            Environment::with_prefix("WEATHERSENSE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeatherSenseConfig = settings
            .try_deserialize()
            .with_context(|| {
                format!(
                    "Failed to deserialize configuration from {}",
                    config_file.display()
                )
            })?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weathersense").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.parser.max_query_length == 0 {
            self.parser.max_query_length = default_max_query_length();
        }
        if self.cache.ttl_seconds == 0 {
            self.cache.ttl_seconds = default_cache_ttl();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.parser.max_query_length > MAX_QUERY_LENGTH_LIMIT {
            return Err(WeatherSenseError::config(format!(
                "Maximum query length cannot exceed {MAX_QUERY_LENGTH_LIMIT} characters"
            ))
            .into());
        }

        if self.cache.ttl_seconds > MAX_CACHE_TTL_SECONDS {
            return Err(WeatherSenseError::config(
                "Cache TTL cannot exceed 604800 seconds (1 week)",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherSenseError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherSenseError::config(format!(
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
    use std::env;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = WeatherSenseConfig::default();
        assert_eq!(config.parser.max_query_length, 1000);
        assert_eq!(config.parser.date_order, DateOrder::MonthFirst);
        assert_eq!(config.cache.ttl_seconds, 600);
        assert_eq!(config.cache.ttl(), Duration::from_secs(600));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = WeatherSenseConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_invalid_log_format() {
        let mut config = WeatherSenseConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("Invalid log format"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = WeatherSenseConfig::default();
        config.cache.ttl_seconds = MAX_CACHE_TTL_SECONDS + 1;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Cache TTL cannot exceed"));

        let mut config = WeatherSenseConfig::default();
        config.parser.max_query_length = 20_000;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("query length cannot exceed"));
    }

    #[test]
    fn test_apply_defaults_fills_zeroes() {
        let mut config = WeatherSenseConfig::default();
        config.parser.max_query_length = 0;
        config.cache.ttl_seconds = 0;
        config.logging.level.clear();
        config.apply_defaults();
        assert_eq!(config.parser.max_query_length, 1000);
        assert_eq!(config.cache.ttl_seconds, 600);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
[parser]
date_order = "day_first"
max_query_length = 500

[logging]
format = "json"
"#,
        );
        let config = WeatherSenseConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.parser.date_order, DateOrder::DayFirst);
        assert_eq!(config.parser.max_query_length, 500);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let file = write_config("[logging]\nlevel = \"loud\"\n");
        let err = WeatherSenseConfig::load_from_path(Some(file.path().to_path_buf())).unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            WeatherSenseConfig::load_from_path(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.parser.date_order, DateOrder::MonthFirst);
    }

    #[test]
    fn test_environment_variable_override() {
        // SAFETY: no other test reads or writes this variable
        unsafe {
            env::set_var("WEATHERSENSE__CACHE__TTL_SECONDS", "120");
        }

        let dir = tempfile::tempdir().unwrap();
        let result = WeatherSenseConfig::load_from_path(Some(dir.path().join("absent.toml")));

        // SAFETY: test cleanup
        unsafe {
            env::remove_var("WEATHERSENSE__CACHE__TTL_SECONDS");
        }

        assert_eq!(result.unwrap().cache.ttl_seconds, 120);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = WeatherSenseConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("weathersense"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
