//! Configuration management utilities
//!
//! Every setting in stockcrew is an environment-style key/value pair. Code
//! never reads the process environment directly; it receives a
//! [`ConfigSource`] built once by the entry point.

use crate::logging::{LogFormat, LogSettings};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Error raised while reading configuration values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A key is present but its value cannot be parsed
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// A key that must be present is missing
    #[error("Missing required setting: {0}")]
    Missing(String),
}

/// Read-only key/value lookup
pub trait ConfigSource: Send + Sync {
    /// Raw value for `key`, exactly as stored
    fn get_raw(&self, key: &str) -> Option<String>;
}

impl dyn ConfigSource + '_ {
    /// Trimmed value for `key`; empty strings count as unset
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_raw(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Trimmed value for `key`, or `default` when unset
    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse the value for `key` with [`FromStr`]
    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_string(key) {
            None => Ok(None),
            Some(value) => value
                .parse::<T>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value,
                    reason: e.to_string(),
                }),
        }
    }

    /// Parse the value for `key`, falling back to `default` when unset
    pub fn get_parsed_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.get_parsed(key)?.unwrap_or(default))
    }

    /// Boolean flag; accepts `true/1/yes/on` and `false/0/no/off`
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        match self.get_string(key) {
            None => Ok(None),
            Some(value) => parse_bool(&value)
                .map(Some)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value,
                    reason: "expected a boolean".to_string(),
                }),
        }
    }

    /// Boolean flag, falling back to `default` when unset
    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        Ok(self.get_bool(key)?.unwrap_or(default))
    }

    /// Duration expressed in whole seconds
    pub fn get_secs_or(&self, key: &str, default: u64) -> Result<Duration, ConfigError> {
        self.get_parsed_or::<u64>(key, default)
            .map(Duration::from_secs)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl EnvSource {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigSource for EnvSource {
    fn get_raw(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory key/value map
///
/// Used by tests and by embedders that assemble configuration themselves.
///
/// # Example
///
/// ```
/// use stockcrew_utils::{ConfigSource, MapSource};
///
/// let source = MapSource::new().with("OPENAI_API_KEY", "sk-test");
/// let source: &dyn ConfigSource = &source;
/// assert_eq!(source.get_string("OPENAI_API_KEY").as_deref(), Some("sk-test"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key/value pair
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl<K, V> FromIterator<(K, V)> for MapSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ConfigSource for MapSource {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Application-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name
    pub app_name: String,
    /// Application version
    pub version: String,
    /// Environment (development, production, ...)
    pub environment: String,
    /// Debug mode forces debug-level logging
    pub debug: bool,
    /// Log level directive
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Whether merged market records are cached
    pub cache_enabled: bool,
    /// Cache entry lifetime
    pub cache_ttl: Duration,
    /// Ceiling for any single analysis task
    pub max_execution_time: Duration,
    /// Directory receiving report artifacts
    pub reports_dir: PathBuf,
    /// Run sibling tasks concurrently
    pub parallel_tasks: bool,
    /// Relative difference (percent) under which two sources agree
    pub cross_validation_tolerance_pct: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "StockCrew Analysis".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "production".to_string(),
            debug: false,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            cache_enabled: true,
            cache_ttl: Duration::from_secs(3600),
            max_execution_time: Duration::from_secs(1800),
            reports_dir: PathBuf::from("reports"),
            parallel_tasks: false,
            cross_validation_tolerance_pct: 5.0,
        }
    }
}

impl AppConfig {
    /// Read application settings, using defaults for unset keys
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let log_format = match source.get_string("LOG_FORMAT") {
            None => defaults.log_format,
            Some(value) => value.parse().map_err(|reason| ConfigError::InvalidValue {
                key: "LOG_FORMAT".to_string(),
                value,
                reason,
            })?,
        };

        let tolerance: f64 = source.get_parsed_or(
            "CROSS_VALIDATION_TOLERANCE_PCT",
            defaults.cross_validation_tolerance_pct,
        )?;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "CROSS_VALIDATION_TOLERANCE_PCT".to_string(),
                value: tolerance.to_string(),
                reason: "must be a non-negative number".to_string(),
            });
        }

        Ok(Self {
            app_name: source.get_string_or("APP_NAME", &defaults.app_name),
            version: source.get_string_or("APP_VERSION", &defaults.version),
            environment: source.get_string_or("APP_ENVIRONMENT", &defaults.environment),
            debug: source.get_bool_or("DEBUG", defaults.debug)?,
            log_level: source.get_string_or("LOG_LEVEL", &defaults.log_level),
            log_format,
            cache_enabled: source.get_bool_or("CACHE_ENABLED", defaults.cache_enabled)?,
            cache_ttl: source.get_secs_or("CACHE_TTL", defaults.cache_ttl.as_secs())?,
            max_execution_time: source
                .get_secs_or("MAX_EXECUTION_TIME", defaults.max_execution_time.as_secs())?,
            reports_dir: source
                .get_string("REPORTS_DIR")
                .map_or(defaults.reports_dir, PathBuf::from),
            parallel_tasks: source.get_bool_or("PARALLEL_TASKS", defaults.parallel_tasks)?,
            cross_validation_tolerance_pct: tolerance,
        })
    }

    /// Logging settings derived from this configuration
    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            level: if self.debug {
                "debug".to_string()
            } else {
                self.log_level.clone()
            },
            format: self.log_format,
        }
    }
}
