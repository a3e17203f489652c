//! Configuration module
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`ORION_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use orion::config::OrionConfig;
//!
//! let config = OrionConfig::default();
//! assert_eq!(config.api.base_url, "http://localhost:4200/api");
//!
//! let toml = r#"
//! [api]
//! base_url = "https://orion.example.com/api"
//! "#;
//! let config: OrionConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.api.base_url, "https://orion.example.com/api");
//! ```

pub mod api;
pub mod error;
pub mod logging;
pub mod polling;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use polling::PollingConfig;

use crate::query::QueryOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the Orion query client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OrionConfig {
    /// API connection settings
    pub api: ApiConfig,
    /// Polling defaults
    pub polling: PollingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl OrionConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (the current value is kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("ORION_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("ORION_API_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.api.timeout_seconds = Some(t);
            }
        }
        if let Ok(interval) = std::env::var("ORION_POLL_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.polling.default_interval_ms = ms;
            }
        }

        if let Ok(level) = std::env::var("ORION_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("ORION_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::Validation {
                field: "api.base_url".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Validation {
                field: "api.base_url".to_string(),
                message: "URL must start with http:// or https://".to_string(),
            });
        }

        if self.api.timeout_seconds == Some(0) {
            return Err(ConfigError::Validation {
                field: "api.timeout_seconds".to_string(),
                message: "timeout must be non-zero (omit it to disable)".to_string(),
            });
        }

        QueryOptions::poll_every(self.polling.default_interval_ms)
            .validate()
            .map_err(|e| ConfigError::Validation {
                field: "polling.default_interval_ms".to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    /// Render the effective settings as a TOML document that `load` reads back.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Render(e.to_string()))
    }
}
