//! `[logging]` section: how the CLI and library report fetches on stderr

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Shape of each log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines, the default for an interactive `orion watch`
    #[default]
    Pretty,
    /// One JSON object per event, for shipping to a log collector
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {} (expected pretty or json)", s)),
        }
    }
}

/// Levels and format for the tracing subscriber.
///
/// The default level is `warn` so fetch failures show up on stderr while
/// command output on stdout stays clean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base filter directive (`trace`, `debug`, `info`, `warn`, `error`)
    pub level: String,
    pub format: LogFormat,
    /// Per-module levels (e.g., {"query": "debug", "client": "warn"})
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_levels: Option<HashMap<String, String>>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
            component_levels: None,
        }
    }
}
