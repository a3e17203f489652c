//! Polling configuration

use serde::{Deserialize, Serialize};

/// Defaults for polling queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Interval used by `orion watch` when none is given; 0 fetches once
    pub default_interval_ms: u64,
    /// Pause polling while the host reports it is hidden
    pub pause_when_hidden: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            default_interval_ms: 5000,
            pause_when_hidden: true,
        }
    }
}
