//! Expired-code reaper configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Configuration for the background sweep of expired codes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReaperConfig {
    /// How often to run the sweep (in milliseconds)
    #[serde(default = "default_interval_millis")]
    pub interval_millis: u64,

    /// Whether to run the sweep at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            interval_millis: default_interval_millis(),
            enabled: default_enabled(),
        }
    }
}

impl ReaperConfig {
    /// Create from environment variables (`REAPER_INTERVAL_MILLIS`, `REAPER_ENABLED`)
    pub fn from_env() -> Self {
        Self {
            interval_millis: env_or("REAPER_INTERVAL_MILLIS", default_interval_millis()),
            enabled: env_or("REAPER_ENABLED", default_enabled()),
        }
    }

    /// Sweep cadence as a `Duration`
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.interval_millis.max(1))
    }
}

fn default_interval_millis() -> u64 {
    1000 // every second
}

fn default_enabled() -> bool {
    true
}
