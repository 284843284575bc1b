//! Configuration types for srvwatch

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{DiscoveryError, DiscoveryResult};

/// Default refresh interval in milliseconds
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 5_000;

/// Default number of refresh errors that can be queued before the refresh task stalls
pub const DEFAULT_ERROR_QUEUE_CAPACITY: usize = 10;

/// Watcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Time between two refreshes, in milliseconds
    pub refresh_interval_ms: u64,
    /// Slots in the error queue; a full queue blocks the next refresh
    pub error_queue_capacity: usize,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            error_queue_capacity: DEFAULT_ERROR_QUEUE_CAPACITY,
        }
    }
}

impl WatcherConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> DiscoveryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> DiscoveryResult<Self> {
        let config: WatcherConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Refresh interval as a [`Duration`]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Reject values the watcher cannot run with
    pub fn validate(&self) -> DiscoveryResult<()> {
        if self.refresh_interval_ms == 0 {
            return Err(DiscoveryError::Config(
                "refresh_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.error_queue_capacity == 0 {
            return Err(DiscoveryError::Config(
                "error_queue_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
