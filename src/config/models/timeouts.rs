//! Timeouts of long running actions

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeouts and delays used by host actions and the topology view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Base timeout of a host reload in seconds
    #[serde(default = "default_reload_base_secs")]
    pub reload_base_secs: u64,
    /// Base timeout of a host restart in seconds
    #[serde(default = "default_restart_base_secs")]
    pub restart_base_secs: u64,
    /// Added to the base timeout for every running server
    #[serde(default = "default_per_server_secs")]
    pub per_server_secs: u64,
    /// Interval between two pings while waiting for a host
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_dialog_delay_ms")]
    pub dialog_delay_ms: u64,
    /// Upper bound of one topology fetch
    #[serde(default = "default_topology_timeout_ms")]
    pub topology_timeout_ms: u64,
    /// Fetches faster than this never show the loading indicator
    #[serde(default = "default_loading_delay_ms")]
    pub loading_delay_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            reload_base_secs: default_reload_base_secs(),
            restart_base_secs: default_restart_base_secs(),
            per_server_secs: default_per_server_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            dialog_delay_ms: default_dialog_delay_ms(),
            topology_timeout_ms: default_topology_timeout_ms(),
            loading_delay_ms: default_loading_delay_ms(),
        }
    }
}

impl TimeoutConfig {
    pub fn reload_base(&self) -> Duration {
        Duration::from_secs(self.reload_base_secs)
    }

    pub fn restart_base(&self) -> Duration {
        Duration::from_secs(self.restart_base_secs)
    }

    pub fn per_server(&self) -> Duration {
        Duration::from_secs(self.per_server_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn dialog_delay(&self) -> Duration {
        Duration::from_millis(self.dialog_delay_ms)
    }

    pub fn topology_timeout(&self) -> Duration {
        Duration::from_millis(self.topology_timeout_ms)
    }

    pub fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.loading_delay_ms)
    }
}
