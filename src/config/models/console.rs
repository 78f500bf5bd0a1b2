//! Main console configuration

#![allow(missing_docs)]

use super::*;
use serde::{Deserialize, Serialize};

/// Main console configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConsoleConfig {
    /// Environment the console starts in
    #[serde(default)]
    pub environment: EnvironmentConfig,
    /// Timeouts and delays of long running actions
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// Event bus configuration
    #[serde(default)]
    pub events: EventsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConsoleConfig {
    /// Build a configuration from `CONSOLE_*` variables, starting from defaults
    pub fn from_vars<I, K, V>(vars: I) -> crate::utils::error::Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();

        for (key, value) in vars {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "CONSOLE_MODE" => config.environment.mode = parse_value(key.as_ref(), value)?,
                "CONSOLE_USER" => config.environment.user.name = value.to_string(),
                "CONSOLE_USER_ROLES" => config.environment.user.roles = split_list(value),
                "CONSOLE_RUN_AS" => config.environment.run_as = split_list(value),
                "CONSOLE_ACCESS_CONTROL_PROVIDER" => {
                    config.environment.access_control_provider = parse_value(key.as_ref(), value)?
                }
                "CONSOLE_POLL_INTERVAL_MS" => {
                    config.timeouts.poll_interval_ms = parse_number(key.as_ref(), value)?
                }
                "CONSOLE_TOPOLOGY_TIMEOUT_MS" => {
                    config.timeouts.topology_timeout_ms = parse_number(key.as_ref(), value)?
                }
                "CONSOLE_EVENTS_CAPACITY" => {
                    config.events.capacity = parse_number(key.as_ref(), value)?
                }
                "CONSOLE_LOG_LEVEL" => config.logging.level = value.to_string(),
                "CONSOLE_LOG_FORMAT" => config.logging.format = parse_value(key.as_ref(), value)?,
                _ => {}
            }
        }

        Ok(config)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> crate::utils::error::Result<T> {
    value.parse().map_err(|_| {
        crate::utils::error::ConsoleError::config(format!("Invalid number for {}: {}", key, value))
    })
}

fn parse_value<T: serde::de::DeserializeOwned>(
    key: &str,
    value: &str,
) -> crate::utils::error::Result<T> {
    serde_json::from_value(serde_json::Value::String(value.to_lowercase())).map_err(|_| {
        crate::utils::error::ConsoleError::config(format!("Invalid value for {}: {}", key, value))
    })
}
