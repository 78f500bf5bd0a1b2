//! Console configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

impl Validate for ConsoleConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating console configuration");

        self.environment.validate()?;
        self.timeouts.validate()?;
        self.events.validate()?;
        self.logging.validate()?;

        debug!("Console configuration validation completed");
        Ok(())
    }
}

impl Validate for EnvironmentConfig {
    fn validate(&self) -> Result<(), String> {
        if self.user.name.trim().is_empty() {
            return Err("User name cannot be empty".to_string());
        }

        if self.run_as.iter().any(|role| role.trim().is_empty()) {
            return Err("Run-as role names cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Validate for TimeoutConfig {
    fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("Poll interval must be greater than 0".to_string());
        }

        if self.topology_timeout_ms == 0 {
            return Err("Topology timeout must be greater than 0".to_string());
        }

        if self.loading_delay_ms >= self.topology_timeout_ms {
            return Err(format!(
                "Loading delay ({}ms) must be smaller than the topology timeout ({}ms)",
                self.loading_delay_ms, self.topology_timeout_ms
            ));
        }

        Ok(())
    }
}

impl Validate for EventsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("Event capacity must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        // Directive lists are handed to EnvFilter as they are
        if self.level.contains('=') || self.level.contains(',') {
            return Ok(());
        }

        if !LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(format!("Unknown log level: {}", self.level));
        }

        Ok(())
    }
}
