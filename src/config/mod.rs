//! Configuration management for the console core
//!
//! This module handles loading, validation, and serialization of the console configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{ConsoleError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the console
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Console configuration
    pub console: ConsoleConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConsoleError::Config(format!("Failed to read config file: {}", e)))?;

        let console: ConsoleConfig = serde_yaml::from_str(&content)
            .map_err(|e| ConsoleError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self { console };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from `CONSOLE_*` environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let console = ConsoleConfig::from_vars(vars)?;
        let config = Self { console };

        config.validate()?;
        Ok(config)
    }

    /// Get environment configuration
    pub fn environment(&self) -> &EnvironmentConfig {
        &self.console.environment
    }

    /// Get timeout configuration
    pub fn timeouts(&self) -> &TimeoutConfig {
        &self.console.timeouts
    }

    /// Get event bus configuration
    pub fn events(&self) -> &EventsConfig {
        &self.console.events
    }

    /// Get logging configuration
    pub fn logging(&self) -> &LoggingConfig {
        &self.console.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.console
            .validate()
            .map_err(|e| ConsoleError::Config(format!("Console config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.console)
            .map_err(|e| ConsoleError::Config(format!("Failed to serialize config to JSON: {}", e)))
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.console)
            .map_err(|e| ConsoleError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
