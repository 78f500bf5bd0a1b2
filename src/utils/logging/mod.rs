//! Structured logging setup
//!
//! The console core logs through `tracing`. Embedders that do not install
//! their own subscriber can call [`init_logging`] with the logging section of
//! the configuration.

use crate::config::{LogFormat, LoggingConfig};
use crate::utils::error::{ConsoleError, Result};
use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber built from the logging configuration.
///
/// `RUST_LOG` takes precedence over the configured level when it is set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;

    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .try_init(),
    };

    installed.map_err(|e| ConsoleError::config(format!("Failed to install logger: {}", e)))
}

/// Build the event filter for the configured level
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.level)
        .map_err(|e| ConsoleError::config(format!("Invalid log level '{}': {}", config.level, e)))
}
