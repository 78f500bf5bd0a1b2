//! Configuration data models
//!
//! This module defines all configuration structures used by the console core.

#![allow(missing_docs)]

pub mod console;
pub mod environment;
pub mod events;
pub mod logging;
pub mod timeouts;

// Re-export all configuration types
pub use console::*;
pub use environment::*;
pub use events::*;
pub use logging::*;
pub use timeouts::*;

/// Default user name when none is configured
pub fn default_user_name() -> String {
    "admin".to_string()
}

/// Default reload timeout base in seconds
pub fn default_reload_base_secs() -> u64 {
    8
}

/// Default restart timeout base in seconds
pub fn default_restart_base_secs() -> u64 {
    12
}

/// Additional timeout per running server in seconds
pub fn default_per_server_secs() -> u64 {
    4
}

pub fn default_poll_interval_ms() -> u64 {
    500
}

/// Delay between closing one dialog and opening the next
pub fn default_dialog_delay_ms() -> u64 {
    111
}

pub fn default_topology_timeout_ms() -> u64 {
    5000
}

pub fn default_loading_delay_ms() -> u64 {
    500
}

pub fn default_event_capacity() -> usize {
    1000
}

pub fn default_log_level() -> String {
    "info".to_string()
}
