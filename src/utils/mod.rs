//! Utility modules for the console core
//!
//! ## Module Organization
//!
//! - **error**: Crate error type and helpers
//! - **logging**: Tracing subscriber setup

pub mod error; // Error handling
pub mod logging; // Logging

pub use error::{ConsoleError, Result};
pub use logging::init_logging;
