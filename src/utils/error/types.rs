//! Error type definitions

use thiserror::Error;

/// Result type alias for the console core
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Main error type for the console core
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The management API answered with a failed outcome
    #[error("Operation failed: {0}")]
    Operation(String),

    /// The dispatcher could not deliver the request at all
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Client-side validation errors, raised before any remote call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Parsing errors for management payloads
    #[error("Parsing error: {0}")]
    Parsing(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
