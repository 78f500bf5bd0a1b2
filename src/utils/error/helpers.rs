//! Helper functions for creating and classifying errors

use super::types::ConsoleError;

/// Helper functions for creating specific errors
impl ConsoleError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn operation<S: Into<String>>(message: S) -> Self {
        Self::Operation(message.into())
    }

    pub fn dispatch<S: Into<String>>(message: S) -> Self {
        Self::Dispatch(message.into())
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn parsing<S: Into<String>>(message: S) -> Self {
        Self::Parsing(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }
}

impl ConsoleError {
    /// Whether the management API itself reported a failed outcome
    pub fn is_operation_failure(&self) -> bool {
        matches!(self, Self::Operation(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Text shown to the user in an error notification
    pub fn user_message(&self) -> String {
        match self {
            Self::Operation(message)
            | Self::Dispatch(message)
            | Self::Timeout(message)
            | Self::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
