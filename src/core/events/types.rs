//! Event type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a user notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

/// A user notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub level: Level,
    pub text: String,
    /// Technical details, usually the failure description of an operation
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            text: text.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(Level::Success, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Level::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(Level::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Level::Error, text)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// State transition fired against a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Reload,
    Restart,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Self::Reload => "reload",
            Self::Restart => "restart",
        }
    }
}

/// How a host action ended from the console's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionResult {
    /// The host answered again within the timeout
    Completed,
    /// The console gave up waiting; the action may still finish later
    TimedOut,
}

/// Everything the core announces to the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ConsoleEvent {
    Message(Message),
    /// Roles, principals or assignments were modified
    RolesChanged,
    HostAction {
        host: String,
        servers: Vec<String>,
        action: Action,
    },
    HostResult {
        host: String,
        servers: Vec<String>,
        outcome: ActionResult,
    },
    /// A pending dialog for a long running action was opened
    LongRunning { title: String, message: String },
    LongRunningClosed,
    /// A dialog the user has to acknowledge
    Blocking { title: String, message: String },
}

impl ConsoleEvent {
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Message(message) => Some(message),
            _ => None,
        }
    }
}
