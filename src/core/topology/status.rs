//! Server status classification

use super::model::Server;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const ERROR: &str = "error";
pub const INACTIVE: &str = "inactive";
pub const OK: &str = "ok";
pub const SUSPENDED: &str = "suspended";
pub const WARNING: &str = "warning";
pub const WITH_PROGRESS: &str = "with-progress";

/// Status of a server, the first matching condition wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServerStatus {
    Pending,
    BootErrors,
    Failed,
    AdminMode,
    Starting,
    Suspended,
    NeedsReload,
    NeedsRestart,
    Running,
    Stopped,
    Unknown,
}

impl ServerStatus {
    /// Classify `server`; `pending` is set while an action against it is in flight
    pub fn of(server: &Server, pending: bool) -> Self {
        if pending {
            Self::Pending
        } else {
            Self::settled(server)
        }
    }

    /// Classification without the pending overlay
    pub fn settled(server: &Server) -> Self {
        if server.has_boot_errors() {
            Self::BootErrors
        } else if server.is_failed() {
            Self::Failed
        } else if server.is_admin_mode() {
            Self::AdminMode
        } else if server.is_starting() {
            Self::Starting
        } else if server.is_suspended() {
            Self::Suspended
        } else if server.needs_reload() {
            Self::NeedsReload
        } else if server.needs_restart() {
            Self::NeedsRestart
        } else if server.is_running() {
            Self::Running
        } else if server.is_stopped() {
            Self::Stopped
        } else {
            Self::Unknown
        }
    }

    /// Status marker of this classification, if any
    pub fn css(self) -> Option<&'static str> {
        match self {
            Self::BootErrors | Self::Failed => Some(ERROR),
            Self::AdminMode | Self::Stopped => Some(INACTIVE),
            Self::Suspended => Some(SUSPENDED),
            Self::NeedsReload | Self::NeedsRestart => Some(WARNING),
            Self::Running => Some(OK),
            Self::Pending | Self::Starting | Self::Unknown => None,
        }
    }
}

/// Markers of a server element
///
/// A pending action adds the progress marker on top of the settled status.
pub fn status_css(server: &Server, pending: bool) -> BTreeSet<&'static str> {
    let mut css: BTreeSet<&'static str> = ServerStatus::settled(server).css().into_iter().collect();
    if pending {
        css.insert(WITH_PROGRESS);
    }
    css
}
