//! Environment configuration

use super::*;
use crate::core::access_control::AccessControlProvider;
use crate::core::environment::OperationMode;
use serde::{Deserialize, Serialize};

/// Initial environment state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Standalone server or managed domain
    #[serde(default)]
    pub mode: OperationMode,
    /// The logged in user
    #[serde(default)]
    pub user: UserConfig,
    /// Roles the user runs as, empty when not running as anyone
    #[serde(default)]
    pub run_as: Vec<String>,
    /// Access control provider assumed until the first reload
    #[serde(default)]
    pub access_control_provider: AccessControlProvider,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            mode: OperationMode::default(),
            user: UserConfig::default(),
            run_as: Vec::new(),
            access_control_provider: AccessControlProvider::default(),
        }
    }
}

/// Current user configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_user_name")]
    pub name: String,
    /// Role names the user holds before access control is read
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            name: default_user_name(),
            roles: Vec::new(),
        }
    }
}
