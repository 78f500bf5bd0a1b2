//! Shared environment state
//!
//! Holds what the console knows about the server it is connected to and the
//! logged in user. Cloning an [`Environment`] yields another handle to the
//! same state.

use crate::config::EnvironmentConfig;
use crate::core::access_control::AccessControlProvider;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Standalone server or managed domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    #[default]
    Standalone,
    Domain,
}

/// The logged in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub roles: BTreeSet<String>,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roles: BTreeSet::new(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

#[derive(Debug)]
struct EnvironmentState {
    mode: OperationMode,
    provider: AccessControlProvider,
    user: User,
    run_as: BTreeSet<String>,
}

/// Handle to the shared environment state
#[derive(Debug, Clone)]
pub struct Environment {
    state: Arc<RwLock<EnvironmentState>>,
}

impl Environment {
    pub fn new(mode: OperationMode, user: User) -> Self {
        Self {
            state: Arc::new(RwLock::new(EnvironmentState {
                mode,
                provider: AccessControlProvider::default(),
                user,
                run_as: BTreeSet::new(),
            })),
        }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        let mut user = User::new(config.user.name.clone());
        user.roles = config.user.roles.iter().cloned().collect();

        let environment = Self::new(config.mode, user);
        {
            let mut state = environment.state.write();
            state.provider = config.access_control_provider;
            state.run_as = config.run_as.iter().cloned().collect();
        }
        environment
    }

    pub fn mode(&self) -> OperationMode {
        self.state.read().mode
    }

    pub fn is_standalone(&self) -> bool {
        self.mode() == OperationMode::Standalone
    }

    pub fn access_control_provider(&self) -> AccessControlProvider {
        self.state.read().provider
    }

    pub fn set_access_control_provider(&self, provider: AccessControlProvider) {
        debug!("Access control provider is now {}", provider);
        self.state.write().provider = provider;
    }

    pub fn user(&self) -> User {
        self.state.read().user.clone()
    }

    /// Replace the role names of the current user
    pub fn set_user_roles<I: IntoIterator<Item = String>>(&self, roles: I) {
        self.state.write().user.roles = roles.into_iter().collect();
    }

    pub fn run_as(&self) -> BTreeSet<String> {
        self.state.read().run_as.clone()
    }

    pub fn set_run_as<I: IntoIterator<Item = String>>(&self, roles: I) {
        self.state.write().run_as = roles.into_iter().collect();
    }
}
