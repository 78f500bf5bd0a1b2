//! # hal-console
//!
//! Client-side core of an application-server management console. It keeps
//! the access-control registries and the domain topology in sync with the
//! management model and orchestrates long running host actions.
//!
//! ## Features
//!
//! - **Access control**: Roles, principals and assignments read from the
//!   authorization subtree, mutated through ordered pipelines
//! - **Topology**: Hosts, server groups and servers rendered as an element
//!   tree whose selection survives refreshes
//! - **Host actions**: Reload and restart with confirmation, progress events
//!   and a timeout scaled by the number of running servers
//!
//! The management transport is not part of this crate. Embedders implement
//! [`Dispatcher`] and a [`Confirmation`] and hand both to a [`Console`].
//!
//! ```rust,no_run
//! use hal_console::{AutoConfirm, Config, Console, Dispatcher};
//! use std::sync::Arc;
//!
//! async fn run(dispatcher: Arc<dyn Dispatcher>) -> hal_console::Result<()> {
//!     let config = Config::from_file("config/console.yaml").await?;
//!     let console = Console::new(config, dispatcher, Arc::new(AutoConfirm));
//!     console.start().await?;
//!     println!("{} roles", console.access_control().roles().len());
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

pub use config::Config;
pub use core::access_control::{
    AccessControl, AccessControlProvider, AccessControlTasks, Assignment, Principal,
    PrincipalType, Role, RoleType,
};
pub use core::dispatcher::{Dispatcher, ResourceStatus, check_resource};
pub use core::dmr::{Composite, CompositeResult, Operation, OperationResult, ResourceAddress};
pub use core::environment::{Environment, OperationMode, User};
pub use core::events::{Action, ActionResult, ConsoleEvent, EventBus, Level, Message};
pub use core::runtime::{
    ActionCallbacks, AutoConfirm, Confirmation, HostActionOutcome, HostActions, PendingActions,
};
pub use core::topology::{Host, Server, ServerGroup, Topology, TopologyPreview, TopologyReader};
pub use utils::error::{ConsoleError, Result};

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// One console session
///
/// Owns every component and wires them to the same dispatcher, environment
/// and event bus.
pub struct Console {
    config: Arc<Config>,
    environment: Environment,
    events: EventBus,
    access_control: Arc<AccessControl>,
    tasks: AccessControlTasks,
    host_actions: HostActions,
    topology: Arc<TopologyPreview>,
    confirmation: Arc<dyn Confirmation>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Console {
    pub fn new(
        config: Config,
        dispatcher: Arc<dyn Dispatcher>,
        confirmation: Arc<dyn Confirmation>,
    ) -> Self {
        let environment = Environment::from_config(config.environment());
        let events = EventBus::new(config.events().capacity);
        let pending = PendingActions::new();

        let access_control = Arc::new(AccessControl::new(
            Arc::clone(&dispatcher),
            environment.clone(),
            events.clone(),
        ));
        let tasks = AccessControlTasks::new(Arc::clone(&access_control));
        let host_actions = HostActions::new(
            Arc::clone(&dispatcher),
            events.clone(),
            pending.clone(),
            Arc::clone(&confirmation),
            config.timeouts().clone(),
        );
        let topology = Arc::new(TopologyPreview::new(
            TopologyReader::new(dispatcher, environment.clone()),
            events.clone(),
            pending,
            config.timeouts().clone(),
        ));

        Self {
            config: Arc::new(config),
            environment,
            events,
            access_control,
            tasks,
            host_actions,
            topology,
            confirmation,
            listener: Mutex::new(None),
        }
    }

    /// Read access control and, in domain mode, the topology
    ///
    /// Also starts forwarding host action events to the topology preview.
    pub async fn start(&self) -> Result<()> {
        info!(
            "Starting console session for {} in {:?} mode",
            self.environment.user().name,
            self.environment.mode()
        );
        self.access_control.reload().await?;
        if !self.environment.is_standalone() {
            self.topology.update().await?;
        }

        let mut listener = self.listener.lock();
        if listener.is_none() {
            *listener = Some(self.topology.listen(self.events.subscribe()));
        }
        Ok(())
    }

    /// Stop forwarding events to the topology preview
    pub fn stop(&self) {
        if let Some(listener) = self.listener.lock().take() {
            debug!("Stopping topology listener");
            listener.abort();
        }
    }

    /// Ask for confirmation, then switch the access control provider
    ///
    /// Returns `None` if the user declined.
    pub async fn switch_provider(&self) -> Result<Option<AccessControlProvider>> {
        let current = self.environment.access_control_provider();
        let question = format!(
            "Do you really want to switch the access control provider from {} to {}? \
             The change only takes effect after a reload.",
            current,
            current.toggled()
        );
        if !self
            .confirmation
            .confirm("Switch Provider", &question)
            .await
        {
            debug!("Switching the provider was cancelled");
            return Ok(None);
        }
        self.access_control.switch_provider().await.map(Some)
    }

    /// Ask for confirmation, then remove a scoped role with its assignments
    ///
    /// Returns `false` if the user declined.
    pub async fn remove_scoped_role(&self, role: &Role) -> Result<bool> {
        let title = format!("Remove {}", role.name());
        let question = format!(
            "Do you really want to remove the {} {}? All assignments will be removed as well.",
            role.role_type().label().to_lowercase(),
            role.name()
        );
        if !self.confirmation.confirm(&title, &question).await {
            debug!("Removing {} was cancelled", role.name());
            return Ok(false);
        }
        self.tasks.remove_scoped_role(role).await?;
        Ok(true)
    }

    /// Reload a host of the last topology read
    pub async fn reload_host(
        &self,
        name: &str,
        restart_servers: bool,
        callbacks: ActionCallbacks,
    ) -> Result<HostActionOutcome> {
        let host = self.known_host(name)?;
        self.host_actions
            .reload(&host, host.is_domain_controller(), restart_servers, callbacks)
            .await
    }

    /// Restart a host of the last topology read
    pub async fn restart_host(
        &self,
        name: &str,
        callbacks: ActionCallbacks,
    ) -> Result<HostActionOutcome> {
        let host = self.known_host(name)?;
        self.host_actions
            .restart(&host, host.is_domain_controller(), callbacks)
            .await
    }

    fn known_host(&self, name: &str) -> Result<Host> {
        self.topology
            .topology()
            .host(name)
            .cloned()
            .ok_or_else(|| ConsoleError::not_found(format!("Unknown host {}", name)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn access_control(&self) -> &Arc<AccessControl> {
        &self.access_control
    }

    pub fn tasks(&self) -> &AccessControlTasks {
        &self.tasks
    }

    pub fn host_actions(&self) -> &HostActions {
        &self.host_actions
    }

    pub fn topology(&self) -> &Arc<TopologyPreview> {
        &self.topology
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("environment", &self.environment)
            .field("host_actions", &self.host_actions)
            .finish()
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
