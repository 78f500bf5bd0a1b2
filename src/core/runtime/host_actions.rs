//! Reload and restart of hosts
//!
//! The mutating operation is fired without waiting for its response, since
//! the management channel may go down with the host. Completion is detected
//! by pinging the host and its running servers until they answer again.

use super::dialog::Confirmation;
use super::pending::PendingActions;
use super::timeout::{Ping, PollOutcome, TimeoutHandler};
use crate::config::models::TimeoutConfig;
use crate::core::dispatcher::Dispatcher;
use crate::core::dmr::constants::{
    READ_RESOURCE_OPERATION, RELOAD, RESTART, RESTART_SERVERS, SERVER, SHUTDOWN,
};
use crate::core::dmr::{Composite, Operation};
use crate::core::events::{Action, ActionResult, ConsoleEvent, EventBus};
use crate::core::topology::Host;
use crate::utils::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How a host action ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostActionOutcome {
    /// The user declined; nothing was sent
    Cancelled,
    Completed,
    /// The host did not answer in time; the action may still finish
    TimedOut,
}

pub type BeforeAction = Box<dyn FnOnce() + Send>;
pub type AfterAction = Box<dyn FnOnce(HostActionOutcome) + Send>;

/// Hooks run around a confirmed action
#[derive(Default)]
pub struct ActionCallbacks {
    before: Option<BeforeAction>,
    after: Option<AfterAction>,
}

impl ActionCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run before the operation is fired
    pub fn before<F: FnOnce() + Send + 'static>(mut self, f: F) -> Self {
        self.before = Some(Box::new(f));
        self
    }

    /// Run once polling has ended, on success and on timeout
    pub fn after<F: FnOnce(HostActionOutcome) + Send + 'static>(mut self, f: F) -> Self {
        self.after = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for ActionCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionCallbacks")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

/// Time to wait for a host: the base of the action plus a share per running server
pub fn host_timeout(action: Action, running_servers: usize, timeouts: &TimeoutConfig) -> Duration {
    let base = match action {
        Action::Reload => timeouts.reload_base(),
        Action::Restart => timeouts.restart_base(),
    };
    base + timeouts.per_server() * running_servers as u32
}

/// Read the host, plus every running server if there are any
pub fn ping(host: &Host) -> Ping {
    let read_host = Operation::new(host.address(), READ_RESOURCE_OPERATION);
    let servers = host.running_servers();
    if servers.is_empty() {
        return Ping::Single(read_host);
    }

    let mut composite = Composite::new().add(read_host);
    for server in servers {
        composite.push(Operation::new(
            host.address().add(SERVER, server),
            READ_RESOURCE_OPERATION,
        ));
    }
    Ping::Composite(composite)
}

struct Texts {
    title: String,
    question: String,
    pending: String,
    success: String,
    timeout: String,
}

impl Texts {
    fn new(action: Action, host: &str, domain_controller: bool) -> Self {
        match action {
            Action::Reload => Self {
                title: format!("Reload {}", host),
                question: format!("Do you really want to reload host {}?", host),
                pending: "Reloading the domain controller. Please wait...".to_string(),
                success: format!("Host {} successfully reloaded.", host),
                timeout: if domain_controller {
                    "The domain controller could not be reloaded in time. Please reload the console.".to_string()
                } else {
                    format!("Host {} could not be reloaded in time.", host)
                },
            },
            Action::Restart => Self {
                title: format!("Restart {}", host),
                question: if domain_controller {
                    format!(
                        "Do you really want to restart the domain controller {}? The console will be unavailable during the restart.",
                        host
                    )
                } else {
                    format!("Do you really want to restart host {}?", host)
                },
                pending: "Restarting the domain controller. Please wait...".to_string(),
                success: format!("Host {} successfully restarted.", host),
                timeout: if domain_controller {
                    "The domain controller could not be restarted in time. Please reload the console.".to_string()
                } else {
                    format!("Host {} could not be restarted in time.", host)
                },
            },
        }
    }
}

/// Reload and restart with confirmation, progress events and timeout handling
pub struct HostActions {
    dispatcher: Arc<dyn Dispatcher>,
    events: EventBus,
    pending: PendingActions,
    confirmation: Arc<dyn Confirmation>,
    timeouts: TimeoutConfig,
}

impl HostActions {
    pub fn new(
        dispatcher: Arc<dyn Dispatcher>,
        events: EventBus,
        pending: PendingActions,
        confirmation: Arc<dyn Confirmation>,
        timeouts: TimeoutConfig,
    ) -> Self {
        Self {
            dispatcher,
            events,
            pending,
            confirmation,
            timeouts,
        }
    }

    /// Whether an action on `host` was requested and has not ended yet
    pub fn is_pending(&self, host: &str) -> bool {
        self.pending.is_claimed(host)
    }

    pub fn pending(&self) -> &PendingActions {
        &self.pending
    }

    /// Reload `host`, optionally restarting its servers
    pub async fn reload(
        &self,
        host: &Host,
        domain_controller: bool,
        restart_servers: bool,
        callbacks: ActionCallbacks,
    ) -> Result<HostActionOutcome> {
        let operation = Operation::builder(host.address(), RELOAD)
            .param(RESTART_SERVERS, restart_servers)
            .build();
        self.run(host, Action::Reload, operation, domain_controller, callbacks)
            .await
    }

    /// Restart `host`, which is a shutdown with restart
    pub async fn restart(
        &self,
        host: &Host,
        domain_controller: bool,
        callbacks: ActionCallbacks,
    ) -> Result<HostActionOutcome> {
        let operation = Operation::builder(host.address(), SHUTDOWN)
            .param(RESTART, true)
            .build();
        self.run(host, Action::Restart, operation, domain_controller, callbacks)
            .await
    }

    async fn run(
        &self,
        host: &Host,
        action: Action,
        operation: Operation,
        domain_controller: bool,
        callbacks: ActionCallbacks,
    ) -> Result<HostActionOutcome> {
        let name = host.name();
        if !self.pending.try_claim(name) {
            return Err(ConsoleError::validation(format!(
                "Host {} has a pending action",
                name
            )));
        }

        let texts = Texts::new(action, name, domain_controller);
        if !self.confirmation.confirm(&texts.title, &texts.question).await {
            self.pending.release(name);
            info!("{} of host {} cancelled", action.label(), name);
            return Ok(HostActionOutcome::Cancelled);
        }

        // Let the confirmation close before the next dialog opens
        tokio::time::sleep(self.timeouts.dialog_delay()).await;

        let ActionCallbacks { before, after } = callbacks;
        if let Some(before) = before {
            before();
        }

        let servers = host.running_servers();
        let budget = host_timeout(action, servers.len(), &self.timeouts);
        self.pending.start(name, &servers, action);
        self.events.publish(ConsoleEvent::HostAction {
            host: name.to_string(),
            servers: servers.clone(),
            action,
        });
        if domain_controller {
            self.events.publish(ConsoleEvent::LongRunning {
                title: texts.title.clone(),
                message: texts.pending.clone(),
            });
        }

        info!(
            "Firing {} of host {}, waiting up to {:?}",
            action.label(),
            name,
            budget
        );
        self.fire(operation);

        let handler = TimeoutHandler::new(
            Arc::clone(&self.dispatcher),
            budget,
            self.timeouts.poll_interval(),
        );
        let outcome = match handler.execute(&ping(host)).await {
            PollOutcome::Succeeded => HostActionOutcome::Completed,
            PollOutcome::TimedOut => HostActionOutcome::TimedOut,
        };

        self.pending.finish(name, &servers);
        self.events.publish(ConsoleEvent::HostResult {
            host: name.to_string(),
            servers,
            outcome: match outcome {
                HostActionOutcome::TimedOut => ActionResult::TimedOut,
                _ => ActionResult::Completed,
            },
        });
        if let Some(after) = after {
            after(outcome);
        }

        match (outcome, domain_controller) {
            (HostActionOutcome::Completed, true) => {
                self.events.publish(ConsoleEvent::LongRunningClosed);
                self.events.success(texts.success);
            }
            (_, true) => {
                self.events.publish(ConsoleEvent::LongRunningClosed);
                self.events.publish(ConsoleEvent::Blocking {
                    title: texts.title,
                    message: texts.timeout,
                });
            }
            (HostActionOutcome::Completed, false) => self.events.success(texts.success),
            (_, false) => self.events.error(texts.timeout, None),
        }
        if outcome == HostActionOutcome::TimedOut {
            warn!("{} of host {} timed out", action.label(), name);
        }
        Ok(outcome)
    }

    fn fire(&self, operation: Operation) {
        let dispatcher = Arc::clone(&self.dispatcher);
        tokio::spawn(async move {
            let name = operation.name().to_string();
            match dispatcher.execute(operation).await {
                Ok(_) => debug!("{} acknowledged", name),
                Err(e) => debug!("{} returned {}", name, e),
            }
        });
    }
}

impl std::fmt::Debug for HostActions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostActions")
            .field("pending", &self.pending)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}
