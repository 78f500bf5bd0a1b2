//! Topology preview controller

use super::model::{Host, Server, ServerGroup};
use super::reader::{Topology, TopologyReader};
use super::view::{self, Selector, TopologyView};
use crate::config::models::TimeoutConfig;
use crate::core::events::{ConsoleEvent, EventBus};
use crate::core::runtime::PendingActions;
use crate::utils::error::{ConsoleError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[derive(Debug, Default)]
struct PreviewState {
    view: TopologyView,
    topology: Topology,
}

/// Keeps the rendered topology in sync with the management model
///
/// A failed or timed out update leaves the last rendered table in place.
pub struct TopologyPreview {
    reader: TopologyReader,
    events: EventBus,
    pending: PendingActions,
    timeouts: TimeoutConfig,
    state: Mutex<PreviewState>,
}

impl TopologyPreview {
    pub fn new(
        reader: TopologyReader,
        events: EventBus,
        pending: PendingActions,
        timeouts: TimeoutConfig,
    ) -> Self {
        Self {
            reader,
            events,
            pending,
            timeouts,
            state: Mutex::new(PreviewState::default()),
        }
    }

    /// Read the topology and rebuild the table, restoring the selection
    ///
    /// The loading indicator is only shown if the read takes longer than the
    /// loading delay and is always hidden once the read settles.
    pub async fn update(&self) -> Result<()> {
        let read = tokio::time::timeout(self.timeouts.topology_timeout(), self.reader.read());
        tokio::pin!(read);

        let result = tokio::select! {
            result = &mut read => result,
            _ = tokio::time::sleep(self.timeouts.loading_delay()) => {
                debug!("Topology read is slow, showing loading indicator");
                self.state.lock().view.show_loading();
                read.await
            }
        };
        self.state.lock().view.hide_loading();

        match result {
            Ok(Ok(topology)) => {
                let mut state = self.state.lock();
                let selection = state.view.selection();
                state.view.render(&topology, &self.pending);
                if let Some(selection) = selection {
                    if !state.view.select(&selection) {
                        debug!("Selected element {:?} is gone", selection);
                    }
                }
                info!(
                    "Topology updated: {} hosts, {} server groups",
                    topology.hosts.len(),
                    topology.server_groups.len()
                );
                state.topology = topology;
                Ok(())
            }
            Ok(Err(e)) => {
                error!("Unable to read topology: {}", e);
                self.events
                    .error("Unable to read topology.", Some(e.user_message()));
                Err(e)
            }
            Err(_) => {
                warn!("Timeout while reading topology");
                self.events
                    .warning("The topology could not be read in time. Please try again.");
                Err(ConsoleError::timeout("Reading the topology timed out"))
            }
        }
    }

    /// Swap the rendered row header of `host`
    pub fn replace_host(&self, host: &Host) -> bool {
        let mut state = self.state.lock();
        let replaced = state
            .view
            .replace(&Selector::host(host), view::host_element(host, &self.pending));
        if let Some(existing) = state
            .topology
            .hosts
            .iter_mut()
            .find(|existing| existing.name() == host.name())
        {
            *existing = host.clone();
        }
        replaced
    }

    /// Swap the rendered column header of `group`
    pub fn replace_server_group(&self, group: &ServerGroup) -> bool {
        let mut state = self.state.lock();
        let replaced = state
            .view
            .replace(&Selector::server_group(group), view::server_group_element(group));
        if let Some(existing) = state
            .topology
            .server_groups
            .iter_mut()
            .find(|existing| existing.name() == group.name())
        {
            *existing = group.clone();
        }
        replaced
    }

    /// Swap the rendered element of `server`
    pub fn replace_server(&self, server: &Server) -> bool {
        let mut state = self.state.lock();
        let replaced = state
            .view
            .replace(&Selector::server(server), view::server_element(server, &self.pending));
        let id = server.id();
        if let Some(existing) = state
            .topology
            .hosts
            .iter_mut()
            .flat_map(|host| host.servers_mut().iter_mut())
            .find(|existing| existing.id() == id)
        {
            *existing = server.clone();
        }
        replaced
    }

    /// Re-read the runtime attributes of `server` and swap its element
    pub async fn update_server(&self, server: &Server) -> Result<()> {
        let mut updated = server.clone();
        if let Err(e) = self.reader.read_server(&mut updated).await {
            warn!("Unable to update server {}: {}", server.server_address(), e);
            updated.set_operation_failure(e.user_message());
            self.events
                .error("Unable to read topology.", Some(e.user_message()));
        }
        self.replace_server(&updated);
        Ok(())
    }

    pub fn select_host(&self, name: &str) -> bool {
        self.state.lock().view.select(&Selector::Host(name.to_string()))
    }

    pub fn select_server_group(&self, name: &str) -> bool {
        self.state
            .lock()
            .view
            .select(&Selector::ServerGroup(name.to_string()))
    }

    pub fn select_server(&self, id: &str) -> bool {
        self.state.lock().view.select(&Selector::Server(id.to_string()))
    }

    pub fn selection(&self) -> Option<Selector> {
        self.state.lock().view.selection()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().view.is_loading()
    }

    pub fn is_visible(&self) -> bool {
        self.state.lock().view.is_visible()
    }

    /// The last topology read successfully
    pub fn topology(&self) -> Topology {
        self.state.lock().topology.clone()
    }

    /// A copy of the current view
    pub fn view(&self) -> TopologyView {
        self.state.lock().view.clone()
    }

    /// React to host actions: progress while in flight, a fresh read afterwards
    pub async fn on_event(&self, event: &ConsoleEvent) -> Result<()> {
        match event {
            ConsoleEvent::HostAction { host, servers, .. } => {
                let mut state = self.state.lock();
                if state.view.is_visible() {
                    state.view.start_progress(&Selector::Host(host.clone()));
                    for server in servers {
                        state
                            .view
                            .start_progress(&Selector::Server(Server::id_of(host, server)));
                    }
                }
                Ok(())
            }
            ConsoleEvent::HostResult { host, servers, .. } => {
                let visible = {
                    let mut state = self.state.lock();
                    if state.view.is_visible() {
                        state.view.stop_progress(&Selector::Host(host.clone()));
                        for server in servers {
                            state
                                .view
                                .stop_progress(&Selector::Server(Server::id_of(host, server)));
                        }
                    }
                    state.view.is_visible()
                };
                if visible { self.update().await } else { Ok(()) }
            }
            _ => Ok(()),
        }
    }

    /// Feed events from `receiver` into [`Self::on_event`] until the bus closes
    pub fn listen(self: &Arc<Self>, mut receiver: Receiver<ConsoleEvent>) -> JoinHandle<()> {
        let preview = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        if let Err(e) = preview.on_event(&event).await {
                            debug!("Topology update after event failed: {}", e);
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Topology preview skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

impl std::fmt::Debug for TopologyPreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopologyPreview")
            .field("state", &self.state)
            .finish()
    }
}
