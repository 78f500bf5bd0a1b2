//! Actions in flight

use crate::core::events::Action;
use crate::core::topology::Server;
use dashmap::{DashMap, DashSet};
use std::sync::Arc;

/// Hosts and servers with an action in flight
///
/// A host is claimed from the moment an action is requested until it ends,
/// while the progress marks only cover the time the action is running.
/// Cheap to clone; every clone shares the same state.
#[derive(Debug, Clone, Default)]
pub struct PendingActions {
    claims: Arc<DashSet<String>>,
    hosts: Arc<DashMap<String, Action>>,
    servers: Arc<DashSet<String>>,
}

impl PendingActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `host` for a new action, `false` if another one holds it
    pub fn try_claim(&self, host: &str) -> bool {
        self.claims.insert(host.to_string())
    }

    /// Give up a claim that never started
    pub fn release(&self, host: &str) {
        self.claims.remove(host);
    }

    pub fn is_claimed(&self, host: &str) -> bool {
        self.claims.contains(host)
    }

    /// Mark `host` and its servers as pending
    pub fn start(&self, host: &str, servers: &[String], action: Action) {
        self.claims.insert(host.to_string());
        self.hosts.insert(host.to_string(), action);
        for server in servers {
            self.servers.insert(Server::id_of(host, server));
        }
    }

    /// Clear `host` and its servers
    pub fn finish(&self, host: &str, servers: &[String]) {
        self.hosts.remove(host);
        self.claims.remove(host);
        for server in servers {
            self.servers.remove(&Server::id_of(host, server));
        }
    }

    pub fn is_pending(&self, host: &str) -> bool {
        self.hosts.contains_key(host)
    }

    /// The action in flight against `host`
    pub fn action(&self, host: &str) -> Option<Action> {
        self.hosts.get(host).map(|entry| *entry.value())
    }

    /// Whether the server with id `server_id` is pending
    pub fn is_server_pending(&self, server_id: &str) -> bool {
        self.servers.contains(server_id)
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty() && self.hosts.is_empty() && self.servers.is_empty()
    }
}
