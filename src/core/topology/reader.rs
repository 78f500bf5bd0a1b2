//! Reading the topology from the management model

use super::model::{Host, Server, ServerGroup};
use crate::core::dispatcher::Dispatcher;
use crate::core::dmr::constants::{
    ATTRIBUTES_ONLY, CHILD_TYPE, HOST, INCLUDE_RUNTIME, READ_BOOT_ERRORS,
    READ_CHILDREN_NAMES_OPERATION, READ_CHILDREN_RESOURCES_OPERATION, READ_RESOURCE_OPERATION,
    SERVER_CONFIG, SERVER_GROUP,
};
use crate::core::dmr::{Composite, CompositeResult, ModelNodeExt, Operation, ResourceAddress};
use crate::core::environment::Environment;
use crate::utils::error::Result;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Hosts and server groups, each carrying its servers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub hosts: Vec<Host>,
    pub server_groups: Vec<ServerGroup>,
}

impl Topology {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty() && self.server_groups.is_empty()
    }

    pub fn host(&self, name: &str) -> Option<&Host> {
        self.hosts.iter().find(|host| host.name() == name)
    }

    pub fn server_group(&self, name: &str) -> Option<&ServerGroup> {
        self.server_groups.iter().find(|group| group.name() == name)
    }

    /// Every server of every host
    pub fn servers(&self) -> impl Iterator<Item = &Server> {
        self.hosts.iter().flat_map(|host| host.servers().iter())
    }

    pub fn server(&self, id: &str) -> Option<&Server> {
        self.servers().find(|server| server.id() == id)
    }
}

/// Reads hosts, server groups and servers
///
/// Server configs are read per host and the runtime attributes per started
/// server, so one blocked server does not fail the whole read.
#[derive(Clone)]
pub struct TopologyReader {
    dispatcher: Arc<dyn Dispatcher>,
    environment: Environment,
}

impl TopologyReader {
    pub fn new(dispatcher: Arc<dyn Dispatcher>, environment: Environment) -> Self {
        Self {
            dispatcher,
            environment,
        }
    }

    /// Read the whole topology; standalone servers have none
    pub async fn read(&self) -> Result<Topology> {
        if self.environment.is_standalone() {
            return Ok(Topology::empty());
        }

        let names = self
            .dispatcher
            .execute(
                Operation::builder(ResourceAddress::root(), READ_CHILDREN_NAMES_OPERATION)
                    .param(CHILD_TYPE, HOST)
                    .build(),
            )
            .await?;
        let names: Vec<String> = names
            .as_array()
            .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();

        let mut hosts = Vec::with_capacity(names.len());
        for name in &names {
            hosts.push(self.read_host(name).await);
        }

        let groups = self
            .dispatcher
            .execute(
                Operation::builder(ResourceAddress::root(), READ_CHILDREN_RESOURCES_OPERATION)
                    .param(CHILD_TYPE, SERVER_GROUP)
                    .param(INCLUDE_RUNTIME, true)
                    .build(),
            )
            .await?;
        let mut server_groups: Vec<ServerGroup> = groups
            .property_list()
            .into_iter()
            .map(|(name, node)| ServerGroup::from_model(name, node))
            .collect();

        for host in hosts.iter_mut() {
            self.read_started_servers(host.servers_mut()).await;
        }

        hosts.sort_by(Host::compare);
        server_groups.sort_by(|a, b| a.name().cmp(b.name()));
        let servers: Vec<Server> = hosts
            .iter()
            .flat_map(|host| host.servers().iter().cloned())
            .collect();
        ServerGroup::add_servers(&mut server_groups, &servers);

        debug!(
            "Read topology with {} hosts, {} server groups and {} servers",
            hosts.len(),
            server_groups.len(),
            servers.len()
        );
        Ok(Topology {
            hosts,
            server_groups,
        })
    }

    /// Read one host and its server configs; an unreadable host is returned as failed
    pub async fn read_host(&self, name: &str) -> Host {
        let address = ResourceAddress::root().add(HOST, name);
        let composite = Composite::new()
            .add(
                Operation::builder(address.clone(), READ_RESOURCE_OPERATION)
                    .param(ATTRIBUTES_ONLY, true)
                    .param(INCLUDE_RUNTIME, true)
                    .build(),
            )
            .add(
                Operation::builder(address, READ_CHILDREN_RESOURCES_OPERATION)
                    .param(CHILD_TYPE, SERVER_CONFIG)
                    .param(INCLUDE_RUNTIME, true)
                    .build(),
            );

        match self.dispatcher.execute_composite(composite).await {
            Ok(result) => {
                let mut host = Host::from_model(name, result.step(0));
                let mut servers: Vec<Server> = result
                    .step(1)
                    .property_list()
                    .into_iter()
                    .map(|(server, node)| Server::from_config(name, server, node))
                    .collect();
                servers.sort_by(|a, b| a.name().cmp(b.name()));
                for server in servers {
                    host.add_server(server);
                }
                host
            }
            Err(e) => {
                warn!("Unable to read host {}: {}", name, e);
                Host::failed(name)
            }
        }
    }

    /// Refresh the runtime attributes and boot errors of one started server
    pub async fn read_server(&self, server: &mut Server) -> Result<()> {
        let result = self
            .dispatcher
            .execute_composite(server_runtime(server))
            .await?;
        apply_runtime(server, &result);
        Ok(())
    }

    async fn read_started_servers(&self, servers: &mut [Server]) {
        let started: Vec<&mut Server> = servers.iter_mut().filter(|s| s.is_started()).collect();
        let results = join_all(
            started
                .iter()
                .map(|server| self.dispatcher.execute_composite(server_runtime(server))),
        )
        .await;

        for (server, result) in started.into_iter().zip(results) {
            match result {
                Ok(result) => apply_runtime(server, &result),
                Err(e) => {
                    warn!("Unable to update server {}: {}", server.server_address(), e);
                    server.set_operation_failure(e.user_message());
                }
            }
        }
    }
}

/// Runtime attributes plus boot errors of a started server
fn server_runtime(server: &Server) -> Composite {
    Composite::new()
        .add(
            Operation::builder(server.server_address(), READ_RESOURCE_OPERATION)
                .param(ATTRIBUTES_ONLY, true)
                .param(INCLUDE_RUNTIME, true)
                .build(),
        )
        .add(Operation::new(server.management_address(), READ_BOOT_ERRORS))
}

fn apply_runtime(server: &mut Server, result: &CompositeResult) {
    server.add_server_attributes(result.step(0));
    let boot_errors = result
        .step(1)
        .as_array()
        .is_some_and(|errors| !errors.is_empty());
    server.set_boot_errors(boot_errors);
}
