//! Hosts, server groups and servers
//!
//! States are parsed from the raw attribute strings of the management model.
//! Both `RELOAD_REQUIRED` and `reload-required` spellings are accepted.

use crate::core::access_control::ids::build_id;
use crate::core::dmr::constants::{
    CORE_SERVICE, GROUP, HOST, HOST_STATE, MANAGEMENT, MASTER, PROFILE, RUNNING_MODE, SERVER,
    SERVER_CONFIG, SERVER_GROUP, SERVER_STATE, SOCKET_BINDING_GROUP, STATUS, SUSPEND_STATE,
};
use crate::core::dmr::{ModelNodeExt, ResourceAddress};
use crate::utils::error::ConsoleError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::str::FromStr;

fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_uppercase().replace('-', "_")
}

fn unknown(kind: &str, raw: &str) -> ConsoleError {
    ConsoleError::parsing(format!("Unknown {}: {}", kind, raw))
}

/// `server-config.status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerConfigStatus {
    Started,
    Starting,
    Stopped,
    Stopping,
    Disabled,
    Failed,
    #[default]
    Undefined,
}

impl FromStr for ServerConfigStatus {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "STARTED" => Ok(Self::Started),
            "STARTING" => Ok(Self::Starting),
            "STOPPED" => Ok(Self::Stopped),
            "STOPPING" => Ok(Self::Stopping),
            "DISABLED" => Ok(Self::Disabled),
            "FAILED" => Ok(Self::Failed),
            "UNDEFINED" => Ok(Self::Undefined),
            _ => Err(unknown("server config status", s)),
        }
    }
}

/// `server-state` of a server and `host-state` of a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunningState {
    Starting,
    Running,
    Stopping,
    Stopped,
    ReloadRequired,
    RestartRequired,
    Timeout,
    #[default]
    Undefined,
}

impl FromStr for RunningState {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "STARTING" => Ok(Self::Starting),
            "RUNNING" | "NORMAL" => Ok(Self::Running),
            "STOPPING" => Ok(Self::Stopping),
            "STOPPED" => Ok(Self::Stopped),
            "RELOAD_REQUIRED" => Ok(Self::ReloadRequired),
            "RESTART_REQUIRED" => Ok(Self::RestartRequired),
            "TIMEOUT" => Ok(Self::Timeout),
            "UNDEFINED" => Ok(Self::Undefined),
            _ => Err(unknown("running state", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuspendState {
    Running,
    PreSuspend,
    Suspending,
    Suspended,
    #[default]
    Undefined,
}

impl FromStr for SuspendState {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "RUNNING" => Ok(Self::Running),
            "PRE_SUSPEND" => Ok(Self::PreSuspend),
            "SUSPENDING" => Ok(Self::Suspending),
            "SUSPENDED" => Ok(Self::Suspended),
            "UNDEFINED" => Ok(Self::Undefined),
            _ => Err(unknown("suspend state", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunningMode {
    Normal,
    AdminOnly,
    #[default]
    Undefined,
}

impl FromStr for RunningMode {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "NORMAL" => Ok(Self::Normal),
            "ADMIN_ONLY" => Ok(Self::AdminOnly),
            "UNDEFINED" => Ok(Self::Undefined),
            _ => Err(unknown("running mode", s)),
        }
    }
}

/// A server configured on a host, plus its runtime attributes once read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    host: String,
    name: String,
    group: Option<String>,
    config_status: ServerConfigStatus,
    server_state: RunningState,
    suspend_state: SuspendState,
    running_mode: RunningMode,
    boot_errors: bool,
    operation_failure: Option<String>,
    attributes: Map<String, Value>,
}

impl Server {
    /// A server from its `server-config` resource
    pub fn from_config(host: &str, name: &str, node: &Value) -> Self {
        let mut server = Self {
            host: host.to_string(),
            name: name.to_string(),
            group: None,
            config_status: ServerConfigStatus::Undefined,
            server_state: RunningState::Undefined,
            suspend_state: SuspendState::Undefined,
            running_mode: RunningMode::Undefined,
            boot_errors: false,
            operation_failure: None,
            attributes: Map::new(),
        };
        server.merge(node);
        server
    }

    /// Merge the attributes of the `server` resource; existing values are overwritten
    pub fn add_server_attributes(&mut self, node: &Value) {
        self.merge(node);
    }

    fn merge(&mut self, node: &Value) {
        if let Some(object) = node.as_object() {
            for (key, value) in object {
                self.attributes.insert(key.clone(), value.clone());
            }
        }
        let attributes = Value::Object(self.attributes.clone());
        // server-config carries `group`, the server resource `server-group`
        self.group = attributes
            .str_of(GROUP)
            .or_else(|| attributes.str_of(SERVER_GROUP))
            .map(str::to_string);
        self.config_status = attributes.enum_or(STATUS, ServerConfigStatus::Undefined);
        self.server_state = attributes.enum_or(SERVER_STATE, RunningState::Undefined);
        self.suspend_state = attributes.enum_or(SUSPEND_STATE, SuspendState::Undefined);
        self.running_mode = attributes.enum_or(RUNNING_MODE, RunningMode::Undefined);
    }

    /// Id of a server, derived from host and server name
    pub fn id_of(host: &str, name: &str) -> String {
        build_id(&[host, name])
    }

    pub fn id(&self) -> String {
        Self::id_of(&self.host, &self.name)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn server_group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn config_status(&self) -> ServerConfigStatus {
        self.config_status
    }

    pub fn server_state(&self) -> RunningState {
        self.server_state
    }

    pub fn suspend_state(&self) -> SuspendState {
        self.suspend_state
    }

    pub fn running_mode(&self) -> RunningMode {
        self.running_mode
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Whether the runtime attributes of the server can be read
    pub fn is_started(&self) -> bool {
        self.config_status == ServerConfigStatus::Started
            || self.server_state == RunningState::Running
    }

    pub fn is_starting(&self) -> bool {
        self.server_state == RunningState::Starting
    }

    pub fn is_running(&self) -> bool {
        self.server_state == RunningState::Running && !self.is_suspended()
    }

    pub fn is_admin_mode(&self) -> bool {
        self.running_mode == RunningMode::AdminOnly
    }

    pub fn is_suspended(&self) -> bool {
        self.suspend_state == SuspendState::Suspended
    }

    pub fn is_stopped(&self) -> bool {
        matches!(
            self.config_status,
            ServerConfigStatus::Stopped | ServerConfigStatus::Disabled
        )
    }

    /// `server-config.status` is `FAILED`; boot errors are not considered
    pub fn is_failed(&self) -> bool {
        self.config_status == ServerConfigStatus::Failed
    }

    pub fn needs_reload(&self) -> bool {
        self.server_state == RunningState::ReloadRequired
    }

    pub fn needs_restart(&self) -> bool {
        self.server_state == RunningState::RestartRequired
    }

    pub fn has_boot_errors(&self) -> bool {
        self.boot_errors
    }

    pub fn set_boot_errors(&mut self, boot_errors: bool) {
        self.boot_errors = boot_errors;
    }

    pub fn operation_failure(&self) -> Option<&str> {
        self.operation_failure.as_deref()
    }

    pub fn has_operation_failure(&self) -> bool {
        self.operation_failure.is_some()
    }

    pub fn set_operation_failure(&mut self, reason: impl Into<String>) {
        self.operation_failure = Some(reason.into());
    }

    /// `/host=<host>/server=<server>`
    pub fn server_address(&self) -> ResourceAddress {
        ResourceAddress::root()
            .add(HOST, &self.host)
            .add(SERVER, &self.name)
    }

    /// `/host=<host>/server-config=<server>`
    pub fn server_config_address(&self) -> ResourceAddress {
        ResourceAddress::root()
            .add(HOST, &self.host)
            .add(SERVER_CONFIG, &self.name)
    }

    /// `/host=<host>/server=<server>/core-service=management`
    pub fn management_address(&self) -> ResourceAddress {
        self.server_address().add(CORE_SERVICE, MANAGEMENT)
    }
}

/// A host controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    name: String,
    domain_controller: bool,
    connected: bool,
    host_state: RunningState,
    suspend_state: SuspendState,
    running_mode: RunningMode,
    servers: Vec<Server>,
}

impl Host {
    /// A connected host from its `host` resource
    pub fn from_model(name: &str, node: &Value) -> Self {
        Self {
            name: name.to_string(),
            domain_controller: node.bool_or(MASTER, false),
            connected: true,
            host_state: node.enum_or(HOST_STATE, RunningState::Undefined),
            suspend_state: node.enum_or(SUSPEND_STATE, SuspendState::Undefined),
            running_mode: node.enum_or(RUNNING_MODE, RunningMode::Undefined),
            servers: Vec::new(),
        }
    }

    /// A host whose resource could not be read
    pub fn failed(name: &str) -> Self {
        Self {
            name: name.to_string(),
            domain_controller: false,
            connected: false,
            host_state: RunningState::Undefined,
            suspend_state: SuspendState::Undefined,
            running_mode: RunningMode::Undefined,
            servers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> ResourceAddress {
        ResourceAddress::root().add(HOST, &self.name)
    }

    pub fn is_domain_controller(&self) -> bool {
        self.domain_controller
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Connected and not stuck in a transition
    pub fn is_alive(&self) -> bool {
        self.connected && !matches!(self.host_state, RunningState::Starting | RunningState::Stopping)
    }

    pub fn host_state(&self) -> RunningState {
        self.host_state
    }

    pub fn suspend_state(&self) -> SuspendState {
        self.suspend_state
    }

    pub fn running_mode(&self) -> RunningMode {
        self.running_mode
    }

    pub fn is_admin_mode(&self) -> bool {
        self.running_mode == RunningMode::AdminOnly
    }

    pub fn needs_reload(&self) -> bool {
        self.host_state == RunningState::ReloadRequired
    }

    pub fn needs_restart(&self) -> bool {
        self.host_state == RunningState::RestartRequired
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub(crate) fn servers_mut(&mut self) -> &mut Vec<Server> {
        &mut self.servers
    }

    pub fn add_server(&mut self, server: Server) {
        self.servers.push(server);
    }

    /// Names of the started servers
    pub fn running_servers(&self) -> Vec<String> {
        self.servers
            .iter()
            .filter(|server| server.is_started())
            .map(|server| server.name().to_string())
            .collect()
    }

    pub fn has_running_servers(&self) -> bool {
        self.servers.iter().any(Server::is_started)
    }

    /// Domain controller first, the others by name
    pub fn compare(a: &Host, b: &Host) -> Ordering {
        b.domain_controller
            .cmp(&a.domain_controller)
            .then_with(|| a.name.cmp(&b.name))
    }
}

/// A server group and the servers assigned to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerGroup {
    name: String,
    profile: Option<String>,
    socket_binding_group: Option<String>,
    servers: Vec<Server>,
}

impl ServerGroup {
    pub fn from_model(name: &str, node: &Value) -> Self {
        Self {
            name: name.to_string(),
            profile: node.str_of(PROFILE).map(str::to_string),
            socket_binding_group: node.str_of(SOCKET_BINDING_GROUP).map(str::to_string),
            servers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    pub fn socket_binding_group(&self) -> Option<&str> {
        self.socket_binding_group.as_deref()
    }

    pub fn address(&self) -> ResourceAddress {
        ResourceAddress::root().add(SERVER_GROUP, &self.name)
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Servers of this group running on `host`, ordered by name
    pub fn servers_of(&self, host: &str) -> Vec<&Server> {
        let mut servers: Vec<&Server> = self
            .servers
            .iter()
            .filter(|server| server.host() == host)
            .collect();
        servers.sort_by(|a, b| a.name().cmp(b.name()));
        servers
    }

    pub fn has_servers<P: Fn(&Server) -> bool>(&self, predicate: P) -> bool {
        self.servers.iter().any(predicate)
    }

    /// Assign every server to the group it belongs to
    pub fn add_servers(groups: &mut [ServerGroup], servers: &[Server]) {
        for group in groups.iter_mut() {
            group.servers = servers
                .iter()
                .filter(|server| server.server_group() == Some(group.name.as_str()))
                .cloned()
                .collect();
        }
    }
}
