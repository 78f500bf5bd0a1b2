//! Names used in management operations

// Operations
pub const ADD: &str = "add";
pub const COMPOSITE: &str = "composite";
pub const READ_BOOT_ERRORS: &str = "read-boot-errors";
pub const READ_CHILDREN_NAMES_OPERATION: &str = "read-children-names";
pub const READ_CHILDREN_RESOURCES_OPERATION: &str = "read-children-resources";
pub const READ_RESOURCE_OPERATION: &str = "read-resource";
pub const RELOAD: &str = "reload";
pub const REMOVE: &str = "remove";
pub const SHUTDOWN: &str = "shutdown";
pub const UNDEFINE_ATTRIBUTE_OPERATION: &str = "undefine-attribute";
pub const WRITE_ATTRIBUTE_OPERATION: &str = "write-attribute";

// Envelope
pub const ADDRESS: &str = "address";
pub const FAILURE_DESCRIPTION: &str = "failure-description";
pub const FAILED: &str = "failed";
pub const OPERATION: &str = "operation";
pub const OUTCOME: &str = "outcome";
pub const RESULT: &str = "result";
pub const STEPS: &str = "steps";
pub const SUCCESS: &str = "success";

// Parameters
pub const ATTRIBUTES_ONLY: &str = "attributes-only";
pub const CHILD_TYPE: &str = "child-type";
pub const INCLUDE_RUNTIME: &str = "include-runtime";
pub const NAME: &str = "name";
pub const RECURSIVE: &str = "recursive";
pub const RESTART: &str = "restart";
pub const RESTART_SERVERS: &str = "restart-servers";
pub const VALUE: &str = "value";

// Access control
pub const ACCESS: &str = "access";
pub const AUTHORIZATION: &str = "authorization";
pub const BASE_ROLE: &str = "base-role";
pub const CORE_SERVICE: &str = "core-service";
pub const EXCLUDE: &str = "exclude";
pub const HOST_SCOPED_ROLE: &str = "host-scoped-role";
pub const HOSTS: &str = "hosts";
pub const INCLUDE: &str = "include";
pub const INCLUDE_ALL: &str = "include-all";
pub const MANAGEMENT: &str = "management";
pub const PROVIDER: &str = "provider";
pub const REALM: &str = "realm";
pub const ROLE_MAPPING: &str = "role-mapping";
pub const SERVER_GROUP_SCOPED_ROLE: &str = "server-group-scoped-role";
pub const SERVER_GROUPS: &str = "server-groups";
pub const STANDARD_ROLE_NAMES: &str = "standard-role-names";
pub const TYPE: &str = "type";

// Topology
pub const GROUP: &str = "group";
pub const HOST: &str = "host";
pub const HOST_STATE: &str = "host-state";
pub const MASTER: &str = "master";
pub const PROFILE: &str = "profile";
pub const RUNNING_MODE: &str = "running-mode";
pub const SERVER: &str = "server";
pub const SERVER_CONFIG: &str = "server-config";
pub const SERVER_GROUP: &str = "server-group";
pub const SERVER_STATE: &str = "server-state";
pub const SOCKET_BINDING_GROUP: &str = "socket-binding-group";
pub const STATUS: &str = "status";
pub const SUSPEND_STATE: &str = "suspend-state";
