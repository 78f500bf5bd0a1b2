//! Access control
//!
//! Role based access control as configured below
//! `/core-service=management/access=authorization`.
//!
//! ## Module Structure
//!
//! - `types`: Principals, roles, assignments and the provider switch
//! - `roles`, `principals`, `assignments`: Registries rebuilt on every reload
//! - `store`: Atomically swapped snapshot of the registries
//! - `parse`: The reload composite and its parser
//! - `system`: The [`AccessControl`] aggregate
//! - `steps`: Pipeline steps against role mappings and scoped roles
//! - `tasks`: [`AccessControlTasks`], the mutation entry points
//! - `change_set`: Attribute change sets to operations

pub mod addresses;
pub mod assignments;
pub mod change_set;
pub mod ids;
mod parse;
pub mod principals;
pub mod roles;
pub mod sorting;
pub mod steps;
mod store;
mod system;
mod tasks;
mod types;

pub use assignments::Assignments;
pub use change_set::{AttributeMetadata, OperationFactory, ResourceMetadata};
pub use parse::{parse_snapshot, reload_composite};
pub use principals::Principals;
pub use roles::Roles;
pub use store::{AccessControlSnapshot, ReloadOutcome, SnapshotRef, SnapshotStore};
pub use system::AccessControl;
pub use tasks::AccessControlTasks;
pub use types::{
    ADMINISTRATOR, AccessControlProvider, Assignment, LOCAL_USERNAME, Principal, PrincipalType,
    Role, RoleType, SUPER_USER,
};
