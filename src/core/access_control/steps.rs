//! Access control pipeline steps
//!
//! Each function builds one step out of the generic building blocks in
//! [`crate::core::flow`]. Role mappings are addressed by role name, so a
//! transient [`Role`] carrying only the name is enough for most of them.

use super::addresses::{self, role_mapping};
use super::change_set::{OperationFactory, ResourceMetadata};
use super::types::{Assignment, Principal, Role, RoleType};
use crate::core::dmr::constants::{
    ADD, INCLUDE_ALL, NAME, REALM, REMOVE, TYPE, VALUE, WRITE_ATTRIBUTE_OPERATION,
};
use crate::core::dmr::{Operation, ResourceAddress};
use crate::core::flow::{BatchStep, CheckStep, ConditionalStep, ExecuteStep};
use crate::core::dispatcher::ResourceStatus;
use crate::utils::error::{ConsoleError, Result};
use serde_json::{Map, Value};

/// Probe the role mapping of `role` and record 200 or 404
pub fn check_role_mapping(role: &Role) -> CheckStep {
    CheckStep::new("check-role-mapping", role_mapping(role))
}

/// Add the role mapping of `role` if `predicate` holds for the recorded status
pub fn add_role_mapping<P>(role: &Role, predicate: P) -> ConditionalStep
where
    P: Fn(ResourceStatus) -> bool + Send + Sync + 'static,
{
    let address = role_mapping(role);
    ConditionalStep::new(
        "add-role-mapping",
        address.clone(),
        predicate,
        Operation::new(address, ADD),
    )
}

/// Write the include-all flag; the role mapping must exist
pub fn modify_include_all(role: &Role, include_all: bool) -> ExecuteStep {
    let operation = Operation::builder(role_mapping(role), WRITE_ATTRIBUTE_OPERATION)
        .param(NAME, INCLUDE_ALL)
        .param(VALUE, include_all)
        .build();
    ExecuteStep::new("modify-include-all", operation)
}

/// Remove the role mapping of `role` if `predicate` holds for the recorded status
pub fn remove_role_mapping<P>(role: &Role, predicate: P) -> ConditionalStep
where
    P: Fn(ResourceStatus) -> bool + Send + Sync + 'static,
{
    let address = role_mapping(role);
    ConditionalStep::new(
        "remove-role-mapping",
        address.clone(),
        predicate,
        Operation::new(address, REMOVE),
    )
}

/// Include or exclude `principal` in `role`; the role mapping must exist
pub fn add_assignment(role: &Role, principal: &Principal, include: bool) -> ExecuteStep {
    let address = addresses::principal_in(role.name(), principal, include);
    let mut builder = Operation::builder(address, ADD)
        .param(NAME, principal.name())
        .param(TYPE, principal.principal_type().as_str());
    if let Some(realm) = principal.realm() {
        builder = builder.param(REALM, realm);
    }
    ExecuteStep::new("add-assignment", builder.build())
}

/// Remove assignments, batched into one composite when there is more than one
pub fn remove_assignments<'a, I>(assignments: I) -> BatchStep
where
    I: IntoIterator<Item = &'a Assignment>,
{
    let operations = assignments
        .into_iter()
        .map(|assignment| Operation::new(addresses::assignment(assignment), REMOVE))
        .collect();
    BatchStep::new("remove-assignments", operations)
}

/// Add a scoped role with the attributes in `payload`
pub fn add_scoped_role(
    role_type: RoleType,
    name: &str,
    payload: Map<String, Value>,
) -> Result<ExecuteStep> {
    let address = scoped_role_address(role_type, name)?;
    let operation = Operation::builder(address, ADD).payload(payload).build();
    Ok(ExecuteStep::new("add-scoped-role", operation))
}

/// Apply a change set to a scoped role
///
/// One resulting operation is sent as is, several as a composite.
pub fn modify_scoped_role(
    role: &Role,
    change_set: &Map<String, Value>,
    metadata: &ResourceMetadata,
) -> Result<BatchStep> {
    let address = scoped_role_address(role.role_type(), role.name())?;
    let operations = OperationFactory::new().from_change_set(&address, change_set, metadata)?;
    Ok(BatchStep::new("modify-scoped-role", operations))
}

pub fn remove_scoped_role(role: &Role) -> Result<ExecuteStep> {
    let address = scoped_role_address(role.role_type(), role.name())?;
    Ok(ExecuteStep::new("remove-scoped-role", Operation::new(address, REMOVE)))
}

pub(crate) fn scoped_role_address(role_type: RoleType, name: &str) -> Result<ResourceAddress> {
    addresses::scoped_role(role_type, name)
        .ok_or_else(|| ConsoleError::validation(format!("{} is not a scoped role", name)))
}
