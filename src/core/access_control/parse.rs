//! Reading the access control model

use super::addresses::authorization;
use super::assignments::Assignments;
use super::ids::role_id;
use super::principals::Principals;
use super::roles::Roles;
use super::store::AccessControlSnapshot;
use super::types::{
    AccessControlProvider, Assignment, LOCAL_USERNAME, Principal, PrincipalType, Role, RoleType,
};
use crate::core::dmr::constants::{
    ATTRIBUTES_ONLY, BASE_ROLE, CHILD_TYPE, EXCLUDE, HOST_SCOPED_ROLE, INCLUDE, INCLUDE_ALL,
    INCLUDE_RUNTIME, NAME, PROVIDER, READ_CHILDREN_RESOURCES_OPERATION, READ_RESOURCE_OPERATION,
    REALM, RECURSIVE, ROLE_MAPPING, SERVER_GROUP_SCOPED_ROLE, STANDARD_ROLE_NAMES, TYPE,
};
use crate::core::dmr::{Composite, CompositeResult, ModelNodeExt, Operation};
use serde_json::Value;
use tracing::{debug, warn};

/// The composite read by a reload
///
/// Step order is fixed: root attributes, then (domain only) host scoped and
/// server group scoped roles, then role mappings.
pub fn reload_composite(standalone: bool) -> Composite {
    let mut composite = Composite::new();
    composite.push(
        Operation::builder(authorization(), READ_RESOURCE_OPERATION)
            .param(INCLUDE_RUNTIME, true)
            .param(ATTRIBUTES_ONLY, true)
            .build(),
    );
    if !standalone {
        composite.push(read_children(HOST_SCOPED_ROLE));
        composite.push(read_children(SERVER_GROUP_SCOPED_ROLE));
    }
    composite.push(read_children(ROLE_MAPPING));
    composite
}

fn read_children(child_type: &str) -> Operation {
    Operation::builder(authorization(), READ_CHILDREN_RESOURCES_OPERATION)
        .param(CHILD_TYPE, child_type)
        .param(RECURSIVE, true)
        .build()
}

/// Build a snapshot from the result of [`reload_composite`]
pub fn parse_snapshot(
    result: &CompositeResult,
    standalone: bool,
    generation: u64,
) -> AccessControlSnapshot {
    let mut roles = Roles::new();
    let mut principals = Principals::new();
    let mut assignments = Assignments::new();

    let mut step = 0;
    let attributes = result.step(step);
    step += 1;

    let provider = attributes.enum_or(PROVIDER, AccessControlProvider::Simple);
    for name in attributes.string_list(STANDARD_ROLE_NAMES) {
        roles.add(Role::standard(name));
    }

    // Scoped roles resolve their base role, so standard roles must be in place
    if !standalone {
        for (name, node) in result.step(step).property_list() {
            let role = scoped_role(&roles, name, node, RoleType::Host);
            roles.add(role);
        }
        step += 1;

        for (name, node) in result.step(step).property_list() {
            let role = scoped_role(&roles, name, node, RoleType::ServerGroup);
            roles.add(role);
        }
        step += 1;
    }

    for (name, node) in result.step(step).property_list() {
        let Some(role) = roles.get_mut(&role_id(name)) else {
            warn!("Cannot add assignment for role {}: No matching role found", name);
            continue;
        };
        if node.has_defined(INCLUDE_ALL) {
            role.set_include_all(node.bool_or(INCLUDE_ALL, false));
        }
        let role = role.clone();

        for (direction, include) in [(INCLUDE, true), (EXCLUDE, false)] {
            let Some(children) = node.get(direction).filter(|children| !children.is_null()) else {
                continue;
            };
            for (resource_name, principal_node) in children.property_list() {
                if let Some(principal) = principal(resource_name, principal_node) {
                    principals.add(principal.clone());
                    assignments.add(Assignment::new(principal, &role, include));
                }
            }
        }
    }

    debug!(
        "Parsed {} roles, {} principals and {} assignments",
        roles.len(),
        principals.len(),
        assignments.len()
    );
    AccessControlSnapshot::new(generation, provider, roles, principals, assignments)
}

fn scoped_role(roles: &Roles, name: &str, node: &Value, role_type: RoleType) -> Role {
    let base_role = node.str_of(BASE_ROLE).and_then(|base| match roles.by_name(base) {
        Some(base) if base.is_standard() => Some(base.name().to_string()),
        _ => {
            warn!("Base role {} of scoped role {} is not a standard role", base, name);
            None
        }
    });
    let scope = role_type
        .scope_attribute()
        .map(|attribute| node.string_list(attribute))
        .unwrap_or_default();
    Role::scoped(name, role_type, base_role, scope)
}

fn principal(resource_name: &str, node: &Value) -> Option<Principal> {
    let name = node.str_of(NAME)?;
    if name == LOCAL_USERNAME {
        return None;
    }

    let principal_type = match node.str_of(TYPE).map(str::parse::<PrincipalType>) {
        Some(Ok(principal_type)) => principal_type,
        _ => {
            warn!("Skipping principal {} with missing or unknown type", resource_name);
            return None;
        }
    };
    let realm = node.str_of(REALM).map(str::to_string);
    Some(Principal::new(principal_type, resource_name, name, realm))
}
