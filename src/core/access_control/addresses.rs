//! Addresses of access control resources

use super::types::{Assignment, Principal, Role, RoleType};
use crate::core::dmr::constants::{
    ACCESS, AUTHORIZATION, CORE_SERVICE, EXCLUDE, INCLUDE, MANAGEMENT, ROLE_MAPPING,
};
use crate::core::dmr::ResourceAddress;

/// `/core-service=management/access=authorization`
pub fn authorization() -> ResourceAddress {
    ResourceAddress::root()
        .add(CORE_SERVICE, MANAGEMENT)
        .add(ACCESS, AUTHORIZATION)
}

/// Role mapping of a role, addressed by role name
pub fn role_mapping(role: &Role) -> ResourceAddress {
    role_mapping_of(role.name())
}

pub fn role_mapping_of(role_name: &str) -> ResourceAddress {
    authorization().add(ROLE_MAPPING, role_name)
}

/// Include or exclude resource of a principal below a role mapping
pub fn principal_in(role_name: &str, principal: &Principal, include: bool) -> ResourceAddress {
    role_mapping_of(role_name).add(
        if include { INCLUDE } else { EXCLUDE },
        principal.resource_name(),
    )
}

pub fn assignment(assignment: &Assignment) -> ResourceAddress {
    principal_in(assignment.role(), assignment.principal(), assignment.is_include())
}

/// Scoped role resource; `None` for standard roles
pub fn scoped_role(role_type: RoleType, name: &str) -> Option<ResourceAddress> {
    role_type
        .resource_type()
        .map(|resource_type| authorization().add(resource_type, name))
}
