//! Sort orders of the role and membership columns

use super::types::{Assignment, Principal, PrincipalType, Role};
use std::cmp::Ordering;

/// Users before groups
pub fn users_first(a: &Principal, b: &Principal) -> Ordering {
    rank_principal(a).cmp(&rank_principal(b))
}

/// Case-insensitive by principal name
pub fn by_principal_name(a: &Principal, b: &Principal) -> Ordering {
    a.name()
        .to_lowercase()
        .cmp(&b.name().to_lowercase())
        .then_with(|| a.name().cmp(b.name()))
}

/// Exclusions before inclusions
pub fn excludes_first(a: &Assignment, b: &Assignment) -> Ordering {
    a.is_include().cmp(&b.is_include())
}

/// Standard roles before scoped roles
pub fn standard_first(a: &Role, b: &Role) -> Ordering {
    a.is_scoped().cmp(&b.is_scoped())
}

/// Case-insensitive by role name
pub fn by_role_name(a: &Role, b: &Role) -> Ordering {
    a.name()
        .to_lowercase()
        .cmp(&b.name().to_lowercase())
        .then_with(|| a.name().cmp(b.name()))
}

fn rank_principal(principal: &Principal) -> u8 {
    match principal.principal_type() {
        PrincipalType::User => 0,
        PrincipalType::Group => 1,
    }
}
