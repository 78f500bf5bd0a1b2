//! Role registry

use super::ids::role_id;
use super::types::Role;
use std::collections::HashMap;

/// Roles indexed by id, with the standard and scoped subsets kept in
/// insertion order
#[derive(Debug, Clone, Default)]
pub struct Roles {
    lookup: HashMap<String, Role>,
    standard: Vec<String>,
    scoped: Vec<String>,
}

impl Roles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role; returns `false` if a role with the same id exists
    pub fn add(&mut self, role: Role) -> bool {
        let id = role.id();
        if self.lookup.contains_key(&id) {
            return false;
        }
        if role.is_standard() {
            self.standard.push(id.clone());
        } else {
            self.scoped.push(id.clone());
        }
        self.lookup.insert(id, role);
        true
    }

    /// Look up a role by id
    pub fn get(&self, id: &str) -> Option<&Role> {
        self.lookup.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Role> {
        self.lookup.get_mut(id)
    }

    /// Look up a role by its name
    pub fn by_name(&self, name: &str) -> Option<&Role> {
        self.get(&role_id(name))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lookup.contains_key(id)
    }

    /// The standard role a scoped role derives from
    pub fn base_role(&self, role: &Role) -> Option<&Role> {
        role.base_role()
            .and_then(|name| self.by_name(name))
            .filter(|base| base.is_standard())
    }

    pub fn standard_roles(&self) -> impl Iterator<Item = &Role> {
        self.standard.iter().filter_map(|id| self.lookup.get(id))
    }

    pub fn scoped_roles(&self) -> impl Iterator<Item = &Role> {
        self.scoped.iter().filter_map(|id| self.lookup.get(id))
    }

    /// Standard roles first, then scoped roles
    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.standard_roles().chain(self.scoped_roles())
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}
