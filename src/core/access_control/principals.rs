//! Principal registry

use super::types::{Principal, PrincipalType};
use std::collections::{BTreeSet, HashMap};

/// Principals bucketed by type, with lookups by id and resource name
#[derive(Debug, Clone, Default)]
pub struct Principals {
    buckets: HashMap<PrincipalType, BTreeSet<Principal>>,
    lookup: HashMap<String, Principal>,
    ids: HashMap<String, String>,
}

impl Principals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a principal; returns `false` if its resource name is already known
    pub fn add(&mut self, principal: Principal) -> bool {
        if self.lookup.contains_key(principal.resource_name()) {
            return false;
        }
        self.ids
            .entry(principal.id())
            .or_insert_with(|| principal.resource_name().to_string());
        self.buckets
            .entry(principal.principal_type())
            .or_default()
            .insert(principal.clone());
        self.lookup
            .insert(principal.resource_name().to_string(), principal);
        true
    }

    /// Look up a principal by id, e.g. `user-john`
    pub fn get(&self, id: &str) -> Option<&Principal> {
        self.ids
            .get(id)
            .and_then(|resource_name| self.lookup.get(resource_name))
    }

    pub fn by_resource_name(&self, resource_name: &str) -> Option<&Principal> {
        self.lookup.get(resource_name)
    }

    pub fn contains(&self, principal: &Principal) -> bool {
        self.lookup.contains_key(principal.resource_name())
    }

    /// Principals of one type, ordered by resource name
    pub fn of_type(&self, principal_type: PrincipalType) -> impl Iterator<Item = &Principal> {
        self.buckets
            .get(&principal_type)
            .into_iter()
            .flat_map(|bucket| bucket.iter())
    }

    pub fn users(&self) -> impl Iterator<Item = &Principal> {
        self.of_type(PrincipalType::User)
    }

    pub fn groups(&self) -> impl Iterator<Item = &Principal> {
        self.of_type(PrincipalType::Group)
    }

    /// Users first, then groups
    pub fn iter(&self) -> impl Iterator<Item = &Principal> {
        self.users().chain(self.groups())
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}
