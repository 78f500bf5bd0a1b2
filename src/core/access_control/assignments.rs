//! Assignment registry

use super::types::{Assignment, Principal, Role};
use std::collections::BTreeSet;

/// A set of assignments with filtered views
///
/// Filters scan the whole set; there are no secondary indexes.
#[derive(Debug, Clone, Default)]
pub struct Assignments {
    assignments: BTreeSet<Assignment>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an assignment; returns `false` if the same triple is already present
    pub fn add(&mut self, assignment: Assignment) -> bool {
        self.assignments.insert(assignment)
    }

    pub fn contains(&self, assignment: &Assignment) -> bool {
        self.assignments.contains(assignment)
    }

    pub fn by_principal<'a>(
        &'a self,
        principal: &'a Principal,
    ) -> impl Iterator<Item = &'a Assignment> + 'a {
        self.assignments
            .iter()
            .filter(move |assignment| assignment.principal() == principal)
    }

    pub fn by_role<'a>(&'a self, role: &'a Role) -> impl Iterator<Item = &'a Assignment> + 'a {
        self.assignments
            .iter()
            .filter(move |assignment| assignment.role() == role.name())
    }

    pub fn includes(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter().filter(|assignment| assignment.is_include())
    }

    pub fn excludes(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter().filter(|assignment| !assignment.is_include())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl FromIterator<Assignment> for Assignments {
    fn from_iter<I: IntoIterator<Item = Assignment>>(iter: I) -> Self {
        Self {
            assignments: iter.into_iter().collect(),
        }
    }
}
