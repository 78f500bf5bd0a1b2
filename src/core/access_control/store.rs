//! Snapshot store
//!
//! The registries are never patched in place. A reload builds a complete
//! [`AccessControlSnapshot`] and swaps it in atomically, so readers see either
//! the old or the new state, never something in between.

use super::assignments::Assignments;
use super::principals::Principals;
use super::roles::Roles;
use super::types::AccessControlProvider;
use arc_swap::ArcSwap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Registries read by one reload
#[derive(Debug, Clone, Default)]
pub struct AccessControlSnapshot {
    generation: u64,
    provider: AccessControlProvider,
    roles: Roles,
    principals: Principals,
    assignments: Assignments,
}

impl AccessControlSnapshot {
    pub fn new(
        generation: u64,
        provider: AccessControlProvider,
        roles: Roles,
        principals: Principals,
        assignments: Assignments,
    ) -> Self {
        Self {
            generation,
            provider,
            roles,
            principals,
            assignments,
        }
    }

    /// Generation of the reload that produced this snapshot; 0 before the first one
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn provider(&self) -> AccessControlProvider {
        self.provider
    }

    pub fn roles(&self) -> &Roles {
        &self.roles
    }

    pub fn principals(&self) -> &Principals {
        &self.principals
    }

    pub fn assignments(&self) -> &Assignments {
        &self.assignments
    }
}

/// Result of applying a finished reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The snapshot is now current
    Applied { generation: u64 },
    /// A newer reload had already been applied; the snapshot was dropped
    Superseded { generation: u64, current: u64 },
}

impl ReloadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Holds the current snapshot and hands out reload generations
#[derive(Default)]
pub struct SnapshotStore {
    current: ArcSwap<AccessControlSnapshot>,
    generations: AtomicU64,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the generation of a reload that is about to start
    pub fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn load(&self) -> Arc<AccessControlSnapshot> {
        self.current.load_full()
    }

    /// Install `snapshot` unless a newer generation is already current
    pub fn apply(&self, snapshot: AccessControlSnapshot) -> ReloadOutcome {
        let generation = snapshot.generation;
        let candidate = Arc::new(snapshot);

        loop {
            let current = self.current.load_full();
            if generation <= current.generation {
                return ReloadOutcome::Superseded {
                    generation,
                    current: current.generation,
                };
            }

            let previous = self.current.compare_and_swap(&current, Arc::clone(&candidate));
            if Arc::ptr_eq(&*previous, &current) {
                return ReloadOutcome::Applied { generation };
            }
        }
    }
}

impl fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("generation", &self.current.load().generation)
            .finish()
    }
}

/// A registry borrowed from a snapshot that stays alive as long as the view
pub struct SnapshotRef<T> {
    snapshot: Arc<AccessControlSnapshot>,
    project: fn(&AccessControlSnapshot) -> &T,
}

impl<T> SnapshotRef<T> {
    pub(crate) fn new(
        snapshot: Arc<AccessControlSnapshot>,
        project: fn(&AccessControlSnapshot) -> &T,
    ) -> Self {
        Self { snapshot, project }
    }

    /// The snapshot the registry belongs to
    pub fn snapshot(&self) -> &Arc<AccessControlSnapshot> {
        &self.snapshot
    }
}

impl<T> Deref for SnapshotRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        (self.project)(&self.snapshot)
    }
}

impl<T: fmt::Debug> fmt::Debug for SnapshotRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}
