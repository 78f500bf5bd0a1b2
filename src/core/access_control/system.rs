//! The access control aggregate

use super::addresses::authorization;
use super::assignments::Assignments;
use super::parse::{parse_snapshot, reload_composite};
use super::principals::Principals;
use super::roles::Roles;
use super::store::{AccessControlSnapshot, ReloadOutcome, SnapshotRef, SnapshotStore};
use super::types::{ADMINISTRATOR, AccessControlProvider, Principal, SUPER_USER};
use crate::core::dispatcher::Dispatcher;
use crate::core::dmr::constants::{NAME, PROVIDER, VALUE, WRITE_ATTRIBUTE_OPERATION};
use crate::core::dmr::Operation;
use crate::core::environment::Environment;
use crate::core::events::EventBus;
use crate::utils::error::Result;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Roles, principals and assignments of the management model
///
/// Reads the whole authorization subtree with one composite and keeps the
/// parsed registries as an immutable snapshot.
pub struct AccessControl {
    dispatcher: Arc<dyn Dispatcher>,
    environment: Environment,
    events: EventBus,
    store: SnapshotStore,
}

impl AccessControl {
    pub fn new(dispatcher: Arc<dyn Dispatcher>, environment: Environment, events: EventBus) -> Self {
        Self {
            dispatcher,
            environment,
            events,
            store: SnapshotStore::new(),
        }
    }

    /// Read the authorization subtree and replace the registries
    ///
    /// The registries stay untouched if the read fails. A reload that
    /// finishes after a later one has already been applied is discarded.
    pub async fn reload(&self) -> Result<ReloadOutcome> {
        let generation = self.store.next_generation();
        let standalone = self.environment.is_standalone();
        debug!("Reloading access control, generation {}", generation);

        let result = self
            .dispatcher
            .execute_composite(reload_composite(standalone))
            .await
            .inspect_err(|e| error!("Failed to read access control: {}", e))?;

        let snapshot = parse_snapshot(&result, standalone, generation);
        let provider = snapshot.provider();

        let outcome = self.store.apply(snapshot);
        match outcome {
            ReloadOutcome::Applied { .. } => {
                self.environment.set_access_control_provider(provider);
                self.sync_current_user(&self.store.load());
                info!(
                    "Access control reloaded (generation {}, provider {})",
                    generation, provider
                );
            }
            ReloadOutcome::Superseded { current, .. } => {
                warn!(
                    "Discarding access control reload {}: generation {} is newer",
                    generation, current
                );
            }
        }
        Ok(outcome)
    }

    /// Switch between the simple and the RBAC provider
    ///
    /// Writes the opposite of the current provider. The registries are not
    /// reloaded.
    pub async fn switch_provider(&self) -> Result<AccessControlProvider> {
        let current = self.environment.access_control_provider();
        let target = current.toggled();
        let operation = Operation::builder(authorization(), WRITE_ATTRIBUTE_OPERATION)
            .param(NAME, PROVIDER)
            .param(VALUE, target.as_str())
            .build();

        match self.dispatcher.execute(operation).await {
            Ok(_) => {
                self.environment.set_access_control_provider(target);
                info!("Switched access control provider from {} to {}", current, target);
                self.events.success(format!(
                    "Access control provider successfully switched from {} to {}.",
                    current, target
                ));
                Ok(target)
            }
            Err(e) => {
                error!("Could not switch access control provider: {}", e);
                self.events.error(
                    "Could not switch access control provider.",
                    Some(e.user_message()),
                );
                Err(e)
            }
        }
    }

    /// Whether the current user may manage access control
    pub fn is_super_user_or_administrator(&self) -> bool {
        if self.environment.access_control_provider() != AccessControlProvider::Rbac {
            return true;
        }

        let run_as = self.environment.run_as();
        if run_as.is_empty() {
            let user = self.environment.user();
            user.has_role(SUPER_USER) || user.has_role(ADMINISTRATOR)
        } else {
            run_as.contains(SUPER_USER) || run_as.contains(ADMINISTRATOR)
        }
    }

    pub fn snapshot(&self) -> Arc<AccessControlSnapshot> {
        self.store.load()
    }

    pub fn roles(&self) -> SnapshotRef<Roles> {
        SnapshotRef::new(self.store.load(), AccessControlSnapshot::roles)
    }

    pub fn principals(&self) -> SnapshotRef<Principals> {
        SnapshotRef::new(self.store.load(), AccessControlSnapshot::principals)
    }

    pub fn assignments(&self) -> SnapshotRef<Assignments> {
        SnapshotRef::new(self.store.load(), AccessControlSnapshot::assignments)
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn dispatcher(&self) -> &dyn Dispatcher {
        self.dispatcher.as_ref()
    }

    /// Give the current user the roles it is included in
    ///
    /// The same user may appear once per realm; the roles of all of them count.
    fn sync_current_user(&self, snapshot: &AccessControlSnapshot) {
        let user = self.environment.user();
        let principals: Vec<&Principal> = snapshot
            .principals()
            .users()
            .filter(|principal| principal.name() == user.name)
            .collect();
        if principals.is_empty() {
            return;
        }

        let roles: Vec<String> = principals
            .into_iter()
            .flat_map(|principal| snapshot.assignments().by_principal(principal))
            .filter(|assignment| assignment.is_include())
            .map(|assignment| assignment.role().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        debug!("Current user {} has roles {:?}", user.name, roles);
        self.environment.set_user_roles(roles);
    }
}

impl fmt::Debug for AccessControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessControl")
            .field("environment", &self.environment)
            .field("store", &self.store)
            .finish()
    }
}
