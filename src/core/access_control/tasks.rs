//! Access control mutations
//!
//! Every entry point runs one pipeline. Its outcome is reported with exactly
//! one success or error message; after a success the registries are reloaded
//! and [`ConsoleEvent::RolesChanged`] is broadcast.

use super::change_set::ResourceMetadata;
use super::steps;
use super::system::AccessControl;
use super::types::{Assignment, Principal, PrincipalType, Role, RoleType};
use crate::core::dispatcher::ResourceStatus;
use crate::core::events::ConsoleEvent;
use crate::core::flow::Pipeline;
use crate::utils::error::{ConsoleError, Result};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{error, info};

fn absent(status: ResourceStatus) -> bool {
    status == ResourceStatus::Absent
}

fn exists(status: ResourceStatus) -> bool {
    status == ResourceStatus::Exists
}

/// Entry points of the role, principal and membership columns
#[derive(Debug, Clone)]
pub struct AccessControlTasks {
    access_control: Arc<AccessControl>,
}

impl AccessControlTasks {
    pub fn new(access_control: Arc<AccessControl>) -> Self {
        Self { access_control }
    }

    /// Add a host or server group scoped role and make sure it has a role mapping
    pub async fn add_scoped_role(
        &self,
        role_type: RoleType,
        name: &str,
        payload: Map<String, Value>,
        include_all: bool,
    ) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ConsoleError::validation("Role name must not be empty"));
        }
        if self.access_control.roles().by_name(name).is_some() {
            return Err(ConsoleError::validation(format!("Role {} already exists", name)));
        }

        // Role mapping steps only need the name
        let transient = Role::scoped(name, role_type, None, Vec::<String>::new());
        let pipeline = Pipeline::new("add-scoped-role")
            .step(steps::add_scoped_role(role_type, name, payload)?)
            .step(steps::check_role_mapping(&transient))
            .step(steps::add_role_mapping(&transient, absent))
            .step_if(include_all, steps::modify_include_all(&transient, true));

        self.execute(
            pipeline,
            format!("{} {} successfully added.", role_type.label(), name),
            format!("Could not add {} {}.", role_type.label(), name),
        )
        .await
    }

    /// Set the include-all flag of a standard role, creating its role mapping if needed
    pub async fn modify_standard_role(&self, role: &Role, include_all: bool) -> Result<()> {
        let pipeline = Pipeline::new("modify-standard-role")
            .step(steps::check_role_mapping(role))
            .step(steps::add_role_mapping(role, absent))
            .step(steps::modify_include_all(role, include_all));

        self.execute(
            pipeline,
            format!("Role {} successfully modified.", role.name()),
            format!("Could not modify role {}.", role.name()),
        )
        .await
    }

    /// Apply changed attributes to a scoped role and update its include-all flag
    ///
    /// Only what changed is written; an empty change set with an unchanged
    /// flag sends nothing.
    pub async fn modify_scoped_role(
        &self,
        role: &Role,
        change_set: &Map<String, Value>,
        metadata: &ResourceMetadata,
        include_all: bool,
    ) -> Result<()> {
        let mut pipeline = Pipeline::new("modify-scoped-role");
        if !change_set.is_empty() {
            pipeline = pipeline.step(steps::modify_scoped_role(role, change_set, metadata)?);
        }
        let include_all_changed = include_all != role.is_include_all();
        pipeline = pipeline.step_if(include_all_changed, steps::modify_include_all(role, include_all));

        let label = role.role_type().label();
        self.execute(
            pipeline,
            format!("{} {} successfully modified.", label, role.name()),
            format!("Could not modify {} {}.", label, role.name()),
        )
        .await
    }

    /// Remove a scoped role together with its assignments and role mapping
    ///
    /// Order: assignments, role mapping (if it exists), scoped role.
    pub async fn remove_scoped_role(&self, role: &Role) -> Result<()> {
        if !role.is_scoped() {
            return Err(ConsoleError::validation(format!(
                "{} is not a scoped role",
                role.name()
            )));
        }

        let assignments: Vec<Assignment> = self
            .access_control
            .assignments()
            .by_role(role)
            .cloned()
            .collect();

        let pipeline = Pipeline::new("remove-scoped-role")
            .step_if(!assignments.is_empty(), steps::remove_assignments(&assignments))
            .step(steps::check_role_mapping(role))
            .step(steps::remove_role_mapping(role, exists))
            .step(steps::remove_scoped_role(role)?);

        let label = role.role_type().label();
        self.execute(
            pipeline,
            format!("{} {} successfully removed.", label, role.name()),
            format!("Could not remove {} {}.", label, role.name()),
        )
        .await
    }

    /// Include or exclude a principal in a role
    pub async fn add_assignment(&self, principal: &Principal, role: &Role, include: bool) -> Result<()> {
        let pipeline = Pipeline::new("add-assignment")
            .step(steps::check_role_mapping(role))
            .step(steps::add_role_mapping(role, absent))
            .step(steps::add_assignment(role, principal, include));

        let verb = if include { "included in" } else { "excluded from" };
        self.execute(
            pipeline,
            format!("{} successfully {} role {}.", principal.name(), verb, role.name()),
            format!("Could not assign {} to role {}.", principal.name(), role.name()),
        )
        .await
    }

    /// Add a new user or group by assigning it to roles
    ///
    /// A principal only exists through its assignments, so at least one role
    /// must be included or excluded.
    pub async fn add_principal(
        &self,
        principal_type: PrincipalType,
        name: &str,
        realm: Option<&str>,
        includes: &[Role],
        excludes: &[Role],
    ) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ConsoleError::validation("Name must not be empty"));
        }
        if includes.is_empty() && excludes.is_empty() {
            return Err(ConsoleError::validation("No roles included or excluded"));
        }

        let principal = Principal::transient(principal_type, name, realm);
        let mut pipeline = Pipeline::new("add-principal");
        let assignments = includes
            .iter()
            .map(|role| (role, true))
            .chain(excludes.iter().map(|role| (role, false)));
        for (role, include) in assignments {
            pipeline = pipeline
                .step(steps::check_role_mapping(role))
                .step(steps::add_role_mapping(role, absent))
                .step(steps::add_assignment(role, &principal, include));
        }

        let label = match principal_type {
            PrincipalType::User => "User",
            PrincipalType::Group => "Group",
        };
        self.execute(
            pipeline,
            format!("{} {} successfully added.", label, name),
            format!("Could not add {} {}.", label.to_lowercase(), name),
        )
        .await
    }

    /// Remove assignments, one operation for a single one, a composite otherwise
    pub async fn remove_assignments(&self, assignments: &[Assignment]) -> Result<()> {
        if assignments.is_empty() {
            return Err(ConsoleError::validation("No assignments to remove"));
        }

        let pipeline =
            Pipeline::new("remove-assignments").step(steps::remove_assignments(assignments));

        self.execute(
            pipeline,
            format!("{} assignment(s) successfully removed.", assignments.len()),
            "Could not remove assignments.".to_string(),
        )
        .await
    }

    async fn execute(&self, pipeline: Pipeline, success: String, failure: String) -> Result<()> {
        let events = self.access_control.events();

        if let Err(e) = pipeline.run(self.access_control.dispatcher()).await {
            events.error(failure, Some(e.user_message()));
            return Err(e);
        }

        info!("{}", success);
        events.success(success);

        match self.access_control.reload().await {
            Ok(_) => events.publish(ConsoleEvent::RolesChanged),
            Err(e) => error!("Reload after {} failed: {}", pipeline.name(), e),
        }
        Ok(())
    }
}
