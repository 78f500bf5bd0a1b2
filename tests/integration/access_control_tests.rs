//! Access control integration tests
//!
//! Reload, provider switch and the scoped role life cycle against the
//! in-memory management model.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::authorization;
    use crate::common::{ManagementModel, answering, console, domain_model, drain, standalone_model};
    use crate::{assert_err, assert_ok};
    use hal_console::{
        AccessControlProvider, ConsoleError, ConsoleEvent, Level, OperationMode, PrincipalType,
        RoleType,
    };
    use serde_json::{Map, Value, json};
    use std::sync::Arc;

    fn payload(base_role: &str, groups: &[&str]) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("base-role".to_string(), json!(base_role));
        payload.insert("server-groups".to_string(), json!(groups));
        payload
    }

    #[tokio::test]
    async fn test_domain_reload() {
        let model = Arc::new(domain_model());
        let console = console(OperationMode::Domain, &model, answering(true));
        assert_ok!(console.start().await);

        let access_control = console.access_control();
        assert_eq!(access_control.roles().len(), 9);
        assert_eq!(access_control.roles().scoped_roles().count(), 2);
        // $local is never shown
        assert_eq!(access_control.principals().len(), 3);
        assert_eq!(access_control.assignments().len(), 4);
        assert_eq!(access_control.assignments().excludes().count(), 1);

        let monitor = access_control.roles().by_name("Monitor").cloned().unwrap();
        assert!(monitor.is_include_all());
        let scoped = access_control.roles().by_name("master-monitor").cloned().unwrap();
        assert_eq!(scoped.base_role(), Some("Monitor"));
        assert!(scoped.scope().contains("master"));

        let environment = console.environment();
        assert_eq!(
            environment.access_control_provider(),
            AccessControlProvider::Rbac
        );
        assert!(environment.user().has_role("SuperUser"));
        assert!(environment.user().has_role("master-monitor"));
        assert!(access_control.is_super_user_or_administrator());
    }

    #[tokio::test]
    async fn test_standalone_reload_skips_scoped_roles() {
        let model = Arc::new(standalone_model());
        let console = console(OperationMode::Standalone, &model, answering(true));
        assert_ok!(console.start().await);

        assert_eq!(console.access_control().roles().len(), 7);
        assert_eq!(console.access_control().roles().scoped_roles().count(), 0);
        assert!(console.topology().topology().is_empty());
        assert!(!model.operation_names().iter().any(|name| name == "read-children-names"));
    }

    #[tokio::test]
    async fn test_switch_provider() {
        let model = Arc::new(standalone_model());
        let console = console(OperationMode::Standalone, &model, answering(true));
        assert_ok!(console.start().await);
        let mut events = console.events().subscribe();

        let switched = assert_ok!(console.switch_provider().await);

        assert_eq!(switched, Some(AccessControlProvider::Simple));
        assert_eq!(
            model.attribute(&authorization(""), "provider"),
            Some(json!("simple"))
        );
        let events = drain(&mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message().map(|m| m.level), Some(Level::Success));
        // the registries are only refreshed by the next reload
        assert_eq!(console.access_control().roles().len(), 7);
    }

    #[tokio::test]
    async fn test_scoped_role_life_cycle() {
        let model = Arc::new(domain_model());
        let console = console(OperationMode::Domain, &model, answering(true));
        assert_ok!(console.start().await);
        let mut events = console.events().subscribe();

        assert_ok!(
            console
                .tasks()
                .add_scoped_role(
                    RoleType::ServerGroup,
                    "other-deployer",
                    payload("Deployer", &["other-server-group"]),
                    true,
                )
                .await
        );

        assert!(model.exists(&authorization("server-group-scoped-role=other-deployer")));
        assert_eq!(
            model.attribute(&authorization("role-mapping=other-deployer"), "include-all"),
            Some(json!(true))
        );
        let role = console
            .access_control()
            .roles()
            .by_name("other-deployer")
            .cloned()
            .unwrap();
        assert!(role.is_include_all());
        let published = drain(&mut events);
        assert_eq!(published.len(), 2);
        assert_eq!(published[1], ConsoleEvent::RolesChanged);

        assert_ok!(
            console
                .tasks()
                .add_principal(PrincipalType::User, "jane", None, std::slice::from_ref(&role), &[])
                .await
        );
        assert!(model.exists(&authorization("role-mapping=other-deployer/include=user-jane")));
        assert_eq!(console.access_control().principals().len(), 4);

        assert!(assert_ok!(console.remove_scoped_role(&role).await));

        assert!(!model.exists(&authorization("server-group-scoped-role=other-deployer")));
        assert!(!model.exists(&authorization("role-mapping=other-deployer")));
        assert!(console.access_control().roles().by_name("other-deployer").is_none());
        // jane only existed through the removed assignment
        assert_eq!(console.access_control().principals().len(), 3);
    }

    #[tokio::test]
    async fn test_declined_removal_sends_nothing() {
        let model = Arc::new(domain_model());
        let console = console(OperationMode::Domain, &model, answering(false));
        assert_ok!(console.start().await);
        model.clear_requests();

        let role = console
            .access_control()
            .roles()
            .by_name("master-monitor")
            .cloned()
            .unwrap();
        assert!(!assert_ok!(console.remove_scoped_role(&role).await));

        assert!(model.requests().is_empty());
        assert!(model.exists(&authorization("host-scoped-role=master-monitor")));
    }

    #[tokio::test]
    async fn test_failed_removal_reports_one_error() {
        let model = Arc::new(domain_model());
        let console = console(OperationMode::Domain, &model, answering(true));
        assert_ok!(console.start().await);
        let generation = console.access_control().snapshot().generation();

        // known to the registries, but removed behind the console's back
        model.remove(&authorization("role-mapping=master-monitor"));
        model.remove(&authorization("host-scoped-role=master-monitor"));
        let mut events = console.events().subscribe();
        let role = console
            .access_control()
            .roles()
            .by_name("master-monitor")
            .cloned()
            .unwrap();

        let error = assert_err!(console.remove_scoped_role(&role).await);

        assert!(matches!(error, ConsoleError::Operation(_)));
        let events = drain(&mut events);
        assert_eq!(events.len(), 1);
        let message = events[0].message().unwrap();
        assert_eq!(message.level, Level::Error);
        assert!(message.details.as_deref().unwrap_or_default().contains("WFLYCTL0216"));
        assert_eq!(console.access_control().snapshot().generation(), generation);
    }

    #[tokio::test]
    async fn test_reload_failure_keeps_registries() {
        let model = Arc::new(ManagementModel::new());
        let console = console(OperationMode::Standalone, &model, answering(true));

        let error = assert_err!(console.access_control().reload().await);

        assert!(error.is_operation_failure());
        assert!(console.access_control().roles().is_empty());
    }
}
