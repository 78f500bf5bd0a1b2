//! Pipeline integration tests
//!
//! Idempotent role mapping creation, batching of removals and change sets.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::authorization;
    use crate::common::{answering, console, domain_model, drain};
    use crate::{assert_err, assert_ok};
    use hal_console::core::access_control::ResourceMetadata;
    use hal_console::{Assignment, Level, OperationMode, Principal, PrincipalType, Role};
    use serde_json::{Map, json};
    use std::sync::Arc;

    fn count(names: &[String], name: &str) -> usize {
        names.iter().filter(|candidate| *candidate == name).count()
    }

    #[tokio::test]
    async fn test_role_mapping_is_added_once() {
        let model = Arc::new(domain_model());
        let console = console(OperationMode::Domain, &model, answering(true));
        assert_ok!(console.start().await);
        model.clear_requests();

        let operator = Role::standard("Operator");
        assert_ok!(console.tasks().modify_standard_role(&operator, true).await);
        assert_ok!(console.tasks().modify_standard_role(&operator, false).await);

        let names = model.operation_names();
        assert_eq!(count(&names, "add"), 1);
        assert_eq!(count(&names, "write-attribute"), 2);
        assert_eq!(
            model.attribute(&authorization("role-mapping=Operator"), "include-all"),
            Some(json!(false))
        );
    }

    #[tokio::test]
    async fn test_single_removal_is_not_batched() {
        let model = Arc::new(domain_model());
        let console = console(OperationMode::Domain, &model, answering(true));
        assert_ok!(console.start().await);

        let excludes: Vec<Assignment> = console
            .access_control()
            .assignments()
            .excludes()
            .cloned()
            .collect();
        model.clear_requests();
        assert_ok!(console.tasks().remove_assignments(&excludes).await);

        // the only composite is the reload afterwards
        assert_eq!(model.composites(), 1);
        assert!(!model.exists(&authorization("role-mapping=Monitor/exclude=user-guest")));
    }

    #[tokio::test]
    async fn test_several_removals_are_one_composite() {
        let model = Arc::new(domain_model());
        let console = console(OperationMode::Domain, &model, answering(true));
        assert_ok!(console.start().await);

        let admin = console
            .access_control()
            .principals()
            .by_resource_name("user-admin")
            .cloned()
            .unwrap();
        let assignments: Vec<Assignment> = console
            .access_control()
            .assignments()
            .by_principal(&admin)
            .cloned()
            .collect();
        assert_eq!(assignments.len(), 2);
        model.clear_requests();

        assert_ok!(console.tasks().remove_assignments(&assignments).await);

        assert_eq!(model.composites(), 2);
        assert_eq!(model.writes(), 2);
        assert!(console.access_control().principals().by_resource_name("user-admin").is_none());
    }

    #[tokio::test]
    async fn test_failed_composite_is_rolled_back() {
        let model = Arc::new(domain_model());
        let console = console(OperationMode::Domain, &model, answering(true));
        assert_ok!(console.start().await);
        let mut events = console.events().subscribe();

        let monitor = Role::standard("Monitor");
        let stranger = Principal::transient(PrincipalType::User, "stranger", None);
        let assignments = vec![
            Assignment::new(
                console
                    .access_control()
                    .principals()
                    .by_resource_name("group-devs@LDAP")
                    .cloned()
                    .unwrap(),
                &monitor,
                true,
            ),
            Assignment::new(stranger, &monitor, true),
        ];

        assert_err!(console.tasks().remove_assignments(&assignments).await);

        assert!(model.exists(&authorization("role-mapping=Monitor/include=group-devs@LDAP")));
        let events = drain(&mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message().map(|m| m.level), Some(Level::Error));
    }

    #[tokio::test]
    async fn test_change_set_writes_only_changes() {
        let model = Arc::new(domain_model());
        let console = console(OperationMode::Domain, &model, answering(true));
        assert_ok!(console.start().await);
        let role = console
            .access_control()
            .roles()
            .by_name("master-monitor")
            .cloned()
            .unwrap();
        model.clear_requests();

        let mut change_set = Map::new();
        change_set.insert("hosts".to_string(), json!(["master", "slave"]));
        let metadata = ResourceMetadata::scoped_role("hosts");
        assert_ok!(
            console
                .tasks()
                .modify_scoped_role(&role, &change_set, &metadata, role.is_include_all())
                .await
        );

        assert_eq!(model.writes(), 1);
        let role = console
            .access_control()
            .roles()
            .by_name("master-monitor")
            .cloned()
            .unwrap();
        assert!(role.scope().contains("slave"));
    }

    #[tokio::test]
    async fn test_principal_needs_a_role() {
        let model = Arc::new(domain_model());
        let console = console(OperationMode::Domain, &model, answering(true));
        assert_ok!(console.start().await);
        model.clear_requests();

        let error = assert_err!(
            console
                .tasks()
                .add_principal(PrincipalType::Group, "ops", Some("LDAP"), &[], &[])
                .await
        );

        assert!(matches!(error, hal_console::ConsoleError::Validation(_)));
        assert!(model.requests().is_empty());
    }
}
