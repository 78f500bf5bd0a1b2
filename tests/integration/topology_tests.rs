//! Topology integration tests
//!
//! Reading a domain, rendering its status markers and keeping the selection
//! across refreshes.

#[cfg(test)]
mod tests {
    use crate::common::{answering, console, domain_model};
    use crate::{assert_err, assert_ok};
    use hal_console::core::topology::status::{INACTIVE, OK, WARNING};
    use hal_console::core::topology::view::{DOMAIN_CONTROLLER, SELECTED};
    use hal_console::core::topology::{Selector, ServerStatus};
    use hal_console::{ConsoleError, OperationMode, Server};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_domain_topology() {
        let model = Arc::new(domain_model());
        let console = console(OperationMode::Domain, &model, answering(true));
        assert_ok!(console.start().await);

        let topology = console.topology().topology();
        let hosts: Vec<&str> = topology.hosts.iter().map(|host| host.name()).collect();
        assert_eq!(hosts, vec!["master", "slave"]);
        let groups: Vec<&str> = topology.server_groups.iter().map(|g| g.name()).collect();
        assert_eq!(groups, vec!["main-server-group", "other-server-group"]);

        let main = topology.server_group("main-server-group").unwrap();
        assert_eq!(main.profile(), Some("full"));
        assert_eq!(main.servers().len(), 2);

        let one = topology.server(&Server::id_of("master", "server-one")).unwrap();
        assert_eq!(ServerStatus::settled(one), ServerStatus::NeedsReload);
        let three = topology.server(&Server::id_of("slave", "server-three")).unwrap();
        assert_eq!(ServerStatus::settled(three), ServerStatus::Running);

        let view = console.topology().view();
        assert!(view.is_visible());
        let master = view.lookup(&Selector::Host("master".to_string())).unwrap();
        assert!(master.has_class(DOMAIN_CONTROLLER));
        let marker = |host: &str, server: &str, class: &str| {
            view.lookup(&Selector::Server(Server::id_of(host, server)))
                .is_some_and(|element| element.has_class(class))
        };
        assert!(marker("master", "server-one", WARNING));
        assert!(marker("master", "server-two", INACTIVE));
        assert!(marker("slave", "server-three", OK));
    }

    #[tokio::test]
    async fn test_selection_survives_refresh() {
        let model = Arc::new(domain_model());
        let console = console(OperationMode::Domain, &model, answering(true));
        assert_ok!(console.start().await);
        let preview = console.topology();
        let id = Server::id_of("slave", "server-three");
        assert!(preview.select_server(&id));

        model.insert(
            "/host=slave/server-config=server-four",
            json!({"group": "other-server-group", "status": "STOPPED"}),
        );
        assert_ok!(preview.update().await);

        assert_eq!(preview.selection(), Some(Selector::Server(id.clone())));
        let view = preview.view();
        assert!(view.lookup(&Selector::Server(id)).unwrap().has_class(SELECTED));
        assert!(
            view.lookup(&Selector::Server(Server::id_of("slave", "server-four")))
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_selection_of_removed_server_is_dropped() {
        let model = Arc::new(domain_model());
        let console = console(OperationMode::Domain, &model, answering(true));
        assert_ok!(console.start().await);
        let preview = console.topology();
        assert!(preview.select_server(&Server::id_of("master", "server-two")));

        model.remove("/host=master/server-config=server-two");
        assert_ok!(preview.update().await);

        assert_eq!(preview.selection(), None);
        assert!(preview.topology().server(&Server::id_of("master", "server-two")).is_none());
    }

    #[tokio::test]
    async fn test_failed_update_keeps_table() {
        let model = Arc::new(domain_model());
        let console = console(OperationMode::Domain, &model, answering(true));
        assert_ok!(console.start().await);
        let before = console.topology().view();

        // without the root every read fails
        model.remove("/");

        let error = assert_err!(console.topology().update().await);
        assert!(matches!(error, ConsoleError::Operation(_)));
        let after = console.topology().view();
        assert_eq!(after.table(), before.table());
        assert_eq!(console.topology().topology().hosts.len(), 2);
    }
}
