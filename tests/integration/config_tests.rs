//! Configuration integration tests
//!
//! Loading configuration files and starting a session from them.

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use crate::common::{answering, domain_model};
    use hal_console::{AccessControlProvider, Config, Console, ConsoleError, OperationMode};
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_session_from_file() {
        let file = write_config(
            r#"
environment:
  mode: domain
  user:
    name: admin
  run_as: [Monitor]
timeouts:
  reload_base_secs: 20
events:
  capacity: 16
"#,
        );
        let config = assert_ok!(Config::from_file(file.path()).await);
        assert_eq!(config.timeouts().reload_base_secs, 20);
        assert_eq!(config.timeouts().restart_base_secs, 12);

        let model = Arc::new(domain_model());
        let console = Console::new(config, model.clone(), answering(true));
        assert_ok!(console.start().await);

        assert_eq!(console.environment().mode(), OperationMode::Domain);
        assert_eq!(
            console.environment().access_control_provider(),
            AccessControlProvider::Rbac
        );
        // run-as Monitor hides the SuperUser role of admin
        assert!(!console.access_control().is_super_user_or_administrator());
        assert_eq!(console.topology().topology().hosts.len(), 2);
    }

    #[tokio::test]
    async fn test_loading_delay_must_be_below_timeout() {
        let file = write_config(
            "timeouts:\n  topology_timeout_ms: 400\n  loading_delay_ms: 400\n",
        );

        let result = Config::from_file(file.path()).await;
        match result {
            Err(ConsoleError::Config(message)) => assert!(message.contains("Loading delay")),
            other => panic!("Expected config error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_mode_is_rejected() {
        let file = write_config("environment:\n  mode: cluster\n");

        let result = Config::from_file(file.path()).await;
        assert!(matches!(result, Err(ConsoleError::Config(_))));
    }

    #[test]
    fn test_round_trip_through_yaml() {
        let mut config = Config::default();
        config.console.environment.mode = OperationMode::Domain;
        config.console.timeouts.poll_interval_ms = 250;

        let yaml = config.to_yaml().unwrap();
        let parsed: hal_console::config::ConsoleConfig = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed.environment.mode, OperationMode::Domain);
        assert_eq!(parsed.timeouts.poll_interval_ms, 250);
    }
}
