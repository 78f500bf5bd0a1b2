//! Host action integration tests
//!
//! Reload and restart against the in-memory model with time paused, so the
//! polling budget can be checked exactly.

#[cfg(test)]
mod tests {
    use crate::common::{MockConfirm, answering, console, domain_model, drain};
    use crate::{assert_err, assert_ok};
    use hal_console::core::topology::Selector;
    use hal_console::core::topology::status::WITH_PROGRESS;
    use hal_console::{
        Action, ActionCallbacks, ActionResult, ConsoleError, ConsoleEvent, HostActionOutcome,
        Level, OperationMode,
    };
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_reload_host_controller() {
        let model = Arc::new(domain_model().unreachable_after_action(2));
        let console = console(OperationMode::Domain, &model, answering(true));
        assert_ok!(console.start().await);
        let mut events = console.events().subscribe();

        let before = Arc::new(AtomicBool::new(false));
        let after = Arc::new(Mutex::new(None));
        let callbacks = {
            let before = before.clone();
            let after = after.clone();
            ActionCallbacks::new()
                .before(move || before.store(true, Ordering::SeqCst))
                .after(move |outcome| *after.lock() = Some(outcome))
        };
        let started = Instant::now();

        let outcome = assert_ok!(console.reload_host("slave", true, callbacks).await);

        assert_eq!(outcome, HostActionOutcome::Completed);
        // dialog delay, then two failed pings and one answered ping
        assert_eq!(started.elapsed(), Duration::from_millis(111 + 3 * 500));
        assert!(before.load(Ordering::SeqCst));
        assert_eq!(*after.lock(), Some(HostActionOutcome::Completed));

        let reload = model
            .requests()
            .into_iter()
            .find(|operation| operation.name() == "reload")
            .unwrap();
        assert_eq!(reload.address().to_string(), "/host=slave");
        assert_eq!(reload.param("restart-servers"), Some(&json!(true)));

        let events = drain(&mut events);
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            ConsoleEvent::HostAction {
                host: "slave".to_string(),
                servers: vec!["server-three".to_string()],
                action: Action::Reload,
            }
        );
        assert!(matches!(
            events[1],
            ConsoleEvent::HostResult { outcome: ActionResult::Completed, .. }
        ));
        let message = events[2].message().unwrap();
        assert_eq!(message.level, Level::Success);
        assert_eq!(message.text, "Host slave successfully reloaded.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_domain_controller_times_out() {
        let model = Arc::new(domain_model().unreachable_after_action(usize::MAX));
        let console = console(OperationMode::Domain, &model, answering(true));
        assert_ok!(console.start().await);
        let mut events = console.events().subscribe();
        let started = Instant::now();

        let outcome = assert_ok!(console.restart_host("master", ActionCallbacks::new()).await);

        assert_eq!(outcome, HostActionOutcome::TimedOut);
        // 12s plus 4s for server-one, the only running server on master
        assert!(started.elapsed() >= Duration::from_millis(111 + 16_000));
        assert!(started.elapsed() < Duration::from_millis(111 + 16_500));
        assert!(!console.host_actions().is_pending("master"));

        let shutdown = model
            .requests()
            .into_iter()
            .find(|operation| operation.name() == "shutdown")
            .unwrap();
        assert_eq!(shutdown.param("restart"), Some(&json!(true)));

        let kinds: Vec<&str> = drain(&mut events)
            .iter()
            .map(|event| match event {
                ConsoleEvent::HostAction { .. } => "action",
                ConsoleEvent::LongRunning { .. } => "long-running",
                ConsoleEvent::HostResult { outcome: ActionResult::TimedOut, .. } => "timed-out",
                ConsoleEvent::LongRunningClosed => "closed",
                ConsoleEvent::Blocking { .. } => "blocking",
                _ => "other",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["action", "long-running", "timed-out", "closed", "blocking"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_declined_restart() {
        let model = Arc::new(domain_model());
        let mut confirm = MockConfirm::new();
        confirm
            .expect_confirm()
            .withf(|title, _| title == "Restart slave")
            .times(1)
            .returning(|_, _| false);
        let console = console(OperationMode::Domain, &model, Arc::new(confirm));
        assert_ok!(console.start().await);
        model.clear_requests();

        let outcome = assert_ok!(console.restart_host("slave", ActionCallbacks::new()).await);

        assert_eq!(outcome, HostActionOutcome::Cancelled);
        assert!(model.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_is_cleared_after_action() {
        let model = Arc::new(domain_model().unreachable_after_action(1));
        let console = console(OperationMode::Domain, &model, answering(true));
        assert_ok!(console.start().await);

        let outcome = assert_ok!(
            console
                .reload_host("master", false, ActionCallbacks::new())
                .await
        );
        assert_eq!(outcome, HostActionOutcome::Completed);

        // let the listener refresh the topology
        tokio::time::sleep(Duration::from_millis(10)).await;

        let view = console.topology().view();
        let host = view.lookup(&Selector::Host("master".to_string())).unwrap();
        assert!(!host.has_class(WITH_PROGRESS));
        assert!(console.host_actions().pending().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_host() {
        let model = Arc::new(domain_model());
        let console = console(OperationMode::Domain, &model, answering(true));
        assert_ok!(console.start().await);

        let error = assert_err!(console.restart_host("nowhere", ActionCallbacks::new()).await);
        assert!(matches!(error, ConsoleError::NotFound(_)));
    }
}
