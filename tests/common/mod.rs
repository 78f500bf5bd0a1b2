//! Common test utilities for hal-console
//!
//! - An in-memory management model implementing the dispatcher
//! - Fixtures describing a standalone server and a small domain
//! - Helpers to build a console session and collect its events
//! - A `mockall` confirmation

pub mod fixtures;
pub mod model;

pub use fixtures::{domain_model, standalone_model};
pub use model::ManagementModel;

use async_trait::async_trait;
use hal_console::{Config, Confirmation, Console, ConsoleEvent, OperationMode};
use mockall::mock;
use std::sync::Arc;
use tokio::sync::broadcast::Receiver;

mock! {
    pub Confirm {}

    #[async_trait]
    impl Confirmation for Confirm {
        async fn confirm(&self, title: &str, question: &str) -> bool;
    }
}

/// A confirmation answering every question with `answer`
pub fn answering(answer: bool) -> Arc<MockConfirm> {
    let mut confirm = MockConfirm::new();
    confirm.expect_confirm().returning(move |_, _| answer);
    Arc::new(confirm)
}

/// Configuration for `mode` with `admin` as the logged in user
pub fn config(mode: OperationMode) -> Config {
    let mut config = Config::default();
    config.console.environment.mode = mode;
    config.console.environment.user.name = "admin".to_string();
    config
}

/// A console session on top of `model`
pub fn console(
    mode: OperationMode,
    model: &Arc<ManagementModel>,
    confirmation: Arc<dyn Confirmation>,
) -> Console {
    Console::new(config(mode), Arc::clone(model) as _, confirmation)
}

/// Events published so far
pub fn drain(receiver: &mut Receiver<ConsoleEvent>) -> Vec<ConsoleEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
