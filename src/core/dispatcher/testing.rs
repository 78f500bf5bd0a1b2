//! Scripted dispatcher for unit tests

use super::Dispatcher;
use crate::core::dmr::{Composite, CompositeResult, Operation, OperationResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

type Handler = dyn Fn(&Operation) -> Result<Value> + Send + Sync;

/// A request seen by [`ScriptedDispatcher`]
#[derive(Debug, Clone)]
pub enum Request {
    Single(Operation),
    Composite(Composite),
}

/// Answers every operation through a closure and records what it saw
pub struct ScriptedDispatcher {
    handler: Box<Handler>,
    log: Mutex<Vec<Request>>,
}

impl ScriptedDispatcher {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Operation) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Every operation executed, composites flattened
    pub fn requests(&self) -> Vec<Operation> {
        self.log
            .lock()
            .iter()
            .flat_map(|request| match request {
                Request::Single(operation) => vec![operation.clone()],
                Request::Composite(composite) => composite.operations().to_vec(),
            })
            .collect()
    }

    pub fn log(&self) -> Vec<Request> {
        self.log.lock().clone()
    }
}

#[async_trait]
impl Dispatcher for ScriptedDispatcher {
    async fn execute(&self, operation: Operation) -> Result<Value> {
        self.log.lock().push(Request::Single(operation.clone()));
        (self.handler)(&operation)
    }

    async fn execute_composite(&self, composite: Composite) -> Result<CompositeResult> {
        self.log.lock().push(Request::Composite(composite.clone()));
        let mut steps = Vec::with_capacity(composite.len());
        for operation in composite.iter() {
            steps.push(OperationResult::success((self.handler)(operation)?));
        }
        Ok(CompositeResult::new(steps))
    }
}
