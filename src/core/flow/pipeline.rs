//! Pipeline sequencing

use super::context::FlowContext;
use super::step::Step;
use crate::core::dispatcher::Dispatcher;
use crate::utils::error::Result;
use std::fmt;
use tracing::{debug, error};

/// An ordered list of steps that stops at the first failure
pub struct Pipeline {
    name: String,
    steps: Vec<Box<dyn Step>>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step
    pub fn step<S: Step + 'static>(mut self, step: S) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Append a step only if `condition` holds
    pub fn step_if<S: Step + 'static>(self, condition: bool, step: S) -> Self {
        if condition { self.step(step) } else { self }
    }

    pub fn push(&mut self, step: Box<dyn Step>) {
        self.steps.push(step);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Run every step in order
    ///
    /// Returns the context of the run, or the error of the first failing
    /// step. Steps after a failure never start.
    pub async fn run(&self, dispatcher: &dyn Dispatcher) -> Result<FlowContext> {
        let mut context = FlowContext::new();
        debug!("Running pipeline {} ({} steps)", self.name, self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            debug!("{} [{}/{}] {}", self.name, index + 1, self.steps.len(), step.name());
            if let Err(e) = step.execute(dispatcher, &mut context).await {
                error!("Pipeline {} failed at step {}: {}", self.name, step.name(), e);
                return Err(e);
            }
            context.mark_completed(step.name());
        }

        debug!("Pipeline {} completed", self.name);
        Ok(context)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("steps", &self.step_names())
            .finish()
    }
}
