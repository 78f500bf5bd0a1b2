//! Pipeline context

use crate::core::dispatcher::ResourceStatus;
use crate::core::dmr::ResourceAddress;
use crate::utils::error::{ConsoleError, Result};
use std::collections::HashMap;

/// State shared by the steps of one pipeline run
#[derive(Debug, Default)]
pub struct FlowContext {
    statuses: HashMap<ResourceAddress, ResourceStatus>,
    completed: Vec<String>,
    skipped: Vec<String>,
}

impl FlowContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the probed status of `address`
    pub fn record_status(&mut self, address: ResourceAddress, status: ResourceStatus) {
        self.statuses.insert(address, status);
    }

    pub fn status(&self, address: &ResourceAddress) -> Option<ResourceStatus> {
        self.statuses.get(address).copied()
    }

    /// Status recorded by an earlier check; missing checks are a wiring error
    pub fn require_status(&self, address: &ResourceAddress) -> Result<ResourceStatus> {
        self.status(address).ok_or_else(|| {
            ConsoleError::internal(format!("No status recorded for {}", address))
        })
    }

    pub(crate) fn mark_completed(&mut self, step: &str) {
        self.completed.push(step.to_string());
    }

    pub(crate) fn mark_skipped(&mut self, step: &str) {
        self.skipped.push(step.to_string());
    }

    /// Names of the steps that ran to completion, in order
    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    /// Names of conditional steps whose condition did not hold
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }
}
