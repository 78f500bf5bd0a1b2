//! Pipeline steps

use super::context::FlowContext;
use crate::core::dispatcher::{check_resource, Dispatcher, ResourceStatus};
use crate::core::dmr::{Composite, Operation, ResourceAddress};
use crate::utils::error::Result;
use async_trait::async_trait;
use tracing::debug;

/// One unit of work in a [`Pipeline`](super::Pipeline)
#[async_trait]
pub trait Step: Send + Sync {
    /// Name used in logs and in [`FlowContext::completed`]
    fn name(&self) -> &str;

    /// Run the step; an error aborts the pipeline
    async fn execute(&self, dispatcher: &dyn Dispatcher, context: &mut FlowContext) -> Result<()>;
}

/// Executes a single operation
pub struct ExecuteStep {
    name: String,
    operation: Operation,
}

impl ExecuteStep {
    pub fn new(name: impl Into<String>, operation: Operation) -> Self {
        Self {
            name: name.into(),
            operation,
        }
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }
}

#[async_trait]
impl Step for ExecuteStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, dispatcher: &dyn Dispatcher, _context: &mut FlowContext) -> Result<()> {
        dispatcher.execute(self.operation.clone()).await?;
        Ok(())
    }
}

/// Probes a resource and records whether it exists
pub struct CheckStep {
    name: String,
    address: ResourceAddress,
}

impl CheckStep {
    pub fn new(name: impl Into<String>, address: ResourceAddress) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

#[async_trait]
impl Step for CheckStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, dispatcher: &dyn Dispatcher, context: &mut FlowContext) -> Result<()> {
        let status = check_resource(dispatcher, &self.address).await?;
        context.record_status(self.address.clone(), status);
        Ok(())
    }
}

type Predicate = dyn Fn(ResourceStatus) -> bool + Send + Sync;

/// Executes an operation only if the recorded status of a resource matches
pub struct ConditionalStep {
    name: String,
    address: ResourceAddress,
    predicate: Box<Predicate>,
    operation: Operation,
}

impl ConditionalStep {
    /// `predicate` is applied to the status a preceding [`CheckStep`]
    /// recorded for `address`
    pub fn new<P>(
        name: impl Into<String>,
        address: ResourceAddress,
        predicate: P,
        operation: Operation,
    ) -> Self
    where
        P: Fn(ResourceStatus) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            address,
            predicate: Box::new(predicate),
            operation,
        }
    }

    /// Execute only when the resource was absent
    pub fn if_absent(name: impl Into<String>, address: ResourceAddress, operation: Operation) -> Self {
        Self::new(name, address, |status| status == ResourceStatus::Absent, operation)
    }

    /// Execute only when the resource exists
    pub fn if_exists(name: impl Into<String>, address: ResourceAddress, operation: Operation) -> Self {
        Self::new(name, address, |status| status == ResourceStatus::Exists, operation)
    }
}

#[async_trait]
impl Step for ConditionalStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, dispatcher: &dyn Dispatcher, context: &mut FlowContext) -> Result<()> {
        let status = context.require_status(&self.address)?;
        if !(self.predicate)(status) {
            debug!("Skipping {}: {} is {:?}", self.name, self.address, status);
            context.mark_skipped(&self.name);
            return Ok(());
        }
        dispatcher.execute(self.operation.clone()).await?;
        Ok(())
    }
}

/// Executes a batch of operations
///
/// Nothing is sent for an empty batch, a single operation is sent as is and
/// anything larger goes out as one composite.
pub struct BatchStep {
    name: String,
    operations: Vec<Operation>,
}

impl BatchStep {
    pub fn new(name: impl Into<String>, operations: Vec<Operation>) -> Self {
        Self {
            name: name.into(),
            operations,
        }
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[async_trait]
impl Step for BatchStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, dispatcher: &dyn Dispatcher, _context: &mut FlowContext) -> Result<()> {
        match self.operations.as_slice() {
            [] => Ok(()),
            [operation] => dispatcher.execute(operation.clone()).await.map(|_| ()),
            operations => {
                let composite = Composite::from(operations.to_vec());
                dispatcher.execute_composite(composite).await.map(|_| ())
            }
        }
    }
}
