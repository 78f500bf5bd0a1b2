//! Dispatcher boundary
//!
//! The console never talks to the management API directly. Every read and
//! mutation goes through a [`Dispatcher`], which owns transport, encoding and
//! authentication.

mod check;
#[cfg(test)]
pub(crate) mod testing;

pub use check::{check_resource, ResourceStatus};

use crate::core::dmr::{Composite, CompositeResult, Operation};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Executes management operations
///
/// A failed outcome is reported as [`ConsoleError::Operation`] carrying the
/// failure description; a request that never reached the management API is a
/// [`ConsoleError::Dispatch`].
///
/// [`ConsoleError::Operation`]: crate::utils::error::ConsoleError::Operation
/// [`ConsoleError::Dispatch`]: crate::utils::error::ConsoleError::Dispatch
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Execute one operation and return its result payload
    async fn execute(&self, operation: Operation) -> Result<Value>;

    /// Execute several operations in one request
    async fn execute_composite(&self, composite: Composite) -> Result<CompositeResult>;
}
