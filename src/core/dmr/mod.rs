//! Management model primitives
//!
//! Addresses, operations and results exchanged with the management API.
//! Payloads are plain `serde_json::Value` nodes; [`ModelNodeExt`] adds the
//! accessors the console needs on top of them.

pub mod address;
pub mod constants;
pub mod model;
pub mod operation;
pub mod result;

pub use address::ResourceAddress;
pub use model::ModelNodeExt;
pub use operation::{Composite, Operation, OperationBuilder};
pub use result::{CompositeResult, OperationResult, Outcome};
