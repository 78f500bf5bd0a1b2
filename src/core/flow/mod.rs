//! Sequential pipelines of remote operations
//!
//! A [`Pipeline`] runs its [`Step`]s strictly in order. Steps share a
//! [`FlowContext`]; a check step records the status of a resource there and a
//! later conditional step reads it back by address. The first failing step
//! aborts the pipeline and nothing already applied is rolled back.
//!
//! ## Module Structure
//!
//! - `context`: State shared between the steps of one run
//! - `step`: The step trait and the building blocks most pipelines need
//! - `pipeline`: Sequencing and logging

mod context;
mod pipeline;
mod step;

pub use context::FlowContext;
pub use pipeline::Pipeline;
pub use step::{BatchStep, CheckStep, ConditionalStep, ExecuteStep, Step};
