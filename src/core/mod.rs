//! Core functionality of the console
//!
//! This module contains the management model primitives, the dispatcher
//! boundary and the components built on top of them.

pub mod access_control;
pub mod dispatcher;
pub mod dmr;
pub mod environment;
pub mod events;
pub mod flow;
pub mod runtime;
pub mod topology;
