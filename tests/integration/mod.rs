//! Integration tests for hal-console
//!
//! These tests run complete console sessions against the in-memory
//! management model in `common`.

pub mod access_control_tests;
pub mod config_tests;
pub mod host_actions_tests;
pub mod pipeline_tests;
pub mod topology_tests;
