//! Configuration validation
//!
//! - `trait_def`: Core Validate trait definition
//! - `console_validators`: Validators for every configuration section
//! - `tests`: Test suite for all validators

mod console_validators;
mod trait_def;

pub use trait_def::Validate;
