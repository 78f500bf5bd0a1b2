//! Error handling for the console core
//!
//! This module defines the crate error type, constructor helpers and the
//! `Result` alias used by every component.

#![allow(missing_docs)]

mod helpers;
mod types;

pub use types::{ConsoleError, Result};
