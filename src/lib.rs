//! loxcheck - acceptance tests for the clox interpreter
//!
//! This library prepares the interpreter once per session and runs sample
//! programs through it, comparing their stderr trace with expectations.

pub mod cli;
pub mod commands;
pub mod common;
pub mod setup;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use setup::{Environment, Session};
pub use testing::{ExecutionResult, Expectation, Scenario};
