//! Scenario runner
//!
//! Runs sample programs through the prepared interpreter and checks their
//! diagnostic output, either line for line or by the suffix of the last
//! line.

mod config;
mod runner;

pub use config::*;
pub use runner::{
    check, run_scenario, run_script, run_suite, split_lines, ExecutionResult, ScenarioOutcome,
    SuiteReport,
};
