//! Error types for loxcheck
//!
//! Errors fall into two tiers. Setup errors (`PrepareFailed`,
//! `RuntimeNotFound`) abort the whole session; everything else fails a
//! single scenario and is reported under that scenario's name.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for loxcheck
#[derive(Error, Debug)]
pub enum Error {
    // === Setup Errors ===
    #[error("Prepare step '{step}' failed ({command}) with {}{}", describe_code(.code), tail(.stderr))]
    PrepareFailed {
        step: String,
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Runtime binary not found at '{}'. Run 'loxcheck prepare' to build it", .0.display())]
    RuntimeNotFound(PathBuf),

    #[error("Samples directory not found at '{}'", .0.display())]
    SamplesDirNotFound(PathBuf),

    // === Scenario Errors ===
    #[error("Sample '{name}' not found at '{}'", .path.display())]
    SampleNotFound { name: String, path: PathBuf },

    #[error("Runtime failed on '{script}': {} ({}){}", classify(.code), describe_code(.code), tail(.stderr))]
    RuntimeFailed {
        script: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Scenario '{0}' is not defined")]
    ScenarioNotFound(String),

    // === Test Errors ===
    #[error("Test assertion failed: {0}")]
    TestAssertion(String),

    #[error("{failed} of {total} scenarios failed")]
    SuiteFailed { failed: usize, total: usize },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Invalid scenario file '{path}': {error}")]
    ScenarioParse { path: String, error: String },

    // === IO Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a spawn error for the given program
    pub fn spawn(program: impl Into<String>, source: io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Create a file read error
    pub fn file_read(path: &std::path::Path, error: impl ToString) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Whether this error aborts the whole session rather than one scenario
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            Error::PrepareFailed { .. } | Error::RuntimeNotFound(_) | Error::SamplesDirNotFound(_)
        )
    }
}

/// Name the meaning of a clox exit status (sysexits convention)
pub fn classify_exit(code: Option<i32>) -> &'static str {
    match code {
        Some(64) => "usage error",
        Some(65) => "compile error",
        Some(70) => "runtime error",
        Some(74) => "I/O error",
        Some(_) => "unexpected exit",
        None => "terminated by signal",
    }
}

fn classify(code: &Option<i32>) -> &'static str {
    classify_exit(*code)
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code".to_string(),
    }
}

fn tail(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{}", trimmed)
    }
}
