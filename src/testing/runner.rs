//! Scenario runner implementation
//!
//! Runs a sample program through the prepared interpreter and compares its
//! diagnostic stream against the scenario's expectation. clox prints its
//! trace on stderr, so stderr is the channel under test and stdout is only
//! kept for reference.

use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use serde::Serialize;

use crate::common::{last_lines, Error, Result};
use crate::setup::Session;

use super::config::{Expectation, Scenario};

/// Number of stderr lines kept when the runtime exits non-zero
const FAILURE_TAIL_LINES: usize = 20;

/// Everything observed from one run of the interpreter
#[derive(Debug)]
pub struct ExecutionResult {
    /// Absolute path of the script that was run
    pub script: PathBuf,
    /// Raw stderr text. This is the channel scenarios are checked against.
    pub diagnostics: String,
    /// Raw stdout text, never compared
    pub stdout: String,
    /// `diagnostics` normalized into trimmed lines, in emission order
    pub lines: Vec<String>,
    /// Exit status of the interpreter
    pub status: ExitStatus,
}

/// Split captured output into trimmed lines
///
/// Surrounding whitespace of the whole text is dropped first so a trailing
/// newline does not produce an empty last line. Blank lines in the middle
/// are kept as empty strings.
pub fn split_lines(text: &str) -> Vec<String> {
    text.trim()
        .lines()
        .map(|line| line.trim().to_string())
        .collect()
}

/// Run the sample `name` and capture its output
///
/// A missing sample and a non-zero exit status are both errors; the
/// harness does not model runs that are expected to fail.
pub fn run_script(session: &Session, name: &str) -> Result<ExecutionResult> {
    let script = session.sample_path(name);
    if !script.is_file() {
        return Err(Error::SampleNotFound {
            name: name.to_string(),
            path: script,
        });
    }

    tracing::debug!(
        runtime = %session.runtime().display(),
        script = %script.display(),
        "Running sample"
    );

    let output = Command::new(session.runtime())
        .arg(&script)
        .current_dir(session.root())
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::spawn(session.runtime().display().to_string(), e))?;

    let diagnostics = String::from_utf8_lossy(&output.stderr).into_owned();
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

    if !output.status.success() {
        return Err(Error::RuntimeFailed {
            script: name.to_string(),
            code: output.status.code(),
            stderr: last_lines(&diagnostics, FAILURE_TAIL_LINES),
        });
    }

    Ok(ExecutionResult {
        script,
        lines: split_lines(&diagnostics),
        diagnostics,
        stdout,
        status: output.status,
    })
}

/// Compare captured lines against an expectation
pub fn check(lines: &[String], expect: &Expectation) -> Result<()> {
    match expect {
        Expectation::Lines(expected) => check_exact(lines, expected),
        Expectation::LastLineEndsWith(suffix) => check_suffix(lines, suffix),
    }
}

fn check_exact(lines: &[String], expected: &[String]) -> Result<()> {
    if lines == expected {
        return Ok(());
    }

    let index = lines
        .iter()
        .zip(expected)
        .position(|(actual, expected)| actual != expected)
        .unwrap_or_else(|| lines.len().min(expected.len()));

    Err(Error::TestAssertion(format!(
        "Line {}: expected {:?}, got {:?} (expected {} lines, got {})\nOutput: {:?}",
        index + 1,
        expected.get(index).map(String::as_str).unwrap_or("<end of output>"),
        lines.get(index).map(String::as_str).unwrap_or("<end of output>"),
        expected.len(),
        lines.len(),
        lines
    )))
}

fn check_suffix(lines: &[String], suffix: &str) -> Result<()> {
    match lines.last() {
        Some(last) if last.ends_with(suffix) => Ok(()),
        Some(last) => Err(Error::TestAssertion(format!(
            "Expected last line to end with {:?}, got {:?}",
            suffix, last
        ))),
        None => Err(Error::TestAssertion(format!(
            "Expected last line to end with {:?}, but the sample produced no output",
            suffix
        ))),
    }
}

/// Result of one scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub sample: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Captured lines, empty when the sample never ran to completion
    pub lines: Vec<String>,
}

/// Run one scenario to a pass/fail outcome
pub fn run_scenario(session: &Session, scenario: &Scenario) -> ScenarioOutcome {
    let (lines, verdict) = match run_script(session, &scenario.sample) {
        Ok(result) => {
            let verdict = check(&result.lines, &scenario.expect);
            (result.lines, verdict)
        }
        Err(e) => (Vec::new(), Err(e)),
    };

    if let Err(e) = &verdict {
        tracing::debug!(scenario = %scenario.name, error = %e, "Scenario failed");
    }

    ScenarioOutcome {
        name: scenario.name.clone(),
        sample: scenario.sample.clone(),
        passed: verdict.is_ok(),
        error: verdict.err().map(|e| e.to_string()),
        lines,
    }
}

/// Outcomes of a whole suite, in execution order
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub passed: usize,
    pub failed: usize,
    pub outcomes: Vec<ScenarioOutcome>,
}

impl SuiteReport {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Run scenarios one after another
///
/// A failing scenario never stops the ones after it. `on_outcome` sees each
/// outcome as soon as its scenario finishes.
pub fn run_suite<F>(session: &Session, scenarios: &[Scenario], mut on_outcome: F) -> SuiteReport
where
    F: FnMut(&ScenarioOutcome),
{
    let mut outcomes = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        let outcome = run_scenario(session, scenario);
        on_outcome(&outcome);
        outcomes.push(outcome);
    }

    let passed = outcomes.iter().filter(|o| o.passed).count();
    SuiteReport {
        passed,
        failed: outcomes.len() - passed,
        outcomes,
    }
}
