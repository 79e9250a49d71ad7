//! Scenario definitions
//!
//! A scenario pairs a sample program with the diagnostic output it must
//! produce. Scenarios come from the built-in corpus or from YAML files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::common::{Error, Result};

/// A single scenario: one sample program and its expected outcome
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Name of the scenario, used in reports
    pub name: String,
    /// File name of the sample, relative to the samples directory
    pub sample: String,
    /// Optional description of what the scenario verifies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Expected diagnostic output, written as a one-key map
    /// (`lines: [...]` or `last_line_ends_with: "..."`)
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub expect: Expectation,
}

/// Expected diagnostic output of a sample
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// The full sequence of lines, in order
    Lines(Vec<String>),
    /// The last line must end with this text
    LastLineEndsWith(String),
}

impl Expectation {
    /// Short label for the match mode
    pub fn mode(&self) -> &'static str {
        match self {
            Expectation::Lines(_) => "exact",
            Expectation::LastLineEndsWith(_) => "suffix",
        }
    }
}

/// A YAML scenario file
#[derive(Deserialize, Serialize, Debug)]
pub struct ScenarioFile {
    pub scenarios: Vec<Scenario>,
}

impl Scenario {
    /// Scenario expecting exactly `lines`
    pub fn exact(name: &str, sample: &str, lines: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            sample: sample.to_string(),
            description: None,
            expect: Expectation::Lines(lines.iter().map(|s| s.to_string()).collect()),
        }
    }

    /// Scenario expecting the last line to end with `suffix`
    pub fn suffix(name: &str, sample: &str, suffix: &str) -> Self {
        Self {
            name: name.to_string(),
            sample: sample.to_string(),
            description: None,
            expect: Expectation::LastLineEndsWith(suffix.to_string()),
        }
    }

    fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// The scenarios shipped with the lox sample corpus
    pub fn builtin() -> Vec<Scenario> {
        vec![
            Scenario::exact("var_shadowing", "var_shadowing.lox", &["0", "1"])
                .describe("Inner declarations shadow outer ones until their block ends"),
            Scenario::exact(
                "closure_counter",
                "closure_counter.lox",
                &["0", "1", "2", "1", "0", "-1"],
            )
            .describe("Closures share one captured counter"),
            Scenario::exact(
                "implicit_semicolon",
                "implicit_semicolon.lox",
                &["first item", "second item", "third item"],
            )
            .describe("Newlines terminate statements"),
            Scenario::suffix("fib", "fib.lox", "14 -> 377")
                .describe("Fibonacci table ends at the 14th number"),
        ]
    }
}

/// Load scenarios from a YAML file
pub fn load_scenarios(path: &Path) -> Result<Vec<Scenario>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
    parse_scenarios(&content).map_err(|e| match e {
        Error::ScenarioParse { error, .. } => Error::ScenarioParse {
            path: path.display().to_string(),
            error,
        },
        other => other,
    })
}

/// Parse scenarios from YAML text
pub fn parse_scenarios(content: &str) -> Result<Vec<Scenario>> {
    let file: ScenarioFile = serde_yaml::from_str(content).map_err(|e| Error::ScenarioParse {
        path: "<inline>".to_string(),
        error: e.to_string(),
    })?;
    Ok(file.scenarios)
}

/// Keep only the scenarios named in `only`, in the order they were defined
///
/// An empty filter keeps everything. Naming an unknown scenario is an error.
pub fn select(scenarios: Vec<Scenario>, only: &[String]) -> Result<Vec<Scenario>> {
    if let Some(missing) = only
        .iter()
        .find(|name| !scenarios.iter().any(|s| &s.name == *name))
    {
        return Err(Error::ScenarioNotFound(missing.clone()));
    }

    if only.is_empty() {
        return Ok(scenarios);
    }

    Ok(scenarios
        .into_iter()
        .filter(|s| only.contains(&s.name))
        .collect())
}
