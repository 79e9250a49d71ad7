//! Configuration file handling
//!
//! `loxcheck.toml` is optional. Without it the harness uses the layout of
//! the lox repository: `samples/` for the corpus, `clox/build/bin/clox`
//! for the interpreter, and `git submodule update --init` followed by
//! `make -C clox` to prepare it.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Runtime and corpus locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Commands run by the environment preparer
    #[serde(default)]
    pub prepare: PrepareConfig,
}

/// Runtime and corpus locations, relative to the project root
#[derive(Debug, Deserialize)]
pub struct PathsConfig {
    /// Interpreter binary produced by the build step
    #[serde(default = "default_runtime")]
    pub runtime: PathBuf,

    /// Directory holding the `.lox` sample programs
    #[serde(default = "default_samples")]
    pub samples: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            samples: default_samples(),
        }
    }
}

fn default_runtime() -> PathBuf {
    PathBuf::from("clox/build/bin/clox")
}

fn default_samples() -> PathBuf {
    PathBuf::from("samples")
}

/// Shell commands for the two prepare steps
///
/// An empty command disables its step.
#[derive(Debug, Deserialize)]
pub struct PrepareConfig {
    /// Fetches vendored sources
    #[serde(default = "default_sync")]
    pub sync: String,

    /// Builds the interpreter
    #[serde(default = "default_build")]
    pub build: String,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            sync: default_sync(),
            build: default_build(),
        }
    }
}

fn default_sync() -> String {
    "git submodule update --init".to_string()
}

fn default_build() -> String {
    "make -C clox".to_string()
}

impl Config {
    /// Load configuration for a project root
    ///
    /// Returns default configuration if the file doesn't exist
    pub fn load(root: &Path) -> Result<Self> {
        let path = config_path(root);
        if path.exists() {
            let content =
                std::fs::read_to_string(&path).map_err(|e| super::Error::file_read(&path, e))?;
            return Self::parse(&content);
        }
        Ok(Self::default())
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}
