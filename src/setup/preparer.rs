//! Environment preparation
//!
//! Brings the interpreter up to date before any scenario runs: first the
//! vendored sources are synchronized, then the interpreter is built. Both
//! steps are opaque shell commands; all the harness observes is whether
//! they exit successfully.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::common::config::Config;
use crate::common::{last_lines, paths, Error, Result};

/// Number of stderr lines kept when a prepare step fails
const FAILURE_TAIL_LINES: usize = 20;

/// One of the two delegated prepare steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Fetch vendored sources
    Sync,
    /// Build the interpreter
    Build,
}

impl StepKind {
    pub fn name(self) -> &'static str {
        match self {
            StepKind::Sync => "sync",
            StepKind::Build => "build",
        }
    }
}

/// Progress notifications emitted while preparing
#[derive(Debug, Clone, Copy)]
pub enum StepEvent<'a> {
    Started { kind: StepKind, command: &'a str },
    Finished { kind: StepKind },
    Skipped { kind: StepKind },
}

/// The project layout and prepare commands, before anything has run
#[derive(Debug, Clone)]
pub struct Environment {
    root: PathBuf,
    runtime: PathBuf,
    samples_dir: PathBuf,
    sync: String,
    build: String,
}

impl Environment {
    /// Build an environment from a project root and its configuration
    pub fn new(root: impl Into<PathBuf>, config: &Config) -> Self {
        let root = root.into();
        Self {
            runtime: paths::resolve_runtime(&root, &config.paths.runtime),
            samples_dir: paths::anchor(&root, &config.paths.samples),
            sync: config.prepare.sync.trim().to_string(),
            build: config.prepare.build.trim().to_string(),
            root,
        }
    }

    /// Locate the project root and load its `loxcheck.toml`
    pub fn discover(root: Option<&Path>) -> Result<Self> {
        let root = paths::project_root(root)
            .map_err(|e| Error::Config(format!("Cannot resolve project root: {}", e)))?;
        let config = Config::load(&root)?;
        tracing::debug!(root = %root.display(), "Loaded project configuration");
        Ok(Self::new(root, &config))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn runtime(&self) -> &Path {
        &self.runtime
    }

    pub fn samples_dir(&self) -> &Path {
        &self.samples_dir
    }

    /// The configured command for a step (empty when disabled)
    pub fn command(&self, kind: StepKind) -> &str {
        match kind {
            StepKind::Sync => &self.sync,
            StepKind::Build => &self.build,
        }
    }

    /// Synchronize dependencies, build the interpreter and open a session
    ///
    /// Idempotent as long as the delegated tools are. The first failing
    /// step aborts preparation; later steps are not started.
    pub fn prepare(&self) -> Result<Session> {
        self.prepare_with(false, |_| {})
    }

    /// Like [`prepare`](Self::prepare), reporting step progress
    ///
    /// With `verbose` the steps write straight to the terminal; otherwise
    /// their output is captured and only surfaced on failure.
    pub fn prepare_with<F>(&self, verbose: bool, mut progress: F) -> Result<Session>
    where
        F: FnMut(StepEvent<'_>),
    {
        for kind in [StepKind::Sync, StepKind::Build] {
            let command = self.command(kind);
            if command.is_empty() {
                tracing::warn!(step = kind.name(), "Prepare step disabled");
                progress(StepEvent::Skipped { kind });
                continue;
            }

            progress(StepEvent::Started { kind, command });
            run_step(&self.root, kind, command, verbose)?;
            progress(StepEvent::Finished { kind });
            tracing::info!(step = kind.name(), "Prepare step finished");
        }

        self.attach()
    }

    /// Open a session against the current build without running any step
    pub fn attach(&self) -> Result<Session> {
        let runtime = self
            .runtime
            .canonicalize()
            .ok()
            .filter(|path| path.is_file())
            .ok_or_else(|| Error::RuntimeNotFound(self.runtime.clone()))?;

        let samples_dir = self
            .samples_dir
            .canonicalize()
            .ok()
            .filter(|path| path.is_dir())
            .ok_or_else(|| Error::SamplesDirNotFound(self.samples_dir.clone()))?;

        let root = self
            .root
            .canonicalize()
            .map_err(|e| Error::Config(format!("Cannot resolve project root: {}", e)))?;

        Ok(Session {
            root,
            runtime,
            samples_dir,
        })
    }
}

/// Run one prepare step through the platform shell
fn run_step(root: &Path, kind: StepKind, command: &str, verbose: bool) -> Result<()> {
    tracing::debug!(step = kind.name(), command, "Running prepare step");

    let mut cmd = if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    };
    cmd.current_dir(root).stdin(Stdio::null());

    let (status, stderr) = if verbose {
        let status = cmd
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Error::spawn(command, e))?;
        (status, String::new())
    } else {
        let output = cmd.output().map_err(|e| Error::spawn(command, e))?;
        (
            output.status,
            last_lines(&String::from_utf8_lossy(&output.stderr), FAILURE_TAIL_LINES),
        )
    };

    if !status.success() {
        return Err(Error::PrepareFailed {
            step: kind.name().to_string(),
            command: command.to_string(),
            code: status.code(),
            stderr,
        });
    }

    Ok(())
}

/// A prepared interpreter and its sample corpus
///
/// Produced once per test session and shared read-only by every scenario.
#[derive(Debug, Clone)]
pub struct Session {
    root: PathBuf,
    runtime: PathBuf,
    samples_dir: PathBuf,
}

impl Session {
    /// Project root, used as the working directory of every run
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the interpreter binary
    pub fn runtime(&self) -> &Path {
        &self.runtime
    }

    pub fn samples_dir(&self) -> &Path {
        &self.samples_dir
    }

    /// Path a sample name resolves to (the file may not exist)
    pub fn sample_path(&self, name: &str) -> PathBuf {
        self.samples_dir.join(name)
    }
}
