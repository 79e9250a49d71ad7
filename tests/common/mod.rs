//! Shared fixtures for the integration tests
//!
//! Each test gets a throwaway project root whose `loxcheck.toml` points the
//! harness at the `mock_runtime` binary instead of a real clox build.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use loxcheck::Environment;
use tempfile::TempDir;

static SERIAL: Mutex<()> = Mutex::new(());

/// Run process-spawning tests one at a time
pub fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// Path to the mock interpreter built alongside the tests
pub fn mock_runtime() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mock_runtime"))
}

/// A temporary lox project
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// Project with both prepare steps disabled
    pub fn new() -> Self {
        Self::with_prepare("", "")
    }

    /// Project with the given sync and build commands
    pub fn with_prepare(sync: &str, build: &str) -> Self {
        Self::with_config(&format!(
            r#"
[paths]
runtime = '{runtime}'
samples = "samples"

[prepare]
sync = '{sync}'
build = '{build}'
"#,
            runtime = mock_runtime().display(),
            sync = sync,
            build = build,
        ))
    }

    /// Project with a hand-written `loxcheck.toml`
    pub fn with_config(config: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("samples")).expect("Failed to create samples dir");
        fs::write(dir.path().join("loxcheck.toml"), config).expect("Failed to write config");

        let project = Self { dir };
        project.add_corpus();
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a sample program
    pub fn add_sample(&self, name: &str, source: &str) {
        fs::write(self.root().join("samples").join(name), source).expect("Failed to write sample");
    }

    /// Write an arbitrary file relative to the root
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(name);
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Read a file relative to the root, if it exists
    pub fn read(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.root().join(name)).ok()
    }

    pub fn environment(&self) -> Environment {
        Environment::discover(Some(self.root())).expect("Failed to load environment")
    }

    /// Samples whose mock output matches the built-in scenarios
    fn add_corpus(&self) {
        self.add_sample("var_shadowing.lox", "0\n1\n");
        self.add_sample("closure_counter.lox", "0\n1\n2\n1\n0\n-1\n");
        self.add_sample(
            "implicit_semicolon.lox",
            "  first item\nsecond item  \n#!stdout not part of the trace\n\tthird item\n",
        );

        let mut fib = String::new();
        let (mut a, mut b) = (0u64, 1u64);
        for n in 0..=14 {
            fib.push_str(&format!("{} -> {}\n", n, a));
            (a, b) = (b, a + b);
        }
        self.add_sample("fib.lox", &fib);

        self.add_sample("crash.lox", "partial\nRuntime Error: boom\n#!exit 70\n");
    }
}
