//! End-to-end tests for the preparer and the scenario runner
//!
//! These tests run the harness against the mock interpreter:
//! 1. Preparing a throwaway project (shell commands stand in for git/make)
//! 2. Running samples and capturing their stderr trace
//! 3. Checking outcomes, failure tiers and isolation between scenarios

mod common;

use common::{serial, TestProject};
use loxcheck::testing::{self, Expectation, Scenario};
use loxcheck::Error;

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

// ============== Scenario runner ==============

#[test]
fn test_builtin_corpus_passes() {
    let _guard = serial();
    let project = TestProject::new();
    let session = project.environment().prepare().unwrap();

    let mut seen = Vec::new();
    let report = testing::run_suite(&session, &Scenario::builtin(), |outcome| {
        seen.push(outcome.name.clone())
    });

    assert!(report.all_passed(), "{:#?}", report);
    assert_eq!(report.passed, 4);
    assert_eq!(
        seen,
        ["var_shadowing", "closure_counter", "implicit_semicolon", "fib"]
    );
}

#[test]
fn test_run_script_captures_stderr_lines() {
    let _guard = serial();
    let project = TestProject::new();
    let session = project.environment().prepare().unwrap();

    let result = testing::run_script(&session, "var_shadowing.lox").unwrap();
    assert_eq!(result.lines, owned(&["0", "1"]));
    assert_eq!(result.diagnostics, "0\n1\n");
    assert!(result.status.success());
    assert!(result.script.is_absolute());

    let result = testing::run_script(&session, "closure_counter.lox").unwrap();
    assert_eq!(result.lines, owned(&["0", "1", "2", "1", "0", "-1"]));
}

#[test]
fn test_stdout_is_not_part_of_the_trace() {
    let _guard = serial();
    let project = TestProject::new();
    let session = project.environment().prepare().unwrap();

    let result = testing::run_script(&session, "implicit_semicolon.lox").unwrap();
    assert_eq!(
        result.lines,
        owned(&["first item", "second item", "third item"])
    );
    assert_eq!(result.stdout.trim(), "not part of the trace");
}

#[test]
fn test_suffix_match_on_last_line() {
    let _guard = serial();
    let project = TestProject::new();
    let session = project.environment().prepare().unwrap();

    let result = testing::run_script(&session, "fib.lox").unwrap();
    assert_eq!(result.lines.len(), 15);
    assert!(result.lines.last().unwrap().ends_with("14 -> 377"));
    assert!(testing::check(
        &result.lines,
        &Expectation::LastLineEndsWith("13 -> 233".to_string())
    )
    .is_err());
}

#[test]
fn test_missing_sample_fails_the_scenario() {
    let _guard = serial();
    let project = TestProject::new();
    let session = project.environment().prepare().unwrap();

    let err = testing::run_script(&session, "nope.lox").unwrap_err();
    assert!(matches!(err, Error::SampleNotFound { ref name, .. } if name == "nope.lox"));
    assert!(!err.is_setup());
}

#[test]
fn test_nonzero_exit_fails_the_scenario() {
    let _guard = serial();
    let project = TestProject::new();
    let session = project.environment().prepare().unwrap();

    let err = testing::run_script(&session, "crash.lox").unwrap_err();
    match &err {
        Error::RuntimeFailed { script, code, stderr } => {
            assert_eq!(script, "crash.lox");
            assert_eq!(*code, Some(70));
            assert!(stderr.contains("Runtime Error: boom"));
        }
        other => panic!("Expected RuntimeFailed, got {:?}", other),
    }
    assert!(err.to_string().contains("runtime error"));
}

#[test]
fn test_failures_do_not_stop_the_suite() {
    let _guard = serial();
    let project = TestProject::new();
    let session = project.environment().prepare().unwrap();

    let scenarios = vec![
        Scenario::exact("crash", "crash.lox", &["partial"]),
        Scenario::exact("var_shadowing", "var_shadowing.lox", &["0", "1"]),
        Scenario::exact("missing", "missing.lox", &[]),
        Scenario::exact("wrong", "var_shadowing.lox", &["0", "2"]),
    ];
    let report = testing::run_suite(&session, &scenarios, |_| {});

    let passed: Vec<bool> = report.outcomes.iter().map(|o| o.passed).collect();
    assert_eq!(passed, [false, true, false, false]);
    assert_eq!(report.failed, 3);
    assert!(!report.all_passed());

    let wrong = &report.outcomes[3];
    assert_eq!(wrong.lines, owned(&["0", "1"]));
    let error = wrong.error.as_deref().unwrap();
    assert!(error.contains("Line 2"), "{}", error);
    assert!(report.outcomes[0].lines.is_empty());
}

#[test]
fn test_scenarios_are_isolated() {
    let _guard = serial();
    let project = TestProject::new();
    let session = project.environment().prepare().unwrap();

    let alone = testing::run_script(&session, "fib.lox").unwrap().lines;

    testing::run_script(&session, "closure_counter.lox").unwrap();
    let _ = testing::run_script(&session, "crash.lox");
    let after = testing::run_script(&session, "fib.lox").unwrap().lines;

    assert_eq!(alone, after);
}

#[test]
fn test_scenarios_from_yaml() {
    let _guard = serial();
    let project = TestProject::new();
    let file = project.write(
        "scenarios.yaml",
        r#"
scenarios:
  - name: shadowing
    sample: var_shadowing.lox
    expect:
      lines: ["0", "1"]
  - name: fib
    sample: fib.lox
    description: last number only
    expect:
      last_line_ends_with: "14 -> 377"
"#,
    );

    let scenarios = testing::load_scenarios(&file).unwrap();
    let session = project.environment().prepare().unwrap();
    let report = testing::run_suite(&session, &scenarios, |_| {});
    assert!(report.all_passed(), "{:#?}", report);
}

// ============== Environment preparer ==============

#[test]
fn test_missing_runtime_is_a_setup_error() {
    let project = TestProject::with_config(
        r#"
[paths]
runtime = "clox/build/bin/clox"

[prepare]
sync = ""
build = ""
"#,
    );

    let err = project.environment().prepare().unwrap_err();
    assert!(matches!(err, Error::RuntimeNotFound(_)));
    assert!(err.is_setup());
}

#[test]
fn test_attach_skips_prepare_steps() {
    let project = TestProject::with_prepare("exit 9", "exit 9");
    let session = project.environment().attach().unwrap();
    assert!(session.runtime().is_absolute());
    assert_eq!(session.sample_path("fib.lox"), session.samples_dir().join("fib.lox"));
}

#[cfg(unix)]
#[test]
fn test_session_paths_are_absolute_for_relative_root() {
    use std::path::{Component, PathBuf};

    let project = TestProject::new();
    let cwd = std::env::current_dir().unwrap();

    // Walk from the working directory up to `/`, then down into the project
    let mut relative = PathBuf::new();
    for _ in cwd.components().filter(|c| matches!(c, Component::Normal(_))) {
        relative.push("..");
    }
    relative.push(project.root().strip_prefix("/").unwrap());
    assert!(relative.is_relative());

    let config = loxcheck::common::config::Config::load(&relative).unwrap();
    let session = loxcheck::Environment::new(&relative, &config).attach().unwrap();

    assert!(session.root().is_absolute());
    assert!(session.samples_dir().is_absolute());
    let sample = session.sample_path("var_shadowing.lox");
    assert!(sample.is_absolute(), "{}", sample.display());
    assert!(sample.is_file());
}

#[cfg(unix)]
#[test]
fn test_prepare_runs_sync_then_build() {
    let _guard = serial();
    let project = TestProject::with_prepare("echo sync >> steps.log", "echo build >> steps.log");

    project.environment().prepare().unwrap();
    assert_eq!(project.read("steps.log").as_deref(), Some("sync\nbuild\n"));
}

#[cfg(unix)]
#[test]
fn test_sync_failure_aborts_before_build() {
    let _guard = serial();
    let project = TestProject::with_prepare("exit 3", "echo build >> steps.log");

    let err = project.environment().prepare().unwrap_err();
    match &err {
        Error::PrepareFailed { step, code, .. } => {
            assert_eq!(step, "sync");
            assert_eq!(*code, Some(3));
        }
        other => panic!("Expected PrepareFailed, got {:?}", other),
    }
    assert!(err.is_setup());
    assert!(project.read("steps.log").is_none());
}

#[cfg(unix)]
#[test]
fn test_build_failure_reports_tool_output() {
    let _guard = serial();
    let project = TestProject::with_prepare("true", "echo \"make: *** [all] Error 2\" >&2; exit 2");

    let err = project.environment().prepare().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("'build'"), "{}", message);
    assert!(message.contains("exit code 2"), "{}", message);
    assert!(message.contains("make: *** [all] Error 2"), "{}", message);
}

#[cfg(unix)]
#[test]
fn test_prepare_is_idempotent() {
    let _guard = serial();
    let project = TestProject::with_prepare("echo sync >> steps.log", "echo build >> steps.log");
    let env = project.environment();

    let once = env.prepare().unwrap();
    let first = testing::run_suite(&once, &Scenario::builtin(), |_| {});

    let twice = env.prepare().unwrap();
    let second = testing::run_suite(&twice, &Scenario::builtin(), |_| {});

    assert_eq!(once.runtime(), twice.runtime());
    let lines = |report: &testing::SuiteReport| -> Vec<Vec<String>> {
        report.outcomes.iter().map(|o| o.lines.clone()).collect()
    };
    assert_eq!(lines(&first), lines(&second));
    assert!(second.all_passed());
    assert_eq!(
        project.read("steps.log").as_deref(),
        Some("sync\nbuild\nsync\nbuild\n")
    );
}
