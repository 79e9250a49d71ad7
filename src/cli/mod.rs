//! CLI command handling
//!
//! Dispatches CLI commands to the preparer and the scenario runner and
//! formats their results for the terminal.

use std::path::{Path, PathBuf};
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::commands::Commands;
use crate::common::{Error, Result};
use crate::setup::{Environment, Session, StepEvent};
use crate::testing::{self, Scenario, ScenarioOutcome, SuiteReport};

/// Dispatch a CLI command
pub fn dispatch(root: Option<&Path>, command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            files,
            only,
            skip_prepare,
            verbose,
            json,
        } => {
            let scenarios = testing::select(load(&files)?, &only)?;
            let env = Environment::discover(root)?;
            let session = open_session(&env, skip_prepare, verbose, !json)?;

            if !json {
                println!("\n{}", "Scenarios:".cyan());
            }
            let report = testing::run_suite(&session, &scenarios, |outcome| {
                if !json {
                    print_outcome(outcome);
                }
            });

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_summary(&report);
            }

            if report.all_passed() {
                Ok(())
            } else {
                Err(Error::SuiteFailed {
                    failed: report.failed,
                    total: report.outcomes.len(),
                })
            }
        }

        Commands::Prepare { verbose } => {
            let env = Environment::discover(root)?;
            let session = open_session(&env, false, verbose, true)?;
            println!(
                "\nInterpreter ready: {}",
                session.runtime().display().to_string().bold()
            );
            Ok(())
        }

        Commands::Exec {
            sample,
            skip_prepare,
        } => {
            let env = Environment::discover(root)?;
            let session = open_session(&env, skip_prepare, false, false)?;
            let result = testing::run_script(&session, &sample)?;
            for line in &result.lines {
                println!("{}", line);
            }
            Ok(())
        }

        Commands::List { files } => {
            let scenarios = load(&files)?;
            if scenarios.is_empty() {
                println!("No scenarios defined");
                return Ok(());
            }

            println!("Scenarios:");
            for scenario in &scenarios {
                println!(
                    "  {:<24} {:<8} {}",
                    scenario.name,
                    scenario.expect.mode(),
                    scenario.sample.dimmed()
                );
                if let Some(desc) = &scenario.description {
                    println!("  {:<24} {}", "", desc.dimmed());
                }
            }
            Ok(())
        }
    }
}

/// Scenarios from the given files, or the built-in corpus
fn load(files: &[PathBuf]) -> Result<Vec<Scenario>> {
    if files.is_empty() {
        return Ok(Scenario::builtin());
    }

    let mut scenarios = Vec::new();
    for file in files {
        scenarios.extend(testing::load_scenarios(file)?);
    }
    Ok(scenarios)
}

/// Prepare the interpreter (or reuse the current build) and open a session
fn open_session(env: &Environment, skip_prepare: bool, verbose: bool, show: bool) -> Result<Session> {
    if skip_prepare {
        return env.attach();
    }

    if show {
        println!("{}", "Preparing:".cyan());
    }

    let mut spinner: Option<ProgressBar> = None;
    let result = env.prepare_with(verbose, |event| match event {
        StepEvent::Started { kind, command } => {
            if verbose {
                println!("  $ {}", command.dimmed());
            } else if show {
                spinner = Some(start_spinner(format!("{} {}", kind.name(), command)));
            }
        }
        StepEvent::Finished { kind } => {
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
            if show {
                println!("  {} {}", "✓".green(), kind.name());
            }
        }
        StepEvent::Skipped { kind } => {
            if show {
                println!("  {} {} {}", "-".dimmed(), kind.name(), "(disabled)".dimmed());
            }
        }
    });

    if let Some(pb) = spinner.take() {
        pb.finish_and_clear();
    }

    result
}

fn start_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_outcome(outcome: &ScenarioOutcome) {
    match &outcome.error {
        None => println!("  {} {}", "✓".green(), outcome.name),
        Some(error) => {
            println!("  {} {}", "✗".red(), outcome.name.bold());
            for line in error.lines() {
                println!("      {}", line);
            }
        }
    }
}

fn print_summary(report: &SuiteReport) {
    let failed = if report.failed > 0 {
        format!("{} failed", report.failed).red().bold()
    } else {
        format!("{} failed", report.failed).normal()
    };
    println!(
        "\n{} {}, {}\n",
        "Result:".bold(),
        format!("{} passed", report.passed).green(),
        failed
    );
}
