//! CLI command definitions
//!
//! Defines the clap commands for loxcheck.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Prepare the interpreter, then run scenarios one by one
    Run {
        /// YAML scenario file(s); the built-in corpus is used when omitted
        #[arg(long = "file", short = 'f')]
        files: Vec<PathBuf>,

        /// Only run the named scenario(s)
        #[arg(long)]
        only: Vec<String>,

        /// Use the existing interpreter build instead of preparing
        #[arg(long)]
        skip_prepare: bool,

        /// Show prepare step output and debug logs
        #[arg(long, short)]
        verbose: bool,

        /// Print the suite report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Synchronize dependencies and build the interpreter
    Prepare {
        /// Show prepare step output and debug logs
        #[arg(long, short)]
        verbose: bool,
    },

    /// Run a single sample and print its diagnostic lines
    Exec {
        /// Sample file name inside the samples directory
        sample: String,

        /// Use the existing interpreter build instead of preparing
        #[arg(long)]
        skip_prepare: bool,
    },

    /// List scenarios and their match mode
    List {
        /// YAML scenario file(s); the built-in corpus is used when omitted
        #[arg(long = "file", short = 'f')]
        files: Vec<PathBuf>,
    },
}

impl Commands {
    /// Whether the command asked for verbose output
    pub fn verbose(&self) -> bool {
        match self {
            Commands::Run { verbose, .. } | Commands::Prepare { verbose } => *verbose,
            _ => false,
        }
    }
}
