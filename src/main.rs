//! loxcheck - acceptance tests for the clox interpreter
//!
//! Builds the interpreter, runs the sample corpus through it and checks
//! the trace each sample writes to stderr.

use clap::Parser;
use loxcheck::{cli, commands::Commands, common::logging};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loxcheck", about = "Acceptance tests for the clox interpreter")]
#[command(version, long_about = None)]
struct Cli {
    /// Project root (default: nearest directory with loxcheck.toml, else the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.command.verbose());

    if let Err(e) = cli::dispatch(cli.root.as_deref(), cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
