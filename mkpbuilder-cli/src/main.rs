//! mkp-builder - Command-line interface
//!
//! Builds a Checkmk MKP package from the `local/` tree of the current
//! directory. Command line values override the `.mkp-builder.ini` overlay,
//! which overrides built-in defaults.

mod commands;
mod error;
mod runner;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use commands::build::{self, BuildArgs};

const EXAMPLES: &str = "\
Examples:
  mkp-builder --version 1.2.3
  mkp-builder --version 1.2.3 --author \"John Doe <john@example.com>\"
  mkp-builder --version 1.2.3 --output-dir dist/ --verbose

Configuration:
  Default values are loaded from .mkp-builder.ini if it exists.
  Command line arguments override config file values.";

/// Checkmk MKP package builder
#[derive(Parser)]
#[command(name = "mkp-builder", after_help = EXAMPLES)]
struct Cli {
    #[command(flatten)]
    build: BuildArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = mkpbuilder::logging::init_logging(cli.build.verbose) {
        eprintln!("Warning: {}", e);
    }

    match build::run(cli.build) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
