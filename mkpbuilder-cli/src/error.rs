//! CLI error types.

use std::io;

use mkpbuilder::builder::BuildError;
use thiserror::Error;

/// Exit status for a failed build.
pub const EXIT_FAILURE: u8 = 1;

/// Exit status for a build interrupted by the user.
pub const EXIT_INTERRUPTED: u8 = 130;

/// Errors reported by the command line front end.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to determine working directory: {0}")]
    WorkingDirectory(#[source] io::Error),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Build(BuildError::Interrupted) => EXIT_INTERRUPTED,
            _ => EXIT_FAILURE,
        }
    }
}
