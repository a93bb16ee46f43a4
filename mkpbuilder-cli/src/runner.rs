//! Shared CLI setup: working directory, configuration overlay and the
//! Ctrl-C handler.

use std::env;
use std::path::{Path, PathBuf};

use mkpbuilder::builder::InterruptFlag;
use mkpbuilder::config::{load_overlay, PackageSettings};
use tracing::debug;

use crate::error::CliError;

/// Holds the state every command needs before it starts working.
pub struct CliRunner {
    work_dir: PathBuf,
    interrupt: InterruptFlag,
}

impl CliRunner {
    /// Create a runner for the current working directory.
    pub fn new() -> Result<Self, CliError> {
        let work_dir = env::current_dir().map_err(CliError::WorkingDirectory)?;
        Ok(Self::with_work_dir(work_dir))
    }

    /// Create a runner for an explicit working directory.
    pub fn with_work_dir(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            interrupt: InterruptFlag::new(),
        }
    }

    /// Log version information.
    pub fn log_startup(&self, command: &str) {
        debug!(
            "mkp-builder v{} ({}) in {}",
            mkpbuilder::VERSION,
            command,
            self.work_dir.display()
        );
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Load the configuration overlay, from `explicit` or by discovery.
    pub fn load_overlay(&self, explicit: Option<&Path>) -> Option<PackageSettings> {
        load_overlay(&self.work_dir, explicit)
    }

    /// Route Ctrl-C to the interrupt flag.
    pub fn install_interrupt_handler(&self) -> Result<(), CliError> {
        let flag = self.interrupt.clone();
        ctrlc::set_handler(move || flag.raise())
            .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))
    }

    pub fn interrupt(&self) -> InterruptFlag {
        self.interrupt.clone()
    }
}
