//! Syntax validation of package sources.
//!
//! Before anything is packaged, every source file below `local/` with the
//! configured extension is parsed (never executed). Failures are logged
//! one by one with file and line, then reported as a single aggregate
//! [`BuildError::SyntaxCheck`].
//!
//! Parsing is delegated to a [`SyntaxChecker`]. The production checker,
//! [`PythonSyntaxChecker`], runs the system `python3` once per batch.

mod python;

pub use python::PythonSyntaxChecker;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::builder::{BuildError, BuildResult};

/// A syntax error found in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    /// File that failed to parse.
    pub path: PathBuf,

    /// 1-based line number, or 0 when the file could not be read at all.
    pub line: usize,

    /// Parser message.
    pub message: String,
}

impl fmt::Display for SyntaxIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.path.display(), self.line, self.message)
    }
}

/// Parses source files for syntax errors only.
pub trait SyntaxChecker {
    /// Check a batch of files, returning every issue found.
    ///
    /// An `Err` means the checker itself could not run.
    fn check(&self, files: &[PathBuf]) -> BuildResult<Vec<SyntaxIssue>>;
}

/// Result of a successful validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// All files parsed.
    Passed { files: usize },
    /// No matching files were found.
    NoFiles,
}

/// Find all files with `extension` below `root`, in file name order.
pub fn find_sources(root: &Path, extension: &str) -> BuildResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| BuildError::ReadFailed {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf()),
            source: e.into(),
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension) {
            sources.push(entry.into_path());
        }
    }
    Ok(sources)
}

/// Syntax-check every matching source below `root`.
///
/// Zero matching files is a success with a warning. Any syntax error fails
/// with the number of failing files after each issue has been logged.
pub fn validate_sources(
    root: &Path,
    extension: &str,
    checker: &dyn SyntaxChecker,
) -> BuildResult<ValidationOutcome> {
    info!("Validating Python files...");

    let sources = find_sources(root, extension)?;
    if sources.is_empty() {
        warn!("No Python files found to validate");
        return Ok(ValidationOutcome::NoFiles);
    }

    for source in &sources {
        debug!("Validating: {}", source.display());
    }

    let issues = checker.check(&sources)?;
    if !issues.is_empty() {
        for issue in &issues {
            error!("Python syntax error in {}", issue);
        }
        return Err(BuildError::SyntaxCheck {
            count: issues.len(),
        });
    }

    info!("All Python files validated successfully");
    Ok(ValidationOutcome::Passed {
        files: sources.len(),
    })
}
