//! Error types for the build pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for build operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors that abort a build.
///
/// Configuration overlay problems are not represented here; they are
/// downgraded to warnings (see [`crate::config::load_overlay`]).
#[derive(Debug, Error)]
pub enum BuildError {
    /// No package version was given.
    #[error("Package version is required. Use --version argument.")]
    MissingVersion,

    /// The package name is empty.
    #[error("Package name could not be determined. Use --name argument.")]
    MissingName,

    /// The version does not start with `MAJOR.MINOR.PATCH`.
    #[error("Invalid version format: {0}. Expected format: MAJOR.MINOR.PATCH (e.g., 1.2.3)")]
    InvalidVersion(String),

    /// The `local/` directory is missing.
    #[error(
        "Local directory not found: {}. This must be run from a Checkmk plugin project directory.",
        .0.display()
    )]
    ProjectRootNotFound(PathBuf),

    /// One or more source files failed the syntax check.
    #[error("Found {count} Python syntax error(s)")]
    SyntaxCheck { count: usize },

    /// The syntax checker could not be run.
    #[error("syntax checker unavailable: {0}")]
    SyntaxCheckerUnavailable(String),

    /// Failed to create directory.
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDirectoryFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read a file or directory.
    #[error("failed to read {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write a file.
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to add an entry to, or finish, an archive.
    #[error("archive {} failed: {source}", .path.display())]
    ArchiveFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The temporary build workspace could not be created.
    #[error("failed to create build workspace: {0}")]
    Workspace(#[source] io::Error),

    /// Manifest serialization failed.
    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// The build was interrupted by the user.
    #[error("Build interrupted by user")]
    Interrupted,
}

impl BuildError {
    /// Whether this error was raised by parameter or syntax validation,
    /// i.e. before any archive was produced.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BuildError::MissingVersion
                | BuildError::MissingName
                | BuildError::InvalidVersion(_)
                | BuildError::ProjectRootNotFound(_)
                | BuildError::SyntaxCheck { .. }
                | BuildError::SyntaxCheckerUnavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invalid_version_display() {
        let err = BuildError::InvalidVersion("1.2".to_string());
        assert!(err.to_string().contains("1.2"));
        assert!(err.to_string().contains("MAJOR.MINOR.PATCH"));
    }

    #[test]
    fn test_project_root_not_found_display() {
        let err = BuildError::ProjectRootNotFound(PathBuf::from("/test/local"));
        assert!(err.to_string().contains("/test/local"));
    }

    #[test]
    fn test_syntax_check_display() {
        let err = BuildError::SyntaxCheck { count: 3 };
        assert_eq!(err.to_string(), "Found 3 Python syntax error(s)");
    }

    #[test]
    fn test_error_source_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = BuildError::ReadFailed {
            path: PathBuf::from("/test"),
            source: io_err,
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/test"));
    }

    #[test]
    fn test_error_source_none() {
        let err = BuildError::MissingVersion;
        assert!(err.source().is_none());
    }

    #[test]
    fn test_is_validation() {
        assert!(BuildError::MissingName.is_validation());
        assert!(BuildError::SyntaxCheck { count: 1 }.is_validation());
        assert!(!BuildError::Interrupted.is_validation());
        assert!(!BuildError::Workspace(io::Error::other("boom")).is_validation());
    }
}
