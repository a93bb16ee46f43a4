//! Build pipeline orchestration.
//!
//! [`PackageBuilder`] drives one build through its stages:
//!
//! ```text
//! Validate → Collect → Archive(sections) → GenerateMetadata → Assemble → Done
//! ```
//!
//! Parameter and syntax validation run before any workspace or output file
//! exists. All intermediates live in a temporary workspace that is removed
//! when the build ends, successfully or not. The [`InterruptFlag`] is
//! checked between stages.

mod error;

pub use error::{BuildError, BuildResult};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tempfile::TempDir;
use tracing::{debug, info};

use crate::archive::{assemble_package, list_entries, write_section_archives};
use crate::collector::FileCollector;
use crate::config::{format_size, BuildConfiguration};
use crate::manifest::Manifest;
use crate::package::{
    is_valid_version, package_filename, FileGroups, PackageIdentity, VersionInfo,
};
use crate::validator::{validate_sources, PythonSyntaxChecker, SyntaxChecker};

/// Shared cancellation flag, raised from a signal handler.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub(crate) fn check(&self) -> BuildResult<()> {
        if self.is_raised() {
            Err(BuildError::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// Outcome of a successful build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Package name.
    pub name: String,

    /// Package version.
    pub version: String,

    /// Location of the package file.
    pub path: std::path::PathBuf,

    /// Package file size in bytes.
    pub size: u64,

    /// Top-level entries of the package, in archive order.
    pub entries: Vec<String>,

    /// Files packaged per section.
    pub files: FileGroups,
}

impl BuildReport {
    /// Package size formatted for display (e.g. `12K`).
    pub fn size_human(&self) -> String {
        format_size(self.size)
    }
}

/// Check the required parameters and the project layout.
///
/// Runs before anything is written. Returns the package identity and
/// version information the rest of the build uses.
pub fn validate_parameters(
    config: &BuildConfiguration,
) -> BuildResult<(PackageIdentity, VersionInfo)> {
    let version = config
        .version
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(BuildError::MissingVersion)?;

    if config.name.is_empty() {
        return Err(BuildError::MissingName);
    }

    if !is_valid_version(version) {
        return Err(BuildError::InvalidVersion(version.to_string()));
    }

    let local_dir = config.local_dir();
    if !local_dir.is_dir() {
        return Err(BuildError::ProjectRootNotFound(local_dir));
    }

    let identity = PackageIdentity::new(&config.name)
        .with_title(&config.title)
        .with_author(&config.author)
        .with_description(&config.description)
        .with_download_url(&config.download_url);

    let version_info = VersionInfo::new(version)
        .with_min_required(&config.version_min_required)
        .with_packaged(&config.version_packaged)
        .with_usable_until(config.version_usable_until.clone());

    Ok((identity, version_info))
}

/// Builds one MKP package from a resolved configuration.
pub struct PackageBuilder {
    config: BuildConfiguration,
    interrupt: InterruptFlag,
    checker: Box<dyn SyntaxChecker>,
}

impl PackageBuilder {
    /// Create a builder using the system Python for syntax checks.
    pub fn new(config: BuildConfiguration, interrupt: InterruptFlag) -> Self {
        Self {
            config,
            interrupt,
            checker: Box::new(PythonSyntaxChecker::new()),
        }
    }

    /// Use a different syntax checker.
    pub fn with_checker(mut self, checker: Box<dyn SyntaxChecker>) -> Self {
        self.checker = checker;
        self
    }

    pub fn config(&self) -> &BuildConfiguration {
        &self.config
    }

    /// Run the build.
    pub fn build(&self) -> BuildResult<BuildReport> {
        let config = &self.config;
        let (identity, version) = validate_parameters(config)?;

        info!(
            "Building MKP package: {} v{}",
            identity.name, version.version
        );

        self.interrupt.check()?;
        if config.validate_sources {
            let outcome = validate_sources(
                &config.local_dir(),
                &config.source_extension,
                self.checker.as_ref(),
            );
            // Ctrl-C also kills the checker process; report the interrupt.
            self.interrupt.check()?;
            outcome?;
        } else {
            info!("Skipping Python validation");
        }

        self.interrupt.check()?;
        let workspace = TempDir::new().map_err(BuildError::Workspace)?;
        debug!("Build workspace: {}", workspace.path().display());

        let files = FileCollector::new(config.root(), &identity.name)
            .with_excluded_dirs(config.excluded_dirs.clone())
            .collect()?;
        for (section, group) in files.iter() {
            info!("Found {} file(s) for {}", group.len(), section);
        }

        self.interrupt.check()?;
        write_section_archives(config.root(), &files, workspace.path())?;

        self.interrupt.check()?;
        let manifest = Manifest::new(identity, version, files);
        manifest.write_to(workspace.path())?;

        self.interrupt.check()?;
        let filename = package_filename(
            &manifest.identity.name,
            &manifest.version.version,
            &config.package_extension,
        );
        let package = assemble_package(
            workspace.path(),
            &config.output_dir,
            &filename,
            &self.interrupt,
        )?;

        if config.verbose {
            info!("Package contents:");
            for entry in list_entries(&package.path)? {
                info!("  {}", entry);
            }
        }

        let Manifest {
            identity,
            version,
            files,
        } = manifest;

        Ok(BuildReport {
            name: identity.name,
            version: version.version,
            path: package.path,
            size: package.size,
            entries: package.entries,
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PackageSettings;
    use crate::validator::SyntaxIssue;
    use std::fs;
    use std::path::{Path, PathBuf};

    struct AcceptAll;

    impl SyntaxChecker for AcceptAll {
        fn check(&self, _files: &[PathBuf]) -> BuildResult<Vec<SyntaxIssue>> {
            Ok(Vec::new())
        }
    }

    struct RejectAll;

    impl SyntaxChecker for RejectAll {
        fn check(&self, files: &[PathBuf]) -> BuildResult<Vec<SyntaxIssue>> {
            Ok(files
                .iter()
                .map(|f| SyntaxIssue {
                    path: f.clone(),
                    line: 1,
                    message: "invalid syntax".to_string(),
                })
                .collect())
        }
    }

    /// Simulates a checker process killed by the same Ctrl-C.
    struct KilledByInterrupt(InterruptFlag);

    impl SyntaxChecker for KilledByInterrupt {
        fn check(&self, _files: &[PathBuf]) -> BuildResult<Vec<SyntaxIssue>> {
            self.0.raise();
            Err(BuildError::SyntaxCheckerUnavailable(
                "'python3' failed: KeyboardInterrupt".to_string(),
            ))
        }
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn project() -> tempfile::TempDir {
        let temp = tempfile::TempDir::new().unwrap();
        write(
            temp.path(),
            "local/share/check_mk/agents/plugins/myagent",
            "#!/bin/sh\necho '<<<myagent>>>'\n",
        );
        write(
            temp.path(),
            "local/lib/python3/cmk_addons/plugins/myagent/agent_based/myagent.py",
            "x = 1\n",
        );
        temp
    }

    fn config(root: &Path, version: Option<&str>) -> BuildConfiguration {
        let overrides = PackageSettings {
            name: Some("myagent".to_string()),
            version: version.map(str::to_string),
            ..Default::default()
        };
        BuildConfiguration::resolve(root, None, overrides).with_output_dir(root.join("dist"))
    }

    #[test]
    fn test_interrupt_flag() {
        let flag = InterruptFlag::new();
        let shared = flag.clone();
        assert!(!flag.is_raised());
        shared.raise();
        assert!(flag.is_raised());
        assert!(matches!(flag.check(), Err(BuildError::Interrupted)));
    }

    #[test]
    fn test_validate_parameters_missing_version() {
        let temp = project();
        let err = validate_parameters(&config(temp.path(), None)).unwrap_err();
        assert!(matches!(err, BuildError::MissingVersion));
    }

    #[test]
    fn test_validate_parameters_empty_name() {
        let temp = project();
        let mut config = config(temp.path(), Some("1.0.0"));
        config.name = String::new();
        assert!(matches!(
            validate_parameters(&config),
            Err(BuildError::MissingName)
        ));
    }

    #[test]
    fn test_validate_parameters_invalid_version() {
        let temp = project();
        let err = validate_parameters(&config(temp.path(), Some("1.0"))).unwrap_err();
        assert!(matches!(err, BuildError::InvalidVersion(v) if v == "1.0"));
    }

    #[test]
    fn test_validate_parameters_missing_local() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = validate_parameters(&config(temp.path(), Some("1.0.0"))).unwrap_err();
        assert!(matches!(err, BuildError::ProjectRootNotFound(p) if p.ends_with("local")));
    }

    #[test]
    fn test_validate_parameters_ok() {
        let temp = project();
        let (identity, version) =
            validate_parameters(&config(temp.path(), Some("2.3.0p1"))).unwrap();
        assert_eq!(identity.name, "myagent");
        assert_eq!(identity.title, "myagent");
        assert_eq!(version.version, "2.3.0p1");
        assert!(version.usable_until.is_none());
    }

    #[test]
    fn test_build() {
        let temp = project();
        let report = PackageBuilder::new(config(temp.path(), Some("1.0.0")), InterruptFlag::new())
            .with_checker(Box::new(AcceptAll))
            .build()
            .unwrap();

        assert_eq!(report.name, "myagent");
        assert_eq!(report.path, temp.path().join("dist/myagent-1.0.0.mkp"));
        assert!(report.path.is_file());
        assert_eq!(report.size, fs::metadata(&report.path).unwrap().len());
        assert_eq!(
            report.entries,
            vec!["info", "info.json", "agents.tar", "cmk_addons_plugins.tar", "lib.tar"]
        );
        assert_eq!(report.files.total_files(), 2);
    }

    #[test]
    fn test_syntax_failure_creates_nothing() {
        let temp = project();
        let err = PackageBuilder::new(config(temp.path(), Some("1.0.0")), InterruptFlag::new())
            .with_checker(Box::new(RejectAll))
            .build()
            .unwrap_err();

        assert!(matches!(err, BuildError::SyntaxCheck { count: 1 }));
        assert!(!temp.path().join("dist").exists());
    }

    #[test]
    fn test_validation_can_be_skipped() {
        let temp = project();
        let mut config = config(temp.path(), Some("1.0.0"));
        config.validate_sources = false;

        let report = PackageBuilder::new(config, InterruptFlag::new())
            .with_checker(Box::new(RejectAll))
            .build()
            .unwrap();
        assert!(report.path.is_file());
    }

    #[test]
    fn test_interrupted_build_creates_nothing() {
        let temp = project();
        let flag = InterruptFlag::new();
        flag.raise();

        let err = PackageBuilder::new(config(temp.path(), Some("1.0.0")), flag)
            .with_checker(Box::new(AcceptAll))
            .build()
            .unwrap_err();

        assert!(matches!(err, BuildError::Interrupted));
        assert!(!temp.path().join("dist").exists());
    }

    #[test]
    fn test_interrupt_during_syntax_check_wins() {
        let temp = project();
        let flag = InterruptFlag::new();

        let err = PackageBuilder::new(config(temp.path(), Some("1.0.0")), flag.clone())
            .with_checker(Box::new(KilledByInterrupt(flag)))
            .build()
            .unwrap_err();

        assert!(matches!(err, BuildError::Interrupted));
        assert!(!temp.path().join("dist").exists());
    }

    #[test]
    fn test_report_size_human() {
        let report = BuildReport {
            name: "x".to_string(),
            version: "1.0.0".to_string(),
            path: PathBuf::from("x-1.0.0.mkp"),
            size: 1536,
            entries: Vec::new(),
            files: FileGroups::new(),
        };
        assert_eq!(report.size_human(), "1K");
    }
}
