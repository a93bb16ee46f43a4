//! Build command - package the current project into an MKP file.

use std::path::PathBuf;

use clap::Args;
use mkpbuilder::builder::PackageBuilder;
use mkpbuilder::config::{BuildConfiguration, PackageSettings};
use tracing::info;

use super::common::{github_outputs, non_empty, validation_override};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for building a package.
#[derive(Debug, Clone, Args)]
pub struct BuildArgs {
    /// Package version (e.g., 1.2.3)
    #[arg(long, required = true, value_name = "VERSION")]
    pub version: String,

    /// Package name (default: from config or auto-detect)
    #[arg(long)]
    pub name: Option<String>,

    /// Package title (default: from config)
    #[arg(long)]
    pub title: Option<String>,

    /// Author name and email (default: from config)
    #[arg(long)]
    pub author: Option<String>,

    /// Package description (default: from config)
    #[arg(long)]
    pub description: Option<String>,

    /// Minimum Checkmk version (default: from config)
    #[arg(long)]
    pub version_min_required: Option<String>,

    /// Checkmk version used for packaging (default: from config)
    #[arg(long)]
    pub version_packaged: Option<String>,

    /// Download URL (default: from config)
    #[arg(long)]
    pub download_url: Option<String>,

    /// The last Checkmk version this plugin is compatible with (default: from config)
    #[arg(long)]
    pub version_usable_until: Option<String>,

    /// Output directory
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Configuration file (default: .mkp-builder.ini in the current directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Validate Python files before packaging
    #[arg(long, conflicts_with = "no_validate")]
    pub validate: bool,

    /// Skip Python validation
    #[arg(long)]
    pub no_validate: bool,

    /// Verbose output
    #[arg(long, short)]
    pub verbose: bool,

    /// Enable GitHub Actions compatible variable output
    #[arg(long)]
    pub github_action_mode: bool,
}

impl BuildArgs {
    /// Settings given on the command line. Empty values count as unset.
    pub fn settings(&self) -> PackageSettings {
        PackageSettings {
            name: non_empty(&self.name),
            title: non_empty(&self.title),
            author: non_empty(&self.author),
            description: non_empty(&self.description),
            download_url: non_empty(&self.download_url),
            version: Some(self.version.clone()),
            version_min_required: non_empty(&self.version_min_required),
            version_packaged: non_empty(&self.version_packaged),
            version_usable_until: non_empty(&self.version_usable_until),
            validate_python: validation_override(self.validate, self.no_validate),
        }
    }
}

/// Run the build command.
pub fn run(args: BuildArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("build");
    runner.install_interrupt_handler()?;

    let overlay = runner.load_overlay(args.config.as_deref());
    let config = BuildConfiguration::resolve(runner.work_dir(), overlay, args.settings())
        .with_output_dir(&args.output_dir)
        .with_verbose(args.verbose);

    let report = PackageBuilder::new(config, runner.interrupt()).build()?;

    info!(
        "Successfully built {} ({})",
        report.path.display(),
        report.size_human()
    );

    if args.github_action_mode {
        for line in github_outputs(&report) {
            println!("{}", line);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        build: BuildArgs,
    }

    fn parse(args: &[&str]) -> Result<BuildArgs, clap::Error> {
        TestCli::try_parse_from(std::iter::once("mkp-builder").chain(args.iter().copied()))
            .map(|cli| cli.build)
    }

    #[test]
    fn test_version_is_required() {
        assert!(parse(&[]).is_err());
        assert_eq!(parse(&["--version", "1.0.0"]).unwrap().version, "1.0.0");
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["--version", "1.0.0"]).unwrap();
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert!(!args.validate && !args.no_validate);
        assert!(!args.verbose);
        assert!(!args.github_action_mode);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_validate_flags_conflict() {
        assert!(parse(&["--version", "1.0.0", "--validate", "--no-validate"]).is_err());
    }

    #[test]
    fn test_settings_from_args() {
        let args = parse(&[
            "--version",
            "1.2.3",
            "--name",
            "myagent",
            "--author",
            "",
            "--version-usable-until",
            "2.5.0",
            "--no-validate",
        ])
        .unwrap();

        let settings = args.settings();
        assert_eq!(settings.version.as_deref(), Some("1.2.3"));
        assert_eq!(settings.name.as_deref(), Some("myagent"));
        assert!(settings.author.is_none());
        assert_eq!(settings.version_usable_until.as_deref(), Some("2.5.0"));
        assert_eq!(settings.validate_python, Some(false));
        assert!(settings.title.is_none());
    }
}
