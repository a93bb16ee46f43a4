//! Helpers shared by CLI commands.

use mkpbuilder::builder::BuildReport;

/// Treat empty command line values as not given.
pub fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Resolve the `--validate` / `--no-validate` pair into an override.
pub fn validation_override(validate: bool, no_validate: bool) -> Option<bool> {
    if validate {
        Some(true)
    } else if no_validate {
        Some(false)
    } else {
        None
    }
}

/// GitHub Actions step output lines for a finished build.
pub fn github_outputs(report: &BuildReport) -> Vec<String> {
    vec![
        format!("::set-output name=package-file::{}", report.path.display()),
        format!("::set-output name=package-name::{}", report.name),
        format!("::set-output name=package-size::{}", report.size_human()),
    ]
}
