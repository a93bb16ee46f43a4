//! Centralized package naming conventions.
//!
//! This module is the single source of truth for the names used inside and
//! around an MKP package:
//! - Package filenames (e.g., `myagent-1.0.0.mkp`)
//! - Manifest filenames (`info`, `info.json`)
//! - Section archive filenames (e.g., `cmk_addons_plugins.tar`)
//!
//! All other modules should use these functions rather than constructing names directly.

use super::Section;

/// Default extension of the final package file.
pub const PACKAGE_EXTENSION: &str = "mkp";

/// Python-literal manifest filename.
pub const INFO_FILENAME: &str = "info";

/// JSON manifest filename.
pub const INFO_JSON_FILENAME: &str = "info.json";

/// Directory that marks a project root.
pub const PROJECT_ROOT_MARKER: &str = "local";

/// Generate the filename of the final package.
///
/// # Format
///
/// `{name}-{version}.{extension}`
///
/// # Examples
///
/// ```
/// use mkpbuilder::package::package_filename;
///
/// assert_eq!(package_filename("myagent", "1.0.0", "mkp"), "myagent-1.0.0.mkp");
/// assert_eq!(package_filename("foo", "2.3.0p1", "mkp"), "foo-2.3.0p1.mkp");
/// ```
pub fn package_filename(name: &str, version: &str, extension: &str) -> String {
    format!("{}-{}.{}", name, version, extension)
}

/// Generate the filename of a section archive.
///
/// # Examples
///
/// ```
/// use mkpbuilder::package::{section_archive_filename, Section};
///
/// assert_eq!(section_archive_filename(Section::Agents), "agents.tar");
/// ```
pub fn section_archive_filename(section: Section) -> String {
    section.archive_name()
}
