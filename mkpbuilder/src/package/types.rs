//! MKP section definitions.

use std::fmt;
use std::path::{Path, PathBuf};

/// One of the three parts of an MKP package.
///
/// Each section has a base directory below the project root, and a part name
/// that is used both as the key in the manifest's `files` map and as the name
/// of the intermediate archive (`<part>.tar`).
///
/// # Example
///
/// ```
/// use mkpbuilder::package::Section;
///
/// assert_eq!(Section::AddonPlugins.part_name(), "cmk_addons_plugins");
/// assert_eq!(Section::AddonPlugins.to_string(), "addon-plugins");
/// assert_eq!(Section::Library.archive_name(), "lib.tar");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    /// Agent plugins and agent-side scripts.
    Agents,
    /// Checkmk add-on plugins (check plugins, rulesets, graphing, man pages).
    AddonPlugins,
    /// Library modules, currently the agent bakery plugins.
    Library,
}

impl Section {
    /// All sections in packaging order.
    pub const ALL: [Section; 3] = [Section::Agents, Section::AddonPlugins, Section::Library];

    /// Logical identifier used in log output.
    pub fn id(&self) -> &'static str {
        match self {
            Section::Agents => "agents",
            Section::AddonPlugins => "addon-plugins",
            Section::Library => "library",
        }
    }

    /// MKP part name.
    pub fn part_name(&self) -> &'static str {
        match self {
            Section::Agents => "agents",
            Section::AddonPlugins => "cmk_addons_plugins",
            Section::Library => "lib",
        }
    }

    /// Filename of the intermediate archive for this section.
    pub fn archive_name(&self) -> String {
        format!("{}.tar", self.part_name())
    }

    /// Path components of the base directory, relative to the project root.
    ///
    /// Stored file paths are relative to this directory.
    pub fn base_components(&self) -> &'static [&'static str] {
        match self {
            Section::Agents => &["local", "share", "check_mk", "agents"],
            Section::AddonPlugins => &["local", "lib", "python3", "cmk_addons", "plugins"],
            Section::Library => &["local", "lib", "python3"],
        }
    }

    /// Base directory of this section under `root`.
    pub fn base_dir(&self, root: &Path) -> PathBuf {
        self.base_components()
            .iter()
            .fold(root.to_path_buf(), |path, component| path.join(component))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}
