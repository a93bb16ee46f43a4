//! File discovery for MKP sections.
//!
//! The collector walks the convention-defined directories below `local/`
//! and produces one [`FileGroup`] per [`Section`]:
//!
//! | Section       | Walk root                                 | Rule                                   |
//! |---------------|-------------------------------------------|----------------------------------------|
//! | agents        | `share/check_mk/agents/`                  | every file                             |
//! | addon-plugins | `lib/python3/cmk_addons/plugins/<name>/`  | every file                             |
//! | addon-plugins | `lib/python3/cmk_addons/plugins/{agent_based,checkman,graphing,rulesets}/` | filename contains `<name>` |
//! | library       | `lib/python3/cmk/base/cee/plugins/bakery/`| filename contains `<name>`             |
//!
//! Paths containing an excluded directory segment (`__pycache__` by default)
//! are skipped in every section. Missing directories produce empty groups.
//!
//! Each rule is a plain predicate function so it can be tested on its own.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::builder::{BuildError, BuildResult};
use crate::package::{FileGroup, FileGroups, Section};

/// Conventional add-on subdirectories searched for package-named files.
pub const ADDON_SUBDIRS: [&str; 4] = ["agent_based", "checkman", "graphing", "rulesets"];

/// Bakery plugin directory, relative to the library base directory.
const BAKERY_COMPONENTS: [&str; 5] = ["cmk", "base", "cee", "plugins", "bakery"];

/// Name used when nothing better can be detected.
const UNKNOWN_PACKAGE: &str = "unknown_package";

/// Collects the files of a package from a project root.
#[derive(Debug, Clone)]
pub struct FileCollector {
    root: PathBuf,
    package_name: String,
    excluded_dirs: Vec<String>,
}

impl FileCollector {
    /// Create a collector excluding the default cache directories.
    pub fn new(root: impl Into<PathBuf>, package_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            package_name: package_name.into(),
            excluded_dirs: crate::config::DEFAULT_EXCLUDED_DIRS
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }

    /// Replace the excluded directory segments.
    pub fn with_excluded_dirs(mut self, dirs: Vec<String>) -> Self {
        self.excluded_dirs = dirs;
        self
    }

    /// Collect all sections.
    pub fn collect(&self) -> BuildResult<FileGroups> {
        let mut groups = FileGroups::new();
        groups.set(Section::Agents, self.collect_agents()?);
        groups.set(Section::AddonPlugins, self.collect_addon_plugins()?);
        groups.set(Section::Library, self.collect_library()?);
        Ok(groups)
    }

    /// Every file under the agents directory.
    pub fn collect_agents(&self) -> BuildResult<FileGroup> {
        let base = Section::Agents.base_dir(&self.root);
        let mut group = FileGroup::new();

        for path in walk_files(&base)? {
            let relative = relative_to(&path, &base);
            if is_excluded(&relative, &self.excluded_dirs) {
                continue;
            }
            group.insert(path_string(&relative));
        }

        Ok(group)
    }

    /// Files in the package directory plus package-named files in the
    /// conventional subdirectories.
    pub fn collect_addon_plugins(&self) -> BuildResult<FileGroup> {
        let base = Section::AddonPlugins.base_dir(&self.root);
        let mut group = FileGroup::new();

        for path in walk_files(&base.join(&self.package_name))? {
            let relative = relative_to(&path, &base);
            if in_package_dir(&relative, &self.package_name, &self.excluded_dirs) {
                group.insert(path_string(&relative));
            }
        }

        for subdir in ADDON_SUBDIRS {
            for path in walk_files(&base.join(subdir))? {
                let relative = relative_to(&path, &base);
                if matches_package_file(&relative, &self.package_name, &self.excluded_dirs) {
                    let stored = path_string(&relative);
                    if !group.insert(stored.clone()) {
                        debug!("Skipping duplicate addon file: {}", stored);
                    }
                }
            }
        }

        Ok(group)
    }

    /// Package-named bakery plugins, stored relative to `lib/python3/`.
    pub fn collect_library(&self) -> BuildResult<FileGroup> {
        let base = Section::Library.base_dir(&self.root);
        let bakery = BAKERY_COMPONENTS
            .iter()
            .fold(base.clone(), |path, component| path.join(component));
        let mut group = FileGroup::new();

        for path in walk_files(&bakery)? {
            let relative = relative_to(&path, &base);
            if matches_package_file(&relative, &self.package_name, &self.excluded_dirs) {
                group.insert(path_string(&relative));
            }
        }

        Ok(group)
    }
}

/// Whether any directory segment of `relative` is excluded.
///
/// Only directory components count; a file that happens to share an
/// excluded name is kept.
pub fn is_excluded(relative: &Path, excluded_dirs: &[String]) -> bool {
    let mut components: Vec<Component<'_>> = relative.components().collect();
    components.pop();
    components.iter().any(|component| match component {
        Component::Normal(segment) => excluded_dirs
            .iter()
            .any(|excluded| segment.to_str() == Some(excluded.as_str())),
        _ => false,
    })
}

/// Whether the file name of `path` contains the package name.
pub fn name_contains(path: &Path, package_name: &str) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().contains(package_name))
        .unwrap_or(false)
}

/// Rule for files in the package-named add-on directory.
pub fn in_package_dir(relative: &Path, package_name: &str, excluded_dirs: &[String]) -> bool {
    let first = relative.components().next();
    matches!(first, Some(Component::Normal(dir)) if dir.to_str() == Some(package_name))
        && !is_excluded(relative, excluded_dirs)
}

/// Rule for package-named files (conventional add-on dirs and bakery).
pub fn matches_package_file(relative: &Path, package_name: &str, excluded_dirs: &[String]) -> bool {
    name_contains(relative, package_name) && !is_excluded(relative, excluded_dirs)
}

/// Detect the package name from the project layout.
///
/// If `local/share/check_mk/agents/plugins/` holds exactly one executable
/// regular file, its name is used. Otherwise the project directory's own
/// name is returned.
pub fn detect_package_name(root: &Path) -> String {
    let plugins_dir = Section::Agents.base_dir(root).join("plugins");

    if let Ok(entries) = fs::read_dir(&plugins_dir) {
        let executables: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| is_executable_file(&entry.path()))
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();

        if let [name] = executables.as_slice() {
            debug!("Auto-detected package name from agent plugin: {}", name);
            return name.clone();
        }
    }

    directory_name(root).unwrap_or_else(|| UNKNOWN_PACKAGE.to_string())
}

fn directory_name(root: &Path) -> Option<String> {
    let name = |path: &Path| {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty())
    };
    name(root).or_else(|| root.canonicalize().ok().and_then(|p| name(&p)))
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

/// All regular files below `dir`, visited in file name order.
///
/// A missing directory yields no files.
fn walk_files(dir: &Path) -> BuildResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| BuildError::ReadFailed {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
            source: e.into(),
        })?;
        if entry.path().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base).unwrap_or(path).to_path_buf()
}

/// Render a relative path with `/` separators.
fn path_string(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
