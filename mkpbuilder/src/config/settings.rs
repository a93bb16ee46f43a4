//! Layered package settings and the resolved build configuration.

use std::path::{Path, PathBuf};

use crate::collector::detect_package_name;
use crate::package::{DEFAULT_MIN_REQUIRED, DEFAULT_PACKAGED, PACKAGE_EXTENSION};

/// Directory segments excluded from every file group.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["__pycache__"];

/// Source file extension checked by the syntax validator.
const DEFAULT_SOURCE_EXTENSION: &str = "py";

/// One tier of package settings.
///
/// Every field is optional; `None` means "not set at this tier". Both the
/// config file overlay and the command line produce a `PackageSettings`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSettings {
    pub name: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub download_url: Option<String>,
    pub version: Option<String>,
    pub version_min_required: Option<String>,
    pub version_packaged: Option<String>,
    pub version_usable_until: Option<String>,
    pub validate_python: Option<bool>,
}

impl PackageSettings {
    /// Layer `higher` on top of `self`; fields set in `higher` win.
    pub fn overlay(self, higher: PackageSettings) -> PackageSettings {
        PackageSettings {
            name: higher.name.or(self.name),
            title: higher.title.or(self.title),
            author: higher.author.or(self.author),
            description: higher.description.or(self.description),
            download_url: higher.download_url.or(self.download_url),
            version: higher.version.or(self.version),
            version_min_required: higher.version_min_required.or(self.version_min_required),
            version_packaged: higher.version_packaged.or(self.version_packaged),
            version_usable_until: higher.version_usable_until.or(self.version_usable_until),
            validate_python: higher.validate_python.or(self.validate_python),
        }
    }
}

/// Fully resolved, immutable configuration for one build.
///
/// Required fields (`version`, a non-empty `name`) are not checked here;
/// the builder validates them before any work starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    /// Project root containing the `local/` directory.
    pub project_root: PathBuf,

    /// Directory where the final package is written.
    pub output_dir: PathBuf,

    /// Package name (configured or auto-detected).
    pub name: String,

    pub title: String,
    pub author: String,
    pub description: String,
    pub download_url: String,

    /// Package version, if one was given.
    pub version: Option<String>,

    pub version_min_required: String,
    pub version_packaged: String,
    pub version_usable_until: Option<String>,

    /// Whether to syntax-check sources before packaging.
    pub validate_sources: bool,

    /// Extension of the source files to syntax-check (without the dot).
    pub source_extension: String,

    /// Directory names excluded from collection wherever they appear.
    pub excluded_dirs: Vec<String>,

    /// Extension of the final package file (without the dot).
    pub package_extension: String,

    /// List package contents after building.
    pub verbose: bool,
}

impl BuildConfiguration {
    /// Merge defaults, an optional overlay and CLI overrides.
    ///
    /// When no tier sets a package name it is auto-detected from the
    /// project layout (see [`detect_package_name`]). The title defaults to
    /// the resolved name.
    pub fn resolve(
        project_root: impl Into<PathBuf>,
        overlay: Option<PackageSettings>,
        overrides: PackageSettings,
    ) -> Self {
        let project_root = project_root.into();
        let settings = overlay.unwrap_or_default().overlay(overrides);

        let name = settings
            .name
            .unwrap_or_else(|| detect_package_name(&project_root));
        let title = settings.title.unwrap_or_else(|| name.clone());

        Self {
            output_dir: PathBuf::from("."),
            name,
            title,
            author: settings.author.unwrap_or_default(),
            description: settings.description.unwrap_or_default(),
            download_url: settings.download_url.unwrap_or_default(),
            version: settings.version,
            version_min_required: settings
                .version_min_required
                .unwrap_or_else(|| DEFAULT_MIN_REQUIRED.to_string()),
            version_packaged: settings
                .version_packaged
                .unwrap_or_else(|| DEFAULT_PACKAGED.to_string()),
            version_usable_until: settings.version_usable_until.filter(|v| !v.is_empty()),
            validate_sources: settings.validate_python.unwrap_or(true),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            package_extension: PACKAGE_EXTENSION.to_string(),
            verbose: false,
            project_root,
        }
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Enable or disable verbose package listing.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Replace the excluded directory segments.
    pub fn with_excluded_dirs(mut self, dirs: Vec<String>) -> Self {
        self.excluded_dirs = dirs;
        self
    }

    /// Set the final package extension.
    pub fn with_package_extension(mut self, extension: impl Into<String>) -> Self {
        self.package_extension = extension.into();
        self
    }

    /// The `local/` marker directory of the project.
    pub fn local_dir(&self) -> PathBuf {
        self.project_root.join(crate::package::PROJECT_ROOT_MARKER)
    }

    /// Project root as a path reference.
    pub fn root(&self) -> &Path {
        &self.project_root
    }
}
