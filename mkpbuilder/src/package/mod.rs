//! MKP package identity, versioning and layout conventions.
//!
//! This module provides the data structures that describe *what* is being
//! packaged, independent of how files are discovered or archived.
//!
//! # Overview
//!
//! - **PackageIdentity**: name, title, author, description, download URL
//! - **VersionInfo**: package version plus Checkmk compatibility range
//! - **Section**: the three MKP parts (agents, addon plugins, library)
//! - **FileGroups**: relative file paths collected per section
//!
//! # Project Layout
//!
//! ```text
//! <root>/local/
//! ├── share/check_mk/agents/            ─► agents             (agents.tar)
//! └── lib/python3/                      ─► library            (lib.tar)
//!     ├── cmk_addons/plugins/           ─► addon-plugins      (cmk_addons_plugins.tar)
//!     └── cmk/base/cee/plugins/bakery/     (library files are stored as cmk/...)
//! ```

mod core;
mod groups;
mod naming;
mod types;
mod version;

// Core types
pub use self::core::PackageIdentity;
pub use groups::{FileGroup, FileGroups};
pub use types::Section;
pub use version::{is_valid_version, VersionInfo, DEFAULT_MIN_REQUIRED, DEFAULT_PACKAGED};

// Naming utilities
pub use naming::{
    package_filename, section_archive_filename, INFO_FILENAME, INFO_JSON_FILENAME,
    PACKAGE_EXTENSION, PROJECT_ROOT_MARKER,
};
