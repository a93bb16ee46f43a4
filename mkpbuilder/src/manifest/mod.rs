//! Package manifest generation.
//!
//! An MKP carries its metadata twice: `info`, a Python literal readable
//! without any tooling, and `info.json` for machine consumers. Both files are
//! rendered from the same canonical [`serde_json::Value`] so they always
//! describe the same content.
//!
//! # Manifest Shape
//!
//! ```text
//! {   'author': 'Jane Doe <jane@example.com>',
//!     'description': '...',
//!     'download_url': '',
//!     'files': {   'agents': ['plugins/myagent'],
//!                  'cmk_addons_plugins': [],
//!                  'lib': []},
//!     'name': 'myagent',
//!     'title': 'myagent',
//!     'version': '1.0.0',
//!     'version.min_required': '2.3.0p1',
//!     'version.packaged': '2.3.0p34',
//!     'version.usable_until': None}
//! ```

mod literal;
mod parse;

pub use literal::{python_repr_str, to_python_literal};
pub use parse::{parse_python_literal, LiteralError};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::builder::{BuildError, BuildResult};
use crate::package::{
    FileGroups, PackageIdentity, VersionInfo, INFO_FILENAME, INFO_JSON_FILENAME,
};

/// Manifest keys, in serialization order.
pub const MANIFEST_KEYS: [&str; 10] = [
    "author",
    "description",
    "download_url",
    "files",
    "name",
    "title",
    "version",
    "version.min_required",
    "version.packaged",
    "version.usable_until",
];

/// Immutable manifest of one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub identity: PackageIdentity,
    pub version: VersionInfo,
    pub files: FileGroups,
}

/// Serialized view of a manifest; field order is the key order.
#[derive(Serialize)]
struct ManifestRecord<'a> {
    author: &'a str,
    description: &'a str,
    download_url: &'a str,
    files: BTreeMap<&'static str, &'a [String]>,
    name: &'a str,
    title: &'a str,
    version: &'a str,
    #[serde(rename = "version.min_required")]
    min_required: &'a str,
    #[serde(rename = "version.packaged")]
    packaged: &'a str,
    #[serde(rename = "version.usable_until")]
    usable_until: Option<&'a str>,
}

/// Paths of the written manifest files.
#[derive(Debug, Clone)]
pub struct ManifestFiles {
    /// Python-literal manifest (`info`).
    pub info: PathBuf,
    /// JSON manifest (`info.json`).
    pub info_json: PathBuf,
}

impl Manifest {
    pub fn new(identity: PackageIdentity, version: VersionInfo, files: FileGroups) -> Self {
        Self {
            identity,
            version,
            files,
        }
    }

    /// The canonical value both serializations are rendered from.
    pub fn to_value(&self) -> BuildResult<Value> {
        let record = ManifestRecord {
            author: &self.identity.author,
            description: &self.identity.description,
            download_url: &self.identity.download_url,
            files: self
                .files
                .iter()
                .map(|(section, group)| (section.part_name(), group.paths()))
                .collect(),
            name: &self.identity.name,
            title: &self.identity.title,
            version: &self.version.version,
            min_required: &self.version.min_required,
            packaged: &self.version.packaged,
            usable_until: self.version.usable_until.as_deref(),
        };
        Ok(serde_json::to_value(record)?)
    }

    /// Render `info.json` (2-space indent, non-ASCII kept as-is).
    pub fn to_json(&self) -> BuildResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_value()?)?)
    }

    /// Render `info` as a Python literal.
    pub fn to_python_literal(&self) -> BuildResult<String> {
        Ok(to_python_literal(&self.to_value()?))
    }

    /// Write `info` and `info.json` into `dir`.
    pub fn write_to(&self, dir: &Path) -> BuildResult<ManifestFiles> {
        let value = self.to_value()?;
        let info = dir.join(INFO_FILENAME);
        let info_json = dir.join(INFO_JSON_FILENAME);

        let mut literal = to_python_literal(&value);
        literal.push('\n');
        write_file(&info, &literal)?;
        write_file(&info_json, &serde_json::to_string_pretty(&value)?)?;

        Ok(ManifestFiles { info, info_json })
    }
}

fn write_file(path: &Path, content: &str) -> BuildResult<()> {
    fs::write(path, content).map_err(|e| BuildError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
