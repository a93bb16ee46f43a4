//! Per-section intermediate archives.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tar::Builder;
use tracing::debug;

use crate::builder::{BuildError, BuildResult};
use crate::package::{FileGroup, FileGroups, Section};

/// Write `<part>.tar` for one section into `workspace`.
///
/// Each stored path is read from the section's base directory under `root`
/// and stored under its relative name. Paths that disappeared since
/// collection are skipped. Symlinks are stored as links. An empty group
/// still produces an (empty) archive.
pub fn write_section_archive(
    root: &Path,
    section: Section,
    group: &FileGroup,
    workspace: &Path,
) -> BuildResult<PathBuf> {
    let archive_path = workspace.join(section.archive_name());
    let base = section.base_dir(root);

    let file = File::create(&archive_path).map_err(|e| BuildError::WriteFailed {
        path: archive_path.clone(),
        source: e,
    })?;

    let mut builder = Builder::new(BufWriter::new(file));
    builder.follow_symlinks(false);

    let archive_err = |e: io::Error| BuildError::ArchiveFailed {
        path: archive_path.clone(),
        source: e,
    };

    let mut added = 0usize;
    for relative in group.paths() {
        let full = base.join(relative);
        if fs::symlink_metadata(&full).is_err() {
            debug!("Skipping missing file: {}", full.display());
            continue;
        }
        builder
            .append_path_with_name(&full, relative)
            .map_err(archive_err)?;
        added += 1;
    }

    let mut writer = builder.into_inner().map_err(archive_err)?;
    writer.flush().map_err(archive_err)?;

    debug!(
        "Created {} with {} file(s)",
        section.archive_name(),
        added
    );
    Ok(archive_path)
}

/// Write the intermediate archive of every section, in packaging order.
pub fn write_section_archives(
    root: &Path,
    groups: &FileGroups,
    workspace: &Path,
) -> BuildResult<Vec<PathBuf>> {
    groups
        .iter()
        .map(|(section, group)| write_section_archive(root, section, group, workspace))
        .collect()
}
