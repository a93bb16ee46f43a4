//! Final package assembly.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tar::Builder;
use tempfile::NamedTempFile;
use tracing::info;

use crate::builder::{BuildError, BuildResult, InterruptFlag};
use crate::config::format_size;
use crate::package::{Section, INFO_FILENAME, INFO_JSON_FILENAME};

/// An assembled package.
#[derive(Debug, Clone)]
pub struct AssembledPackage {
    /// Final location of the package file.
    pub path: PathBuf,

    /// Size of the package file in bytes.
    pub size: u64,

    /// Entry names, in archive order.
    pub entries: Vec<String>,
}

/// Names of the top-level package entries, in archive order.
pub fn package_entries() -> Vec<String> {
    let mut entries = vec![INFO_FILENAME.to_string(), INFO_JSON_FILENAME.to_string()];
    entries.extend(Section::ALL.iter().map(Section::archive_name));
    entries
}

/// Pack the manifests and section archives found in `workspace` into
/// `output_dir/filename`.
///
/// Entries missing from the workspace are omitted. The package is written to
/// a temporary file in `output_dir` and renamed into place only once
/// complete, so a failed build never leaves a partial package behind. The
/// `interrupt` flag is checked once more right before that rename.
pub fn assemble_package(
    workspace: &Path,
    output_dir: &Path,
    filename: &str,
    interrupt: &InterruptFlag,
) -> BuildResult<AssembledPackage> {
    fs::create_dir_all(output_dir).map_err(|e| BuildError::CreateDirectoryFailed {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let path = output_dir.join(filename);
    let archive_err = |e: io::Error| BuildError::ArchiveFailed {
        path: path.clone(),
        source: e,
    };

    let staging = NamedTempFile::new_in(output_dir).map_err(|e| BuildError::WriteFailed {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let encoder = GzEncoder::new(BufWriter::new(staging.as_file()), Compression::default());
    let mut builder = Builder::new(encoder);

    let mut entries = Vec::new();
    for name in package_entries() {
        let source = workspace.join(&name);
        if !source.is_file() {
            continue;
        }
        builder
            .append_path_with_name(&source, &name)
            .map_err(archive_err)?;
        entries.push(name);
    }

    let encoder = builder.into_inner().map_err(archive_err)?;
    let mut writer = encoder.finish().map_err(archive_err)?;
    writer.flush().map_err(archive_err)?;
    drop(writer);

    // Staging files are created owner-only.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staging
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(|e| BuildError::WriteFailed {
                path: staging.path().to_path_buf(),
                source: e,
            })?;
    }

    interrupt.check()?;
    staging
        .persist(&path)
        .map_err(|e| BuildError::WriteFailed {
            path: path.clone(),
            source: e.error,
        })?;

    let size = fs::metadata(&path)
        .map_err(|e| BuildError::ReadFailed {
            path: path.clone(),
            source: e,
        })?
        .len();

    info!("Package created: {} ({})", path.display(), format_size(size));

    Ok(AssembledPackage {
        path,
        size,
        entries,
    })
}

/// List the entry names of a gzip-compressed package.
pub fn list_entries(path: &Path) -> BuildResult<Vec<String>> {
    let read_err = |e: io::Error| BuildError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::open(path).map_err(read_err)?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));

    let mut names = Vec::new();
    for entry in archive.entries().map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let name = entry.path().map_err(read_err)?;
        names.push(name.to_string_lossy().into_owned());
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn populate(workspace: &Path, names: &[&str]) {
        for name in names {
            fs::write(workspace.join(name), format!("content of {}", name)).unwrap();
        }
    }

    fn assemble(workspace: &Path, output_dir: &Path, filename: &str) -> AssembledPackage {
        assemble_package(workspace, output_dir, filename, &InterruptFlag::new()).unwrap()
    }

    fn output_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_package_entries_order() {
        assert_eq!(
            package_entries(),
            vec!["info", "info.json", "agents.tar", "cmk_addons_plugins.tar", "lib.tar"]
        );
    }

    #[test]
    fn test_assemble_in_order() {
        let workspace = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        // Written out of order on purpose.
        populate(
            workspace.path(),
            &["lib.tar", "info.json", "agents.tar", "info", "cmk_addons_plugins.tar"],
        );

        let package = assemble(workspace.path(), output.path(), "myagent-1.0.0.mkp");

        assert_eq!(package.path, output.path().join("myagent-1.0.0.mkp"));
        assert_eq!(package.entries, package_entries());
        assert_eq!(list_entries(&package.path).unwrap(), package_entries());
        assert_eq!(package.size, fs::metadata(&package.path).unwrap().len());
    }

    #[test]
    fn test_missing_entries_are_omitted() {
        let workspace = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        populate(workspace.path(), &["info", "info.json", "agents.tar"]);

        let package = assemble(workspace.path(), output.path(), "x-1.0.0.mkp");

        assert_eq!(package.entries, vec!["info", "info.json", "agents.tar"]);
        assert_eq!(list_entries(&package.path).unwrap(), package.entries);
    }

    #[test]
    fn test_creates_output_dir() {
        let workspace = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let nested = output.path().join("dist").join("pkg");
        populate(workspace.path(), &["info"]);

        let package = assemble(workspace.path(), &nested, "x-1.0.0.mkp");
        assert!(package.path.starts_with(&nested));
        assert!(package.path.is_file());
    }

    #[test]
    fn test_no_staging_file_left_behind() {
        let workspace = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        populate(workspace.path(), &["info", "info.json"]);

        assemble(workspace.path(), output.path(), "x-1.0.0.mkp");

        assert_eq!(output_files(output.path()), vec!["x-1.0.0.mkp"]);
    }

    #[test]
    fn test_replaces_existing_package() {
        let workspace = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(output.path().join("x-1.0.0.mkp"), "stale").unwrap();
        populate(workspace.path(), &["info"]);

        let package = assemble(workspace.path(), output.path(), "x-1.0.0.mkp");
        assert_eq!(list_entries(&package.path).unwrap(), vec!["info"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_package_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let workspace = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        populate(workspace.path(), &["info"]);

        let package = assemble(workspace.path(), output.path(), "x-1.0.0.mkp");
        let mode = fs::metadata(&package.path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_interrupt_before_persist_leaves_nothing() {
        let workspace = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        populate(workspace.path(), &["info", "info.json"]);
        let flag = InterruptFlag::new();
        flag.raise();

        let err = assemble_package(workspace.path(), output.path(), "x-1.0.0.mkp", &flag)
            .unwrap_err();

        assert!(matches!(err, BuildError::Interrupted));
        assert!(output_files(output.path()).is_empty());
    }

    #[test]
    fn test_list_entries_rejects_non_gzip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.mkp");
        fs::write(&path, "not an archive").unwrap();

        assert!(matches!(
            list_entries(&path),
            Err(BuildError::ReadFailed { .. })
        ));
    }
}
