//! INI configuration overlay.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use thiserror::Error;
use tracing::{info, warn};

use super::settings::PackageSettings;

/// Config filename looked up in the working directory and next to the binary.
pub const CONFIG_FILENAME: &str = ".mkp-builder.ini";

/// INI section holding package settings.
pub const CONFIG_SECTION: &str = "package";

/// Errors reading the configuration overlay.
///
/// None of these abort a build; see [`load_overlay`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or parsed.
    #[error("Error reading config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    /// The file has no `[package]` section.
    #[error("No [{}] section found in config file {}", CONFIG_SECTION, .0.display())]
    MissingSection(PathBuf),

    /// A boolean key has a value that is not a recognised boolean.
    #[error("Invalid boolean for '{key}': {value}")]
    InvalidBoolean { key: String, value: String },
}

/// INI dialect of the overlay, matching Python's `configparser`.
///
/// Backslashes and quotes are kept literally; indented lines continue the
/// previous value and are joined with `\n`.
pub fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        enabled_indented_mutiline_value: true,
        ..ParseOption::default()
    }
}

/// Candidate config file locations, in lookup order.
///
/// 1. `<work_dir>/.mkp-builder.ini`
/// 2. `.mkp-builder.ini` next to the running executable
/// 3. `<user config dir>/mkp-builder/config.ini`
pub fn config_candidates(work_dir: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![work_dir.join(CONFIG_FILENAME)];

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join(CONFIG_FILENAME));
    }

    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("mkp-builder").join("config.ini"));
    }

    candidates
}

/// Find the first existing config file for `work_dir`.
pub fn find_config_file(work_dir: &Path) -> Option<PathBuf> {
    config_candidates(work_dir)
        .into_iter()
        .find(|candidate| candidate.is_file())
}

/// Load package settings from an INI file.
pub fn load_settings(path: &Path) -> Result<PackageSettings, ConfigError> {
    let ini = Ini::load_from_file_opt(path, parse_option()).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_settings(&ini).ok_or_else(|| ConfigError::MissingSection(path.to_path_buf()))?
}

/// Extract package settings from a parsed INI document.
///
/// Returns `None` when the `[package]` section is missing. Keys are matched
/// case-insensitively; unknown keys are ignored.
pub fn parse_settings(ini: &Ini) -> Option<Result<PackageSettings, ConfigError>> {
    let section = ini.section(Some(CONFIG_SECTION))?;

    let values: HashMap<String, String> = section
        .iter()
        .map(|(key, value)| (key.trim().to_lowercase(), value.trim().to_string()))
        .collect();
    let get = |key: &str| values.get(key).cloned();

    let validate_python = match values.get("validate_python") {
        Some(value) => match parse_bool(value) {
            Some(flag) => Some(flag),
            None => {
                return Some(Err(ConfigError::InvalidBoolean {
                    key: "validate_python".to_string(),
                    value: value.clone(),
                }))
            }
        },
        None => None,
    };

    Some(Ok(PackageSettings {
        name: get("name"),
        title: get("title"),
        author: get("author"),
        description: get("description"),
        download_url: get("download_url"),
        version: None,
        version_min_required: get("version.min_required"),
        version_packaged: get("version.packaged"),
        version_usable_until: get("version.usable_until"),
        validate_python,
    }))
}

/// Load the overlay, downgrading every problem to a warning.
///
/// An explicit path is used as-is; otherwise the [`config_candidates`] are
/// searched. Returns `None` when no usable overlay exists.
pub fn load_overlay(work_dir: &Path, explicit: Option<&Path>) -> Option<PackageSettings> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match find_config_file(work_dir) {
            Some(path) => path,
            None => {
                warn!("No configuration file found");
                return None;
            }
        },
    };

    info!("Loading configuration from {}", path.display());

    match load_settings(&path) {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

/// Parse an INI boolean the way Python's `configparser` does.
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}
