//! Build configuration.
//!
//! Configuration is resolved once, in three tiers, into an immutable
//! [`BuildConfiguration`]:
//!
//! 1. Built-in defaults
//! 2. An optional INI overlay (`.mkp-builder.ini`, `[package]` section)
//! 3. Explicit overrides from the command line
//!
//! Later tiers win field by field. Problems with the overlay never fail a
//! build: they are logged as warnings and the defaults are used instead.
//!
//! # Config File Format
//!
//! ```ini
//! [package]
//! name = myagent
//! title = My Agent
//! author = Jane Doe <jane@example.com>
//! description = Monitors my things
//! download_url = https://example.com/myagent
//! version.min_required = 2.3.0p1
//! version.packaged = 2.3.0p34
//! version.usable_until = 2.5.0
//! validate_python = yes
//! ```

mod file;
mod settings;
mod size;

pub use file::{
    config_candidates, find_config_file, load_overlay, load_settings, parse_settings,
    ConfigError, CONFIG_FILENAME, CONFIG_SECTION,
};
pub use settings::{BuildConfiguration, PackageSettings, DEFAULT_EXCLUDED_DIRS};
pub use size::format_size;
