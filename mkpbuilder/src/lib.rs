//! mkp-builder - Checkmk MKP package builder
//!
//! This library turns a Checkmk plugin project laid out under `local/` into a
//! single distributable MKP archive.
//!
//! # Pipeline
//!
//! ```text
//! Validate ──► Collect ──► Archive(sections) ──► GenerateMetadata ──► Assemble ──► Done
//!    │            │              │                      │                 │
//! validator   collector   archive::section          manifest      archive::assemble
//! ```
//!
//! The [`builder::PackageBuilder`] drives the stages in order against an
//! immutable [`config::BuildConfiguration`] and a scoped build workspace
//! that is removed on every exit path.
//!
//! # Example
//!
//! ```ignore
//! use mkpbuilder::builder::{InterruptFlag, PackageBuilder};
//! use mkpbuilder::config::{BuildConfiguration, PackageSettings};
//!
//! let overrides = PackageSettings {
//!     version: Some("1.0.0".to_string()),
//!     ..Default::default()
//! };
//! let config = BuildConfiguration::resolve(project_root, None, overrides);
//!
//! let report = PackageBuilder::new(config, InterruptFlag::new()).build()?;
//! println!("{} ({})", report.path.display(), report.size_human());
//! ```

pub mod archive;
pub mod builder;
pub mod collector;
pub mod config;
pub mod logging;
pub mod manifest;
pub mod package;
pub mod validator;

/// Library version, reported in the startup banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
