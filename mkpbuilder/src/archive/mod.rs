//! Archive building for MKP packages.
//!
//! An MKP is a two-level archive:
//!
//! ```text
//! myagent-1.0.0.mkp (tar.gz)
//! ├── info
//! ├── info.json
//! ├── agents.tar              (rooted at local/share/check_mk/agents)
//! ├── cmk_addons_plugins.tar  (rooted at local/lib/python3/cmk_addons/plugins)
//! └── lib.tar                 (rooted at local/lib/python3)
//! ```
//!
//! [`section`] writes the inner, uncompressed archives into the build
//! workspace; [`assemble`] packs them with the manifests into the final
//! compressed file.

pub mod assemble;
pub mod section;

pub use assemble::{assemble_package, list_entries, package_entries, AssembledPackage};
pub use section::{write_section_archive, write_section_archives};
