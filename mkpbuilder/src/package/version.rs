//! Package version and Checkmk compatibility range.

use std::sync::OnceLock;

use regex::Regex;

/// Default minimum Checkmk version required by a package.
pub const DEFAULT_MIN_REQUIRED: &str = "2.3.0p1";

/// Default Checkmk version the package is built against.
pub const DEFAULT_PACKAGED: &str = "2.3.0p34";

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+\.\d+\.\d+").expect("version pattern is valid"))
}

/// Check whether a version string starts with `MAJOR.MINOR.PATCH`.
///
/// Anything may follow the numeric triplet, so Checkmk-style patch levels
/// such as `2.3.0p1` are accepted.
///
/// # Example
///
/// ```
/// use mkpbuilder::package::is_valid_version;
///
/// assert!(is_valid_version("1.2.3"));
/// assert!(is_valid_version("2.3.0p34"));
/// assert!(!is_valid_version("1.2"));
/// assert!(!is_valid_version("v1.2.3"));
/// ```
pub fn is_valid_version(version: &str) -> bool {
    version_pattern().is_match(version)
}

/// Version information recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Package version (validated against [`is_valid_version`]).
    pub version: String,

    /// Minimum Checkmk version required.
    pub min_required: String,

    /// Checkmk version the package was built for.
    pub packaged: String,

    /// Last Checkmk version the package works with, if limited.
    pub usable_until: Option<String>,
}

impl VersionInfo {
    /// Create version info with default compatibility settings.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            min_required: DEFAULT_MIN_REQUIRED.to_string(),
            packaged: DEFAULT_PACKAGED.to_string(),
            usable_until: None,
        }
    }

    /// Set the minimum required Checkmk version.
    pub fn with_min_required(mut self, version: impl Into<String>) -> Self {
        self.min_required = version.into();
        self
    }

    /// Set the packaged-with Checkmk version.
    pub fn with_packaged(mut self, version: impl Into<String>) -> Self {
        self.packaged = version.into();
        self
    }

    /// Set the usable-until version. Empty strings clear it.
    pub fn with_usable_until(mut self, version: Option<String>) -> Self {
        self.usable_until = version.filter(|v| !v.is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_versions() {
        for version in ["0.0.0", "1.2.3", "10.20.30", "2.3.0p1", "1.0.0-beta", "1.2.3.4"] {
            assert!(is_valid_version(version), "{} should be valid", version);
        }
    }

    #[test]
    fn test_invalid_versions() {
        for version in ["", "1", "1.2", "1.2.", "a.b.c", "v1.0.0", " 1.0.0", "1..0"] {
            assert!(!is_valid_version(version), "{} should be invalid", version);
        }
    }

    #[test]
    fn test_version_info_defaults() {
        let info = VersionInfo::new("1.0.0");
        assert_eq!(info.version, "1.0.0");
        assert_eq!(info.min_required, DEFAULT_MIN_REQUIRED);
        assert_eq!(info.packaged, DEFAULT_PACKAGED);
        assert!(info.usable_until.is_none());
    }

    #[test]
    fn test_empty_usable_until_is_absent() {
        let info = VersionInfo::new("1.0.0").with_usable_until(Some(String::new()));
        assert!(info.usable_until.is_none());

        let info = VersionInfo::new("1.0.0").with_usable_until(Some("2.4.0".to_string()));
        assert_eq!(info.usable_until.as_deref(), Some("2.4.0"));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_numeric_triplets_are_valid(
                major in 0u32..1000,
                minor in 0u32..1000,
                patch in 0u32..1000,
                suffix in "[a-z0-9.+-]{0,6}"
            ) {
                let version = format!("{}.{}.{}{}", major, minor, patch, suffix);
                prop_assert!(is_valid_version(&version));
            }

            #[test]
            fn test_non_numeric_prefix_is_invalid(
                prefix in "[a-zA-Z_ -]{1,4}",
                rest in "[0-9.]{0,8}"
            ) {
                let version = format!("{}{}", prefix, rest);
                prop_assert!(!is_valid_version(&version));
            }
        }
    }
}
