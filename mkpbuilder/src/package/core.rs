//! Core package identity type.
//!
//! The [`PackageIdentity`] struct carries the descriptive fields of an MKP
//! package that end up in its manifest.

use std::fmt;

/// Descriptive identity of a package.
///
/// # Example
///
/// ```
/// use mkpbuilder::package::PackageIdentity;
///
/// let identity = PackageIdentity::new("myagent")
///     .with_author("Jane Doe <jane@example.com>");
///
/// assert_eq!(identity.name, "myagent");
/// assert_eq!(identity.title, "myagent"); // Title defaults to the name
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageIdentity {
    /// Package name, used in the archive filename.
    pub name: String,

    /// Human readable title.
    pub title: String,

    /// Author, typically `Name <email>`.
    pub author: String,

    /// Free-form description.
    pub description: String,

    /// Where the package can be downloaded.
    pub download_url: String,
}

impl PackageIdentity {
    /// Create an identity with the title defaulting to the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            author: String::new(),
            description: String::new(),
            download_url: String::new(),
        }
    }

    /// Set the title. Empty titles fall back to the package name.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        if !title.is_empty() {
            self.title = title;
        }
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = url.into();
        self
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.title == self.name {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.title)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_new() {
        let identity = PackageIdentity::new("myagent");

        assert_eq!(identity.name, "myagent");
        assert_eq!(identity.title, "myagent");
        assert!(identity.author.is_empty());
        assert!(identity.description.is_empty());
        assert!(identity.download_url.is_empty());
    }

    #[test]
    fn test_identity_builder() {
        let identity = PackageIdentity::new("myagent")
            .with_title("My Agent")
            .with_author("Jane")
            .with_description("Monitors things")
            .with_download_url("https://example.com/myagent");

        assert_eq!(identity.title, "My Agent");
        assert_eq!(identity.author, "Jane");
        assert_eq!(identity.description, "Monitors things");
        assert_eq!(identity.download_url, "https://example.com/myagent");
    }

    #[test]
    fn test_empty_title_keeps_name() {
        let identity = PackageIdentity::new("myagent").with_title("");
        assert_eq!(identity.title, "myagent");
    }

    #[test]
    fn test_identity_display() {
        assert_eq!(PackageIdentity::new("foo").to_string(), "foo");
        assert_eq!(
            PackageIdentity::new("foo").with_title("Foo Check").to_string(),
            "foo (Foo Check)"
        );
    }
}
