//! Collected file groups.

use std::collections::{BTreeMap, HashSet};

use super::types::Section;

/// Relative file paths belonging to one section.
///
/// Paths are kept in discovery order and are unique within the group:
/// inserting a path that is already present is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileGroup {
    paths: Vec<String>,
    seen: HashSet<String>,
}

impl FileGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path, returning `false` if it was already present.
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.paths.push(path);
        true
    }

    /// Paths in discovery order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn contains(&self, path: &str) -> bool {
        self.seen.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FileGroup {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut group = FileGroup::new();
        for path in iter {
            group.insert(path);
        }
        group
    }
}

/// File groups for all sections.
///
/// Every section is always present, possibly with an empty group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroups {
    groups: BTreeMap<Section, FileGroup>,
}

impl Default for FileGroups {
    fn default() -> Self {
        Self {
            groups: Section::ALL
                .iter()
                .map(|section| (*section, FileGroup::new()))
                .collect(),
        }
    }
}

impl FileGroups {
    /// Create a map with an empty group per section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the group for a section.
    pub fn get(&self, section: Section) -> &FileGroup {
        // Populated for every section on construction.
        &self.groups[&section]
    }

    /// Replace the group for a section.
    pub fn set(&mut self, section: Section, group: FileGroup) {
        self.groups.insert(section, group);
    }

    /// Iterate sections and groups in packaging order.
    pub fn iter(&self) -> impl Iterator<Item = (Section, &FileGroup)> {
        self.groups.iter().map(|(section, group)| (*section, group))
    }

    /// Total number of files across all sections.
    pub fn total_files(&self) -> usize {
        self.groups.values().map(FileGroup::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_preserves_discovery_order() {
        let group: FileGroup = ["b.py", "a.py", "c.py"].into_iter().collect();
        assert_eq!(group.paths(), &["b.py", "a.py", "c.py"]);
    }

    #[test]
    fn test_group_collapses_duplicates() {
        let mut group = FileGroup::new();
        assert!(group.insert("agent_based/foo.py"));
        assert!(group.insert("foo/rulesets/foo.py"));
        assert!(!group.insert("agent_based/foo.py"));

        assert_eq!(group.len(), 2);
        assert_eq!(group.paths()[0], "agent_based/foo.py");
        assert!(group.contains("foo/rulesets/foo.py"));
    }

    #[test]
    fn test_groups_have_every_section() {
        let groups = FileGroups::new();
        let sections: Vec<Section> = groups.iter().map(|(s, _)| s).collect();
        assert_eq!(sections, Section::ALL.to_vec());
        assert!(groups.iter().all(|(_, g)| g.is_empty()));
        assert_eq!(groups.total_files(), 0);
    }

    #[test]
    fn test_groups_set_and_get() {
        let mut groups = FileGroups::new();
        groups.set(Section::Agents, ["plugins/myagent"].into_iter().collect());

        assert_eq!(groups.get(Section::Agents).paths(), &["plugins/myagent"]);
        assert!(groups.get(Section::Library).is_empty());
        assert_eq!(groups.total_files(), 1);
    }
}
