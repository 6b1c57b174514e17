//! Whitespace-delimited tag lists.
//!
//! A transform carries a free-form tag string such as `"NoSave Plant"`,
//! which holds the tags `NoSave` and `Plant`. Matching is by whole token and
//! case-sensitive.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A set of tags stored as a single space-separated string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(String);

impl Tags {
    /// Create a tag list from a raw string. Runs of whitespace are collapsed.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    /// The tags as a single space-separated string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.iter().any(|t| t == tag)
    }

    /// Append `tag` unless it is already present. Returns `true` if added.
    ///
    /// Tags cannot contain whitespace; anything after the first whitespace
    /// run is added as further tags.
    pub fn insert(&mut self, tag: &str) -> bool {
        let mut added = false;
        for part in tag.split_whitespace() {
            if self.contains(part) {
                continue;
            }
            if !self.0.is_empty() {
                self.0.push(' ');
            }
            self.0.push_str(part);
            added = true;
        }
        added
    }

    /// Remove every occurrence of `tag`. Returns `true` if anything was
    /// removed.
    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.iter().count();
        let kept: Vec<&str> = self.iter().filter(|t| *t != tag).collect();
        let removed = kept.len() != before;
        if removed {
            self.0 = kept.join(" ");
        }
        removed
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_collapses_whitespace() {
        let tags = Tags::new("  NoSave \t Plant ");
        assert_eq!(tags.as_str(), "NoSave Plant");
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["NoSave", "Plant"]);
        assert!(Tags::new("   ").is_empty());
    }

    #[test]
    fn test_contains_matches_whole_tokens() {
        let tags = Tags::new("NoSave Plant");
        assert!(tags.contains("Plant"));
        assert!(!tags.contains("Plan"));
        assert!(!tags.contains("plant"));
    }

    #[test]
    fn test_insert() {
        let mut tags = Tags::default();
        assert!(tags.insert("Plant"));
        assert!(!tags.insert("Plant"));
        assert!(tags.insert("Tree Big"));
        assert_eq!(tags.as_str(), "Plant Tree Big");
    }

    #[test]
    fn test_remove() {
        let mut tags = Tags::new("Plant Tree Plant Big");
        assert!(tags.remove("Plant"));
        assert_eq!(tags.as_str(), "Tree Big");
        assert!(!tags.remove("Tre"));
        assert!(tags.remove("Big"));
        assert!(tags.remove("Tree"));
        assert!(tags.is_empty());
    }
}
