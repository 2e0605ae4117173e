//! Recorded failures and their frozen, queryable snapshot.
//!
//! This module provides [`ErrorEntry`] for a single recorded failure and
//! [`ErrorList`] for the read-only view handed back to callers.

use std::fmt::{self, Display};
use std::ops::Deref;

use indexmap::IndexSet;
use stillwater::prelude::*;

/// A single recorded failure.
///
/// `ErrorEntry` pairs an already formatted message with the ordered set of
/// canonical paths it is attributed to. An entry with no paths, or with the
/// empty path among them, is a root-level error.
///
/// Entries are created by [`ErrorBuilder`](crate::ErrorBuilder) and are
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    message: String,
    paths: IndexSet<String>,
}

impl ErrorEntry {
    pub(crate) fn new<I, S>(message: String, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message,
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the formatted message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the paths this entry is attributed to, in insertion order.
    pub fn paths(&self) -> &IndexSet<String> {
        &self.paths
    }

    /// Returns true if this entry is not tied to any specific member.
    pub fn is_root_level(&self) -> bool {
        self.paths.is_empty() || self.paths.contains("")
    }

    /// Returns true if this entry is attributed to exactly `path`.
    pub fn is_at(&self, path: &str) -> bool {
        self.paths.contains(path)
    }
}

impl Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Returns the message of the first root-level entry, or `""`.
pub(crate) fn headline(entries: &[ErrorEntry]) -> &str {
    entries
        .iter()
        .find(|e| e.is_root_level())
        .map(|e| e.message.as_str())
        .unwrap_or("")
}

/// A frozen snapshot of the errors collected by an [`ErrorBuilder`](crate::ErrorBuilder).
///
/// `ErrorList` behaves like a read-only slice of [`ErrorEntry`] in insertion
/// order, can be queried by path, and displays as its headline message (the
/// first root-level error at extraction time).
///
/// # Example
///
/// ```rust
/// use inquest::ErrorBuilder;
///
/// let mut builder = ErrorBuilder::new();
/// builder.add("request is malformed").unwrap();
/// builder.add_keyed("{1} must be positive, got {0}", -3, "Age").unwrap();
///
/// let errors = builder.errors();
/// assert_eq!(errors.len(), 2);
/// assert_eq!(errors.to_string(), "request is malformed");
/// assert_eq!(errors.lookup("Age"), Some("Age must be positive, got -3"));
/// assert_eq!(errors.lookup("Name"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorList {
    error_message: String,
    entries: Vec<ErrorEntry>,
}

impl ErrorList {
    pub(crate) fn new(error_message: String, entries: Vec<ErrorEntry>) -> Self {
        Self {
            error_message,
            entries,
        }
    }

    /// Returns the headline message frozen at extraction time.
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// Returns the message of the first entry attributed to exactly `path`.
    ///
    /// Comparison is ordinal and case-sensitive.
    pub fn lookup(&self, path: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.is_at(path))
            .map(ErrorEntry::message)
    }

    /// Returns all entries attributed to exactly `path`.
    pub fn at_path(&self, path: &str) -> Vec<&ErrorEntry> {
        self.entries.iter().filter(|e| e.is_at(path)).collect()
    }

    /// Returns an iterator over the entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ErrorEntry> {
        self.entries.iter()
    }

    /// Converts this snapshot into a `Vec<ErrorEntry>`.
    pub fn into_vec(self) -> Vec<ErrorEntry> {
        self.entries
    }
}

impl Deref for ErrorList {
    type Target = [ErrorEntry];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl Semigroup for ErrorList {
    fn combine(self, other: Self) -> Self {
        let mut entries = self.entries;
        entries.extend(other.entries);
        let error_message = headline(&entries).to_string();
        ErrorList::new(error_message, entries)
    }
}

impl Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.error_message)
    }
}

impl std::error::Error for ErrorList {}

impl IntoIterator for ErrorList {
    type Item = ErrorEntry;
    type IntoIter = std::vec::IntoIter<ErrorEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a ErrorEntry;
    type IntoIter = std::slice::Iter<'a, ErrorEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// Snapshots are handed across threads as failure payloads.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ErrorEntry>();
    assert_sync::<ErrorEntry>();
    assert_send::<ErrorList>();
    assert_sync::<ErrorList>();
};

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str, paths: &[&str]) -> ErrorEntry {
        ErrorEntry::new(message.to_string(), paths.iter().copied())
    }

    #[test]
    fn test_root_level_detection() {
        assert!(entry("a", &[]).is_root_level());
        assert!(entry("b", &[""]).is_root_level());
        assert!(entry("c", &["Name", ""]).is_root_level());
        assert!(!entry("d", &["Name"]).is_root_level());
    }

    #[test]
    fn test_paths_are_deduplicated_in_order() {
        let e = entry("a", &["B", "A", "B"]);
        let paths: Vec<_> = e.paths().iter().map(String::as_str).collect();
        assert_eq!(paths, vec!["B", "A"]);
    }

    #[test]
    fn test_headline_picks_first_root_entry() {
        let entries = vec![
            entry("field", &["Name"]),
            entry("first root", &[""]),
            entry("second root", &[]),
        ];
        assert_eq!(headline(&entries), "first root");
        assert_eq!(headline(&entries[..1]), "");
    }

    #[test]
    fn test_lookup_first_match_wins() {
        let list = ErrorList::new(
            String::new(),
            vec![
                entry("first", &["Age"]),
                entry("second", &["Age", "Name"]),
            ],
        );
        assert_eq!(list.lookup("Age"), Some("first"));
        assert_eq!(list.lookup("Name"), Some("second"));
        assert_eq!(list.at_path("Age").len(), 2);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let list = ErrorList::new(String::new(), vec![entry("bad", &["Age"])]);
        assert_eq!(list.lookup("age"), None);
    }

    #[test]
    fn test_combine_recomputes_headline() {
        let left = ErrorList::new(String::new(), vec![entry("field", &["Name"])]);
        let right = ErrorList::new("root".to_string(), vec![entry("root", &[])]);

        let combined = left.combine(right);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.error_message(), "root");
        assert_eq!(combined[0].message(), "field");
    }

    #[test]
    fn test_display_is_headline() {
        let list = ErrorList::new("headline".to_string(), vec![entry("headline", &[])]);
        assert_eq!(list.to_string(), "headline");
    }
}
