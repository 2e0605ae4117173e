//! Canonical member paths for locating values in an object graph.
//!
//! This module provides [`MemberPath`] and [`PathSegment`], the structured form
//! of the dotted/indexed addresses (`Orders[3].Item.Sku`) that errors are
//! attributed to.

use std::fmt::{self, Display};

/// A segment of a member path.
///
/// Paths are built from segments that represent either member access or
/// indexed/keyed access. Index keys are stored already formatted, so a
/// positional index (`[2]`) and a map key (`[alice]`) share one variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A member/property access (e.g., `Address`, `Street`)
    Member(String),
    /// An indexed or keyed access (e.g., `[0]`, `[alice]`)
    Index(String),
}

impl PathSegment {
    /// Creates a new member segment.
    pub fn member(name: impl Into<String>) -> Self {
        PathSegment::Member(name.into())
    }

    /// Creates a new index segment from any displayable key.
    pub fn index(key: impl Display) -> Self {
        PathSegment::Index(key.to_string())
    }
}

/// A path to a value, relative to a validation root.
///
/// `MemberPath` renders members joined with `.` and indexes as `[key]`. A
/// leading separator is never rendered, and the empty path renders as `""`,
/// which denotes a root-level error.
///
/// # Example
///
/// ```rust
/// use inquest::MemberPath;
///
/// let path = MemberPath::root()
///     .push_member("Orders")
///     .push_index(3)
///     .push_member("Sku");
///
/// assert_eq!(path.to_string(), "Orders[3].Sku");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MemberPath {
    segments: Vec<PathSegment>,
}

impl MemberPath {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from segments in root-to-leaf order.
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Returns a new path with a member segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_member(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Member(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_index(&self, key: impl Display) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::index(key));
        Self { segments }
    }

    /// Returns the path without its first segment.
    ///
    /// Used to drop the root member name when the root is implied by context.
    pub fn without_root(&self) -> Self {
        Self {
            segments: self.segments.iter().skip(1).cloned().collect(),
        }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }
}

impl Display for MemberPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Member(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(key) => write!(f, "[{}]", key)?,
            }
        }
        Ok(())
    }
}
