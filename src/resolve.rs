//! Access chains and their resolution into canonical paths.
//!
//! An [`Access`] is the structured description of how a value was reached
//! from a root: a chain of member, positional index, and keyed lookup hops.
//! [`resolve`] walks the chain from the outermost hop back to the root and
//! produces the [`MemberPath`] errors are attributed to.
//!
//! Chains are normally built through [`Selector`](crate::Selector) rather than
//! by hand.

use crate::error::ResolutionError;
use crate::path::{MemberPath, PathSegment};

/// One hop of an access chain, pointing back at the expression it was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Member access. A member without an object is the root of the chain.
    Member {
        /// The accessed object, or `None` at the root.
        object: Option<Box<Access>>,
        /// The member name.
        name: String,
        /// Display name declared for the member, if any.
        display: Option<String>,
    },
    /// Positional array access.
    Index {
        /// The indexed array.
        array: Box<Access>,
        /// The index, evaluated when the hop was taken.
        index: Result<String, ResolutionError>,
    },
    /// Keyed lookup call taking exactly one argument.
    Call {
        /// The receiver of the lookup.
        receiver: Box<Access>,
        /// The key, evaluated when the hop was taken.
        key: Result<String, ResolutionError>,
    },
}

impl Access {
    /// Creates the root member of a chain.
    pub fn root(name: impl Into<String>) -> Self {
        Access::Member {
            object: None,
            name: name.into(),
            display: None,
        }
    }

    /// Returns a member hop taken from this expression.
    pub fn member(self, name: impl Into<String>) -> Self {
        Access::Member {
            object: Some(Box::new(self)),
            name: name.into(),
            display: None,
        }
    }

    /// Returns a positional index hop taken from this expression.
    pub fn index(self, index: Result<String, ResolutionError>) -> Self {
        Access::Index {
            array: Box::new(self),
            index,
        }
    }

    /// Returns a keyed lookup hop taken from this expression.
    pub fn call(self, key: Result<String, ResolutionError>) -> Self {
        Access::Call {
            receiver: Box::new(self),
            key,
        }
    }

    /// Attaches a display name to this hop if it is a member access.
    ///
    /// Other hops are returned unchanged.
    pub fn with_display(self, label: impl Into<String>) -> Self {
        match self {
            Access::Member { object, name, .. } => Access::Member {
                object,
                name,
                display: Some(label.into()),
            },
            other => other,
        }
    }

    /// Returns the display name if the outermost hop is a member carrying one.
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Access::Member { display, .. } => display.as_deref(),
            _ => None,
        }
    }
}

/// Resolves an access chain into a canonical path.
///
/// Segments are collected from the outermost hop back to the root, reversed
/// into root-to-leaf order, and, unless `include_root` is set, the first
/// segment (the root name) is dropped. A missing chain is the root path.
///
/// # Errors
///
/// Returns the [`ResolutionError`] recorded by any index or key hop whose
/// expression failed, or [`ResolutionError::EmptyMember`] for an unnamed member.
///
/// # Example
///
/// ```rust
/// use inquest::resolve::{resolve, Access};
///
/// let chain = Access::root("param")
///     .member("Address")
///     .member("Street")
///     .index(Ok("2".to_string()));
///
/// assert_eq!(resolve(Some(&chain), false).unwrap().to_string(), "Address.Street[2]");
/// assert_eq!(resolve(Some(&chain), true).unwrap().to_string(), "param.Address.Street[2]");
/// assert_eq!(resolve(None, false).unwrap().to_string(), "");
/// ```
pub fn resolve(access: Option<&Access>, include_root: bool) -> Result<MemberPath, ResolutionError> {
    let mut segments = Vec::new();
    let mut node = access;

    while let Some(current) = node {
        match current {
            Access::Call { receiver, key } => {
                segments.push(PathSegment::Index(key.clone()?));
                node = Some(receiver.as_ref());
            }
            Access::Index { array, index } => {
                segments.push(PathSegment::Index(index.clone()?));
                node = Some(array.as_ref());
            }
            Access::Member { object, name, .. } => {
                if name.is_empty() {
                    return Err(ResolutionError::EmptyMember);
                }
                segments.push(PathSegment::Member(name.clone()));
                node = object.as_deref();
            }
        }
    }

    if segments.is_empty() {
        return Ok(MemberPath::root());
    }

    segments.reverse();

    let path = MemberPath::from_segments(segments);
    Ok(if include_root { path } else { path.without_root() })
}

/// Returns the key substituted into `{1}` for a resolved chain.
///
/// This is the last `.`-separated segment of the rendered path, unless the
/// outermost hop is a member with a display name.
pub fn substitution_key(access: Option<&Access>, path: &MemberPath) -> String {
    if let Some(display) = access.and_then(Access::display_name) {
        return display.to_string();
    }

    let rendered = path.to_string();
    match rendered.rsplit_once('.') {
        Some((_, last)) => last.to_string(),
        None => rendered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(i: usize) -> Result<String, ResolutionError> {
        Ok(i.to_string())
    }

    #[test]
    fn test_bare_root_drops_to_empty() {
        let chain = Access::root("value");
        assert_eq!(resolve(Some(&chain), false).unwrap().to_string(), "");
        assert_eq!(resolve(Some(&chain), true).unwrap().to_string(), "value");
    }

    #[test]
    fn test_no_chain_is_root() {
        assert!(resolve(None, true).unwrap().is_root());
    }

    #[test]
    fn test_index_directly_after_root() {
        let chain = Access::root("items").index(idx(2)).member("Name");
        assert_eq!(resolve(Some(&chain), false).unwrap().to_string(), "[2].Name");
        assert_eq!(resolve(Some(&chain), true).unwrap().to_string(), "items[2].Name");
    }

    #[test]
    fn test_call_and_index_render_alike() {
        let chain = Access::root("root")
            .member("Users")
            .call(Ok("alice".to_string()))
            .member("Emails")
            .index(idx(0));
        assert_eq!(
            resolve(Some(&chain), false).unwrap().to_string(),
            "Users[alice].Emails[0]"
        );
    }

    #[test]
    fn test_failed_index_propagates() {
        let chain = Access::root("root")
            .member("Items")
            .index(Err(ResolutionError::IndexEvaluation("boom".to_string())))
            .member("Name");
        assert_eq!(
            resolve(Some(&chain), false),
            Err(ResolutionError::IndexEvaluation("boom".to_string()))
        );
    }

    #[test]
    fn test_empty_member_rejected() {
        let chain = Access::root("root").member("");
        assert_eq!(resolve(Some(&chain), false), Err(ResolutionError::EmptyMember));
    }

    #[test]
    fn test_display_ignored_on_index_hop() {
        let chain = Access::root("root").member("Tags").index(idx(1)).with_display("Tag");
        assert_eq!(chain.display_name(), None);
    }

    #[test]
    fn test_substitution_key_uses_last_segment() {
        let chain = Access::root("root").member("Address").member("Street").index(idx(2));
        let path = resolve(Some(&chain), false).unwrap();
        assert_eq!(substitution_key(Some(&chain), &path), "Street[2]");
    }

    #[test]
    fn test_substitution_key_prefers_display_name() {
        let chain = Access::root("root").member("Age").with_display("Age in years");
        let path = resolve(Some(&chain), false).unwrap();
        assert_eq!(path.to_string(), "Age");
        assert_eq!(chain.display_name(), Some("Age in years"));
        assert_eq!(substitution_key(Some(&chain), &path), "Age in years");
    }
}
