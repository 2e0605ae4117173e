//! Selectors: typed references to a member or element of a root value.
//!
//! A [`Selector`] walks from a named root value to a target value one hop at a
//! time, recording each hop in an [`Access`] chain. The chain is what
//! [`resolve`](crate::resolve::resolve) turns into a canonical path, and the
//! target is the value substituted into messages, so callers never hand-write
//! a path string.
//!
//! # Example
//!
//! ```rust
//! use inquest::Selector;
//!
//! struct Address { street: Vec<String> }
//! struct Param { address: Address }
//!
//! let param = Param {
//!     address: Address { street: vec!["a".into(), "b".into(), "c".into()] },
//! };
//!
//! let street = Selector::new("param", &param)
//!     .field("Address", |p| &p.address)
//!     .field("Street", |a| &a.street)
//!     .index(2);
//!
//! assert_eq!(street.path(false).unwrap().to_string(), "Address.Street[2]");
//! assert_eq!(street.path(true).unwrap().to_string(), "param.Address.Street[2]");
//! assert_eq!(street.target().unwrap(), "c");
//! ```

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::{self, Display};
use std::hash::{BuildHasher, Hash};

use indexmap::{Equivalent, IndexMap};
use serde_json::Value;

use crate::error::ResolutionError;
use crate::path::MemberPath;
use crate::registry::RuleRegistry;
use crate::resolve::{self, Access};
use crate::validation::Validate;

/// Containers whose elements can be reached by a single index or key.
///
/// Implemented for the standard sequences (positional `usize` access), the
/// standard and `indexmap` maps (keyed access through `Borrow`/`Equivalent`),
/// and `serde_json::Value` arrays and objects.
pub trait Lookup<K: ?Sized> {
    /// The element type.
    type Output: ?Sized;

    /// Returns the element at `key`, or `None` if there is none.
    fn lookup(&self, key: &K) -> Option<&Self::Output>;
}

impl<T> Lookup<usize> for [T] {
    type Output = T;

    fn lookup(&self, key: &usize) -> Option<&T> {
        self.get(*key)
    }
}

impl<T> Lookup<usize> for Vec<T> {
    type Output = T;

    fn lookup(&self, key: &usize) -> Option<&T> {
        self.as_slice().get(*key)
    }
}

impl<T, const N: usize> Lookup<usize> for [T; N] {
    type Output = T;

    fn lookup(&self, key: &usize) -> Option<&T> {
        self.as_slice().get(*key)
    }
}

impl<T> Lookup<usize> for VecDeque<T> {
    type Output = T;

    fn lookup(&self, key: &usize) -> Option<&T> {
        self.get(*key)
    }
}

impl<K, V, Q, S> Lookup<Q> for HashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: Eq + Hash + ?Sized,
    S: BuildHasher,
{
    type Output = V;

    fn lookup(&self, key: &Q) -> Option<&V> {
        self.get(key)
    }
}

impl<K, V, Q> Lookup<Q> for BTreeMap<K, V>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = V;

    fn lookup(&self, key: &Q) -> Option<&V> {
        self.get(key)
    }
}

impl<K, V, Q, S> Lookup<Q> for IndexMap<K, V, S>
where
    K: Eq + Hash,
    Q: Hash + Equivalent<K> + ?Sized,
    S: BuildHasher,
{
    type Output = V;

    fn lookup(&self, key: &Q) -> Option<&V> {
        self.get(key)
    }
}

impl Lookup<usize> for Value {
    type Output = Value;

    fn lookup(&self, key: &usize) -> Option<&Value> {
        self.as_array().and_then(|items| items.get(*key))
    }
}

impl Lookup<str> for Value {
    type Output = Value;

    fn lookup(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|fields| fields.get(key))
    }
}

/// A typed reference to a value reached from a named root.
///
/// Each hop projects the current value and records how it was reached:
///
/// - [`field`](Selector::field) and [`member`](Selector::member) for member access,
/// - [`index`](Selector::index) and [`try_index`](Selector::try_index) for
///   positional access,
/// - [`get`](Selector::get) for keyed lookups.
///
/// Index and key expressions are evaluated once, when the hop is taken. If an
/// index expression fails, or the container has no element there, the
/// selector carries a [`ResolutionError`] that [`target`](Selector::target)
/// (and, for failed expressions, [`path`](Selector::path)) returns.
///
/// A selector with no hops beyond its root refers to the root value itself
/// and resolves to the empty (root-level) path unless the root segment is
/// included.
pub struct Selector<'a, T: ?Sized> {
    target: Result<&'a T, ResolutionError>,
    access: Access,
    declared: Option<DisplayLookup>,
}

/// Looks up the display name an owner's rules declare for a member.
type DisplayLookup = fn(&RuleRegistry, &str) -> Option<String>;

impl<'a, T: ?Sized> Selector<'a, T> {
    /// Creates a selector rooted at `value`, known to callers as `root`.
    pub fn new(root: impl Into<String>, value: &'a T) -> Self {
        Self {
            target: Ok(value),
            access: Access::root(root),
            declared: None,
        }
    }

    /// Takes a member hop, projecting the current value with `project`.
    pub fn field<U, F>(self, name: impl Into<String>, project: F) -> Selector<'a, U>
    where
        U: ?Sized,
        F: FnOnce(&'a T) -> &'a U,
    {
        Selector {
            target: self.target.map(project),
            access: self.access.member(name),
            declared: None,
        }
    }

    /// Takes a member hop whose display name is declared in the owner's rules.
    ///
    /// The display name is looked up when the selector is reported, in the
    /// registry of the reporting builder. It only changes the key substituted
    /// into messages, never the resolved path.
    pub fn member<U, F>(self, name: impl Into<String>, project: F) -> Selector<'a, U>
    where
        T: Validate,
        U: ?Sized,
        F: FnOnce(&'a T) -> &'a U,
    {
        Selector {
            declared: Some(RuleRegistry::display_name::<T>),
            ..self.field(name, project)
        }
    }

    /// Declares a display name for the outermost member hop.
    ///
    /// Has no effect when the outermost hop is an index or key lookup.
    pub fn display_name(self, label: impl Into<String>) -> Self {
        Self {
            target: self.target,
            access: self.access.with_display(label),
            declared: self.declared,
        }
    }

    /// Takes a positional index hop.
    pub fn index(self, index: usize) -> Selector<'a, T::Output>
    where
        T: Lookup<usize>,
    {
        let key = index.to_string();
        let target = self.target.and_then(|container| {
            container
                .lookup(&index)
                .ok_or_else(|| ResolutionError::MissingElement { key: key.clone() })
        });

        Selector {
            target,
            access: self.access.index(Ok(key)),
            declared: None,
        }
    }

    /// Takes a positional index hop whose index expression may fail.
    ///
    /// The expression runs exactly once. Its error is recorded as
    /// [`ResolutionError::IndexEvaluation`].
    pub fn try_index<E, F>(self, index: F) -> Selector<'a, T::Output>
    where
        T: Lookup<usize>,
        E: Display,
        F: FnOnce() -> Result<usize, E>,
    {
        match index() {
            Ok(index) => self.index(index),
            Err(err) => {
                let failure = ResolutionError::IndexEvaluation(err.to_string());
                Selector {
                    target: Err(failure.clone()),
                    access: self.access.index(Err(failure)),
                    declared: None,
                }
            }
        }
    }

    /// Takes a keyed lookup hop.
    pub fn get<K>(self, key: &K) -> Selector<'a, <T as Lookup<K>>::Output>
    where
        K: Display + ?Sized,
        T: Lookup<K>,
    {
        let rendered = key.to_string();
        let target = self.target.and_then(|container| {
            container
                .lookup(key)
                .ok_or_else(|| ResolutionError::MissingElement {
                    key: rendered.clone(),
                })
        });

        Selector {
            target,
            access: self.access.call(Ok(rendered)),
            declared: None,
        }
    }

    /// Returns the selected value.
    pub fn target(&self) -> Result<&'a T, ResolutionError> {
        self.target.clone()
    }

    /// Returns the access chain recorded so far.
    pub fn access(&self) -> &Access {
        &self.access
    }

    /// Resolves the canonical path of the selected value.
    pub fn path(&self, include_root: bool) -> Result<MemberPath, ResolutionError> {
        resolve::resolve(Some(&self.access), include_root)
    }

    /// Returns the key substituted into `{1}` when this selector is reported.
    ///
    /// Display names declared through [`member`](Selector::member) are looked
    /// up in `registry`.
    pub fn substitution_key(
        &self,
        registry: &RuleRegistry,
        include_root: bool,
    ) -> Result<String, ResolutionError> {
        let path = self.path(include_root)?;
        Ok(self.key_for(registry, &path))
    }

    pub(crate) fn key_for(&self, registry: &RuleRegistry, path: &MemberPath) -> String {
        let declared = match (&self.access, self.declared) {
            (Access::Member { name, display: None, .. }, Some(lookup)) => lookup(registry, name),
            _ => None,
        };
        declared.unwrap_or_else(|| resolve::substitution_key(Some(&self.access), path))
    }

    /// Names a single member of the selected value for property validation.
    pub fn property(self, name: impl Into<String>) -> Property<'a, T>
    where
        T: Validate,
    {
        Property {
            owner: self.target,
            name: name.into(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Selector<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("access", &self.access)
            .field("resolved", &self.target.is_ok())
            .finish()
    }
}

/// A single member of an owning instance, validated on its own.
///
/// Created with [`Selector::property`] and consumed by
/// [`ErrorBuilder::valid_property`](crate::ErrorBuilder::valid_property).
pub struct Property<'a, T> {
    owner: Result<&'a T, ResolutionError>,
    name: String,
}

impl<'a, T> Property<'a, T> {
    /// Returns the owning instance.
    pub fn owner(&self) -> Result<&'a T, ResolutionError> {
        self.owner.clone()
    }

    /// Returns the member name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Order {
        items: Vec<String>,
        totals: HashMap<String, i64>,
    }

    fn order() -> Order {
        let mut totals = HashMap::new();
        totals.insert("eur".to_string(), 12);
        Order {
            items: vec!["pen".into(), "ink".into()],
            totals,
        }
    }

    #[test]
    fn test_root_only_selector() {
        let value = 5;
        let selector = Selector::new("value", &value);
        assert_eq!(selector.path(false).unwrap().to_string(), "");
        assert_eq!(selector.path(true).unwrap().to_string(), "value");
        assert_eq!(*selector.target().unwrap(), 5);
    }

    #[test]
    fn test_index_into_vec() {
        let order = order();
        let selector = Selector::new("order", &order)
            .field("Items", |o| &o.items)
            .index(1);
        assert_eq!(selector.path(false).unwrap().to_string(), "Items[1]");
        assert_eq!(selector.target().unwrap(), "ink");
    }

    #[test]
    fn test_keyed_lookup() {
        let order = order();
        let selector = Selector::new("order", &order)
            .field("Totals", |o| &o.totals)
            .get("eur");
        assert_eq!(selector.path(false).unwrap().to_string(), "Totals[eur]");
        assert_eq!(*selector.target().unwrap(), 12);
    }

    #[test]
    fn test_missing_element_keeps_path() {
        let order = order();
        let selector = Selector::new("order", &order)
            .field("Items", |o| &o.items)
            .index(7);
        assert_eq!(selector.path(false).unwrap().to_string(), "Items[7]");
        assert_eq!(
            selector.target().unwrap_err(),
            ResolutionError::MissingElement {
                key: "7".to_string()
            }
        );
    }

    #[test]
    fn test_failed_index_expression() {
        let order = order();
        let selector = Selector::new("order", &order)
            .field("Items", |o| &o.items)
            .try_index(|| "x".parse::<usize>());
        assert!(matches!(
            selector.path(false),
            Err(ResolutionError::IndexEvaluation(_))
        ));
        assert!(selector.target().is_err());
    }

    #[test]
    fn test_index_expression_runs_once() {
        let order = order();
        let mut calls = 0;
        let selector = Selector::new("order", &order)
            .field("Items", |o| &o.items)
            .try_index(|| {
                calls += 1;
                Ok::<_, String>(0)
            });
        selector.path(false).unwrap();
        selector.path(true).unwrap();
        selector.target().unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_json_document() {
        let doc = json!({"users": [{"email": "a@example.com"}]});
        let selector = Selector::new("doc", &doc)
            .get("users")
            .index(0)
            .get("email");
        assert_eq!(selector.path(false).unwrap().to_string(), "[users][0][email]");
        assert_eq!(selector.target().unwrap(), &json!("a@example.com"));
    }

    #[test]
    fn test_display_name_changes_key_not_path() {
        let order = order();
        let selector = Selector::new("order", &order)
            .field("Items", |o| &o.items)
            .display_name("Line items");
        assert_eq!(selector.path(false).unwrap().to_string(), "Items");
        assert_eq!(
            selector.substitution_key(&RuleRegistry::new(), false).unwrap(),
            "Line items"
        );
    }

    struct Reading {
        celsius: i64,
    }

    impl Validate for Reading {
        fn rules() -> crate::schema::ObjectRules<Self> {
            crate::schema::ObjectRules::new().display("Celsius", "Temperature")
        }
    }

    #[test]
    fn test_member_display_name_comes_from_given_registry() {
        let reading = Reading { celsius: -300 };
        let selector = Selector::new("reading", &reading).member("Celsius", |r| &r.celsius);
        let registry = RuleRegistry::new();

        assert_eq!(selector.path(false).unwrap().to_string(), "Celsius");
        assert_eq!(selector.substitution_key(&registry, false).unwrap(), "Temperature");
        assert!(registry.is_empty());

        let explicit = selector.display_name("Reading");
        assert_eq!(explicit.substitution_key(&registry, false).unwrap(), "Reading");
    }
}
