//! Object rule tables.
//!
//! This module provides [`ObjectRules`], the per-type table of member rules,
//! display names, nested objects and object-level checks that a
//! [`Validate`] implementation declares.

use std::fmt;

use indexmap::IndexMap;

use crate::schema::traits::{Field, MemberRule, SequenceValue};
use crate::validation::{Validate, ValidationContext, Violation};

type MemberCheck<T> =
    Box<dyn Fn(&T, &Field<'_>, &ValidationContext<'_>) -> Vec<Violation> + Send + Sync>;

type ObjectCheck<T> = Box<dyn Fn(&T) -> Vec<Violation> + Send + Sync>;

/// Definition of a member within an object rule table.
struct MemberDef<T> {
    display: Option<String>,
    checks: Vec<MemberCheck<T>>,
}

impl<T> Default for MemberDef<T> {
    fn default() -> Self {
        Self {
            display: None,
            checks: Vec::new(),
        }
    }
}

/// The validation rules declared for a type.
///
/// Members keep the order in which they were first declared, and each member
/// keeps its checks in declaration order, so violations are always reported
/// in the same order.
///
/// # Example
///
/// ```rust
/// use inquest::{ObjectRules, RuleRegistry, Schema, Validate, Violation, validate_object};
///
/// struct Range {
///     low: i64,
///     high: i64,
/// }
///
/// impl Validate for Range {
///     fn rules() -> ObjectRules<Self> {
///         ObjectRules::new()
///             .field("Low", |r: &Range| &r.low, Schema::integer().non_negative())
///             .field("High", |r: &Range| &r.high, Schema::integer().max(100))
///             .custom(|r: &Range| {
///                 if r.low > r.high {
///                     vec![Violation::new("Low must not exceed High", ["Low", "High"])]
///                 } else {
///                     Vec::new()
///                 }
///             })
///     }
/// }
///
/// let registry = RuleRegistry::new();
/// let violations = validate_object(&registry, &Range { low: 7, high: 3 });
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].members(), ["Low", "High"]);
/// ```
pub struct ObjectRules<T> {
    members: IndexMap<String, MemberDef<T>>,
    custom: Vec<ObjectCheck<T>>,
}

impl<T: 'static> ObjectRules<T> {
    /// Creates an empty rule table.
    pub fn new() -> Self {
        Self {
            members: IndexMap::new(),
            custom: Vec::new(),
        }
    }

    /// Attaches `rule` to the member `name`, read through `accessor`.
    ///
    /// A member may be declared several times; its rules run in order.
    pub fn field<V, F, R>(mut self, name: impl Into<String>, accessor: F, rule: R) -> Self
    where
        V: ?Sized + 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
        R: MemberRule<V> + 'static,
    {
        self.member_mut(name).checks.push(Box::new(
            move |value: &T, field: &Field<'_>, _: &ValidationContext<'_>| {
                rule.check(accessor(value), field)
            },
        ));
        self
    }

    /// Declares the display name used for `name` in messages.
    pub fn display(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.member_mut(name).display = Some(label.into());
        self
    }

    /// Validates the member `name` with the rules of its own type.
    ///
    /// Violations of the nested object are attributed to `name.<member>`;
    /// its object-level violations are attributed to `name`.
    pub fn nested<U, F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        U: Validate,
        F: Fn(&T) -> &U + Send + Sync + 'static,
    {
        self.member_mut(name).checks.push(Box::new(
            move |value: &T, field: &Field<'_>, ctx: &ValidationContext<'_>| {
                ctx.nested(accessor(value), field.path())
            },
        ));
        self
    }

    /// Validates every element of the sequence member `name` with the rules
    /// of the element type, attributing violations to `name[i]`.
    pub fn nested_each<S, F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        S: SequenceValue + ?Sized + 'static,
        S::Item: Validate,
        F: Fn(&T) -> &S + Send + Sync + 'static,
    {
        self.member_mut(name).checks.push(Box::new(
            move |value: &T, field: &Field<'_>, ctx: &ValidationContext<'_>| {
                let Some(items) = accessor(value).items() else {
                    return Vec::new();
                };
                items
                    .iter()
                    .enumerate()
                    .flat_map(|(i, item)| ctx.nested(item, &format!("{}[{}]", field.path(), i)))
                    .collect()
            },
        ));
        self
    }

    /// Adds an object-level check, run only when the whole object is validated.
    pub fn custom<F>(mut self, check: F) -> Self
    where
        F: Fn(&T) -> Vec<Violation> + Send + Sync + 'static,
    {
        self.custom.push(Box::new(check));
        self
    }

    fn member_mut(&mut self, name: impl Into<String>) -> &mut MemberDef<T> {
        self.members.entry(name.into()).or_default()
    }
}

impl<T> ObjectRules<T> {
    /// Returns the display name declared for `member`, if any.
    pub fn display_name(&self, member: &str) -> Option<&str> {
        self.members.get(member).and_then(|m| m.display.as_deref())
    }

    /// Returns the declared member names in declaration order.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// Runs every member rule, then every object-level check.
    pub fn validate_all(&self, value: &T, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        let mut violations: Vec<Violation> = self
            .members
            .iter()
            .flat_map(|(name, def)| run_member(name, def, value, ctx))
            .collect();

        violations.extend(self.custom.iter().flat_map(|check| check(value)));
        violations
    }

    /// Returns true if `member` was declared in this table.
    pub fn declares(&self, member: &str) -> bool {
        self.members.contains_key(member)
    }

    /// Runs only the rules attached to `member`.
    ///
    /// Returns `None` if `member` was never declared.
    pub fn validate_member(
        &self,
        value: &T,
        member: &str,
        ctx: &ValidationContext<'_>,
    ) -> Option<Vec<Violation>> {
        self.members
            .get(member)
            .map(|def| run_member(member, def, value, ctx))
    }
}

fn run_member<T>(
    name: &str,
    def: &MemberDef<T>,
    value: &T,
    ctx: &ValidationContext<'_>,
) -> Vec<Violation> {
    let field = Field::new(name, def.display.as_deref().unwrap_or(name));
    def.checks
        .iter()
        .flat_map(|check| check(value, &field, ctx))
        .collect()
}

impl<T: 'static> Default for ObjectRules<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ObjectRules<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRules")
            .field("members", &self.members.keys().collect::<Vec<_>>())
            .field("custom", &self.custom.len())
            .finish()
    }
}
