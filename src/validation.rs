//! Declarative validation of whole objects and single members.
//!
//! Types opt in by implementing [`Validate`], which declares their rules as an
//! [`ObjectRules`] table. The rules are cached per type in a
//! [`RuleRegistry`], and the two entry points of this module run them:
//!
//! - [`validate_object`] runs every rule of every member, the nested objects
//!   and the object-level checks in a single pass.
//! - [`validate_member`] runs only the rules attached to one member.
//!
//! Invalid data is reported as a list of [`Violation`]s, never as an error.
//! The only failure is naming a member the rules do not declare.

use std::any::type_name;
use std::fmt::{self, Display};

use tracing::{debug, warn};

use crate::error::ResolutionError;
use crate::registry::RuleRegistry;
use crate::schema::ObjectRules;

/// A single failed rule: a message and the members it concerns.
///
/// A violation with no members is object-level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    message: String,
    members: Vec<String>,
}

impl Violation {
    /// Creates a violation attributed to `members`.
    pub fn new<I, S>(message: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message: message.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an object-level violation.
    pub fn root(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            members: Vec::new(),
        }
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the member names this violation is attributed to.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Prepends `prefix` to every member name.
    ///
    /// Object-level violations stay object-level.
    pub fn prefixed(self, prefix: &str) -> Self {
        Self {
            message: self.message,
            members: self
                .members
                .into_iter()
                .map(|m| format!("{prefix}{m}"))
                .collect(),
        }
    }

    /// Re-attributes a violation of a nested object to the member holding it.
    pub(crate) fn nested_under(self, member: &str) -> Self {
        if self.members.is_empty() {
            return Self {
                message: self.message,
                members: vec![member.to_string()],
            };
        }
        self.prefixed(&format!("{member}."))
    }

    /// Splits this violation into its message and member names.
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.message, self.members)
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Types with declared validation rules.
///
/// # Example
///
/// ```rust
/// use inquest::{ObjectRules, Schema, Validate};
///
/// struct Person {
///     name: String,
///     age: i64,
/// }
///
/// impl Validate for Person {
///     fn rules() -> ObjectRules<Self> {
///         ObjectRules::new()
///             .field("Name", |p: &Person| &p.name, Schema::string().required().max_len(50))
///             .field("Age", |p: &Person| &p.age, Schema::integer().range(0..=150))
///             .display("Age", "Age in years")
///     }
/// }
/// ```
pub trait Validate: Sized + Send + Sync + 'static {
    /// Declares the rules for this type.
    fn rules() -> ObjectRules<Self>;
}

/// Validation context carries the registry and nesting depth.
///
/// A fresh context starts at depth zero. Following a nested member creates a
/// deeper context; once the registry's maximum depth is reached the nested
/// value is reported instead of validated.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'r> {
    registry: &'r RuleRegistry,
    depth: usize,
    max_depth: usize,
}

impl<'r> ValidationContext<'r> {
    /// Creates a context at depth zero, bounded by the registry's max depth.
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self {
            registry,
            depth: 0,
            max_depth: registry.max_depth(),
        }
    }

    /// Creates a new context with incremented depth.
    pub fn increment_depth(&self) -> Self {
        Self {
            registry: self.registry,
            depth: self.depth + 1,
            max_depth: self.max_depth,
        }
    }

    /// Returns the current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the maximum allowed depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the registry rules are looked up in.
    pub fn registry(&self) -> &'r RuleRegistry {
        self.registry
    }

    /// Runs every rule declared for `T` against `value` at this depth.
    pub fn validate<T: Validate>(&self, value: &T) -> Vec<Violation> {
        self.registry.rules_for::<T>().validate_all(value, self)
    }

    /// Validates a value held by `member`, attributing its violations under it.
    pub(crate) fn nested<T: Validate>(&self, value: &T, member: &str) -> Vec<Violation> {
        if self.depth >= self.max_depth {
            warn!(
                target_type = type_name::<T>(),
                member,
                max_depth = self.max_depth,
                "nested validation exceeded max depth"
            );
            return vec![Violation::new(
                format!("maximum validation depth of {} exceeded", self.max_depth),
                [member],
            )];
        }

        self.increment_depth()
            .validate(value)
            .into_iter()
            .map(|v| v.nested_under(member))
            .collect()
    }
}

/// Validates every member of `value` and its object-level checks.
///
/// # Example
///
/// ```rust
/// use inquest::{validate_object, ObjectRules, RuleRegistry, Schema, Validate};
///
/// struct Login { user: String }
///
/// impl Validate for Login {
///     fn rules() -> ObjectRules<Self> {
///         ObjectRules::new().field("User", |l: &Login| &l.user, Schema::string().required())
///     }
/// }
///
/// let registry = RuleRegistry::new();
/// let violations = validate_object(&registry, &Login { user: " ".into() });
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].members(), ["User"]);
/// ```
pub fn validate_object<T: Validate>(registry: &RuleRegistry, value: &T) -> Vec<Violation> {
    let violations = ValidationContext::new(registry).validate(value);
    debug!(
        target_type = type_name::<T>(),
        violations = violations.len(),
        "validated object"
    );
    violations
}

/// Validates only the rules attached to `member` of `value`.
///
/// # Errors
///
/// Returns [`ResolutionError::UnknownMember`] if the rules of `T` do not
/// declare `member`. Member names are compared ordinally.
pub fn validate_member<T: Validate>(
    registry: &RuleRegistry,
    value: &T,
    member: &str,
) -> Result<Vec<Violation>, ResolutionError> {
    let rules = registry.rules_for::<T>();
    let Some(violations) =
        rules.validate_member(value, member, &ValidationContext::new(registry))
    else {
        debug!(target_type = type_name::<T>(), member, "member has no rules");
        return Err(ResolutionError::UnknownMember(member.to_string()));
    };

    debug!(
        target_type = type_name::<T>(),
        member,
        violations = violations.len(),
        "validated member"
    );
    Ok(violations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_keeps_root_violations_root() {
        let v = Violation::root("bad").prefixed("[0].");
        assert!(v.members().is_empty());

        let v = Violation::new("bad", ["Name"]).prefixed("[3].");
        assert_eq!(v.members(), ["[3].Name"]);
    }

    #[test]
    fn test_nested_under() {
        let v = Violation::new("bad", ["Street", "Zip"]).nested_under("Address");
        assert_eq!(v.members(), ["Address.Street", "Address.Zip"]);

        let v = Violation::root("bad").nested_under("Address");
        assert_eq!(v.members(), ["Address"]);
    }

    #[test]
    fn test_context_depth() {
        let registry = RuleRegistry::new().with_max_depth(3);
        let ctx = ValidationContext::new(&registry);
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.max_depth(), 3);
        assert_eq!(ctx.increment_depth().increment_depth().depth(), 2);
    }

    struct Login {
        user: String,
    }

    impl Validate for Login {
        fn rules() -> ObjectRules<Self> {
            ObjectRules::new().field(
                "User",
                |l: &Login| &l.user,
                crate::schema::StringSchema::new().required(),
            )
        }
    }

    #[test]
    fn test_validate_member_rejects_undeclared_names() {
        let registry = RuleRegistry::new();
        let login = Login {
            user: String::new(),
        };

        assert_eq!(validate_member(&registry, &login, "User").map(|v| v.len()), Ok(1));
        assert_eq!(
            validate_member(&registry, &login, "user"),
            Err(ResolutionError::UnknownMember("user".to_string()))
        );
    }

    #[test]
    fn test_display_is_message() {
        assert_eq!(Violation::new("too short", ["Name"]).to_string(), "too short");
    }
}
