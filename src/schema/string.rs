//! String member rules.
//!
//! This module provides [`StringSchema`] for checking text members with
//! constraints like presence, minimum/maximum length and regex patterns.

use regex::Regex;

use crate::schema::traits::{Field, MemberRule, TextValue};
use crate::validation::Violation;

/// A constraint applied to string values.
#[derive(Clone)]
enum StringConstraint {
    Required {
        message: Option<String>,
    },
    MinLength {
        min: usize,
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        message: Option<String>,
    },
    Pattern {
        regex: Regex,
        pattern_str: String,
        message: Option<String>,
    },
}

/// A rule for text members.
///
/// `StringSchema` checks any [`TextValue`]: `String`, `str`, `Cow<str>`,
/// `Option`s of those, and `serde_json::Value`. All constraint violations are
/// accumulated rather than short-circuiting on the first failure. An absent
/// value only fails [`required`](StringSchema::required); a present value
/// that is not text fails the type check.
///
/// # Example
///
/// ```rust
/// use inquest::{Field, MemberRule, Schema};
///
/// let schema = Schema::string()
///     .min_len(3)
///     .max_len(20)
///     .pattern(r"^[a-z]+$")
///     .unwrap();
///
/// let violations = schema.check("AB", &Field::new("Login", "Login"));
/// // Both too short and pattern mismatch
/// assert_eq!(violations.len(), 2);
/// ```
#[derive(Clone)]
pub struct StringSchema {
    constraints: Vec<StringConstraint>,
    type_error_message: Option<String>,
}

impl StringSchema {
    /// Creates a new string schema with no constraints.
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            type_error_message: None,
        }
    }

    /// Requires a value with at least one non-whitespace character.
    pub fn required(mut self) -> Self {
        self.constraints.push(StringConstraint::Required { message: None });
        self
    }

    /// Adds a minimum length constraint.
    ///
    /// The string must have at least `min` characters (Unicode scalar values).
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints.push(StringConstraint::MinLength { min, message: None });
        self
    }

    /// Adds a maximum length constraint.
    ///
    /// The string must have at most `max` characters (Unicode scalar values).
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints.push(StringConstraint::MaxLength { max, message: None });
        self
    }

    /// Adds a regex pattern constraint.
    ///
    /// Returns an error if the regex pattern is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Field, MemberRule, Schema};
    ///
    /// let schema = Schema::string().pattern(r"^\d+$").unwrap();
    /// let field = Field::new("Zip", "Zip");
    ///
    /// assert!(schema.check("12345", &field).is_empty());
    /// assert!(!schema.check("abc", &field).is_empty());
    /// assert!(Schema::string().pattern(r"[invalid").is_err());
    /// ```
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.constraints.push(StringConstraint::Pattern {
            regex,
            pattern_str: pattern.to_string(),
            message: None,
        });
        Ok(self)
    }

    /// Sets a custom error message for the most recent constraint.
    ///
    /// If no constraints have been added yet, this sets the type error message
    /// (used when the value is present but not text). The message may use
    /// `{0}` for the member's display name and `{1}` for the offending text.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Field, MemberRule, Schema};
    ///
    /// let schema = Schema::string()
    ///     .min_len(5)
    ///     .error("{0} '{1}' is too short");
    ///
    /// let violations = schema.check("hi", &Field::new("UserName", "User name"));
    /// assert_eq!(violations[0].message(), "User name 'hi' is too short");
    /// ```
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                StringConstraint::Required { message: m } => *m = Some(message.into()),
                StringConstraint::MinLength { message: m, .. } => *m = Some(message.into()),
                StringConstraint::MaxLength { message: m, .. } => *m = Some(message.into()),
                StringConstraint::Pattern { message: m, .. } => *m = Some(message.into()),
            }
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }
}

impl Default for StringSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: TextValue + ?Sized> MemberRule<V> for StringSchema {
    fn check(&self, value: &V, field: &Field<'_>) -> Vec<Violation> {
        match value.text() {
            Some(text) => self
                .constraints
                .iter()
                .filter_map(|c| check_constraint(c, text, field))
                .collect(),
            None if value.is_present() => vec![field.violation(
                self.type_error_message.as_deref(),
                "",
                || format!("{} must be a string", field.display()),
            )],
            None => self
                .constraints
                .iter()
                .filter_map(|c| match c {
                    StringConstraint::Required { message } => Some(field.violation(
                        message.as_deref(),
                        "",
                        || format!("{} is required", field.display()),
                    )),
                    _ => None,
                })
                .collect(),
        }
    }
}

/// Checks a single constraint against present text.
fn check_constraint(
    constraint: &StringConstraint,
    value: &str,
    field: &Field<'_>,
) -> Option<Violation> {
    match constraint {
        StringConstraint::Required { message } => {
            if value.trim().is_empty() {
                Some(field.violation(message.as_deref(), value, || {
                    format!("{} is required", field.display())
                }))
            } else {
                None
            }
        }
        StringConstraint::MinLength { min, message } => {
            let len = value.chars().count();
            if len < *min {
                Some(field.violation(message.as_deref(), value, || {
                    format!("{} length must be at least {}, got {}", field.display(), min, len)
                }))
            } else {
                None
            }
        }
        StringConstraint::MaxLength { max, message } => {
            let len = value.chars().count();
            if len > *max {
                Some(field.violation(message.as_deref(), value, || {
                    format!("{} length must be at most {}, got {}", field.display(), max, len)
                }))
            } else {
                None
            }
        }
        StringConstraint::Pattern {
            regex,
            pattern_str,
            message,
        } => {
            if !regex.is_match(value) {
                Some(field.violation(message.as_deref(), value, || {
                    format!("{} must match pattern '{}'", field.display(), pattern_str)
                }))
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field() -> Field<'static> {
        Field::new("Name", "Name")
    }

    fn messages(violations: Vec<Violation>) -> Vec<String> {
        violations.into_iter().map(|v| v.message().to_string()).collect()
    }

    #[test]
    fn test_no_constraints_accepts_any_text() {
        let schema = StringSchema::new();
        assert!(schema.check("", &field()).is_empty());
        assert!(schema.check(&None::<String>, &field()).is_empty());
    }

    #[test]
    fn test_required() {
        let schema = StringSchema::new().required();
        assert!(schema.check("x", &field()).is_empty());
        assert_eq!(messages(schema.check("  ", &field())), vec!["Name is required"]);
        assert_eq!(
            messages(schema.check(&None::<String>, &field())),
            vec!["Name is required"]
        );
        assert_eq!(messages(schema.check(&json!(null), &field())), vec!["Name is required"]);
    }

    #[test]
    fn test_absent_value_skips_length_rules() {
        let schema = StringSchema::new().min_len(3).max_len(5);
        assert!(schema.check(&None::<String>, &field()).is_empty());
    }

    #[test]
    fn test_min_len_constraint() {
        let schema = StringSchema::new().min_len(5);
        assert!(schema.check("hello", &field()).is_empty());
        assert_eq!(
            messages(schema.check("hi", &field())),
            vec!["Name length must be at least 5, got 2"]
        );
    }

    #[test]
    fn test_max_len_constraint() {
        let schema = StringSchema::new().max_len(3);
        assert!(schema.check("", &field()).is_empty());
        assert_eq!(
            messages(schema.check("hello", &field())),
            vec!["Name length must be at most 3, got 5"]
        );
    }

    #[test]
    fn test_pattern_error_includes_pattern() {
        let schema = StringSchema::new().pattern(r"^\d+$").unwrap();
        let violations = schema.check("abc", &field());
        assert!(violations[0].message().contains(r"^\d+$"));
    }

    #[test]
    fn test_error_accumulation() {
        let schema = StringSchema::new().min_len(10).pattern(r"^\d+$").unwrap();
        let violations = schema.check("abc", &field());
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.members() == ["Name"]));
    }

    #[test]
    fn test_custom_error_targets_last_constraint() {
        let schema = StringSchema::new()
            .min_len(5)
            .error("too short")
            .max_len(1);
        assert_eq!(
            messages(schema.check("abc", &field())),
            vec!["too short", "Name length must be at most 1, got 3"]
        );
    }

    #[test]
    fn test_type_error_for_non_text_json() {
        let schema = StringSchema::new().min_len(1);
        assert_eq!(messages(schema.check(&json!(42), &field())), vec!["Name must be a string"]);

        let schema = StringSchema::new().error("{0} needs text");
        assert_eq!(messages(schema.check(&json!(true), &field())), vec!["Name needs text"]);
    }

    #[test]
    fn test_unicode_length() {
        let schema = StringSchema::new().min_len(3).max_len(5);
        assert!(schema.check("日本語", &field()).is_empty());
        assert_eq!(schema.check("🎉🎊", &field()).len(), 1);
    }

    #[test]
    fn test_uses_display_name() {
        let schema = StringSchema::new().required();
        let violations = schema.check("", &Field::new("Nm", "Full name"));
        assert_eq!(violations[0].message(), "Full name is required");
        assert_eq!(violations[0].members(), ["Nm"]);
    }
}
