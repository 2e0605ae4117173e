//! Integer member rules.
//!
//! This module provides [`IntegerSchema`] for checking integer members with
//! constraints like presence, minimum/maximum value, ranges and sign.

use std::ops::RangeInclusive;

use crate::schema::traits::{Field, IntegerValue, MemberRule};
use crate::validation::Violation;

/// A constraint applied to integer values.
#[derive(Clone)]
enum IntegerConstraint {
    Required { message: Option<String> },
    Min { value: i64, message: Option<String> },
    Max { value: i64, message: Option<String> },
    Positive { message: Option<String> },
    NonNegative { message: Option<String> },
    Negative { message: Option<String> },
}

impl IntegerConstraint {
    fn message_mut(&mut self) -> &mut Option<String> {
        match self {
            IntegerConstraint::Required { message }
            | IntegerConstraint::Min { message, .. }
            | IntegerConstraint::Max { message, .. }
            | IntegerConstraint::Positive { message }
            | IntegerConstraint::NonNegative { message }
            | IntegerConstraint::Negative { message } => message,
        }
    }
}

/// A rule for integer members.
///
/// `IntegerSchema` checks any [`IntegerValue`]: the primitive integers,
/// `Option`s of those, and `serde_json::Value`. Floats in JSON fail the type
/// check. All constraint violations are accumulated.
///
/// # Example
///
/// ```rust
/// use inquest::{Field, MemberRule, Schema};
///
/// let schema = Schema::integer().positive().max(100);
/// let field = Field::new("Quantity", "Quantity");
///
/// assert!(schema.check(&5, &field).is_empty());
/// assert_eq!(
///     schema.check(&-1, &field)[0].message(),
///     "Quantity must be positive, got -1"
/// );
/// ```
#[derive(Clone)]
pub struct IntegerSchema {
    constraints: Vec<IntegerConstraint>,
    type_error_message: Option<String>,
}

impl IntegerSchema {
    /// Creates a new integer schema with no constraints.
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            type_error_message: None,
        }
    }

    /// Requires a value to be present.
    pub fn required(mut self) -> Self {
        self.constraints.push(IntegerConstraint::Required { message: None });
        self
    }

    /// Adds a minimum value constraint (inclusive).
    pub fn min(mut self, value: i64) -> Self {
        self.constraints.push(IntegerConstraint::Min { value, message: None });
        self
    }

    /// Adds a maximum value constraint (inclusive).
    pub fn max(mut self, value: i64) -> Self {
        self.constraints.push(IntegerConstraint::Max { value, message: None });
        self
    }

    /// Adds a range constraint (inclusive on both ends).
    ///
    /// This is equivalent to calling `.min(start).max(end)`; a custom error
    /// set right after applies to the upper bound only.
    pub fn range(self, range: RangeInclusive<i64>) -> Self {
        let (start, end) = range.into_inner();
        self.min(start).max(end)
    }

    /// Requires the value to be strictly greater than zero.
    pub fn positive(mut self) -> Self {
        self.constraints.push(IntegerConstraint::Positive { message: None });
        self
    }

    /// Requires the value to be zero or greater.
    pub fn non_negative(mut self) -> Self {
        self.constraints.push(IntegerConstraint::NonNegative { message: None });
        self
    }

    /// Requires the value to be strictly less than zero.
    pub fn negative(mut self) -> Self {
        self.constraints.push(IntegerConstraint::Negative { message: None });
        self
    }

    /// Sets a custom error message for the most recent constraint.
    ///
    /// If no constraints have been added yet, this sets the type error
    /// message. `{0}` is the display name and `{1}` the offending value.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.constraints.last_mut() {
            Some(last) => *last.message_mut() = Some(message.into()),
            None => self.type_error_message = Some(message.into()),
        }
        self
    }
}

impl Default for IntegerSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: IntegerValue + ?Sized> MemberRule<V> for IntegerSchema {
    fn check(&self, value: &V, field: &Field<'_>) -> Vec<Violation> {
        match value.integer() {
            Some(n) => self
                .constraints
                .iter()
                .filter_map(|c| check_constraint(c, n, field))
                .collect(),
            None if value.is_present() => vec![field.violation(
                self.type_error_message.as_deref(),
                "",
                || format!("{} must be an integer", field.display()),
            )],
            None => self
                .constraints
                .iter()
                .filter_map(|c| match c {
                    IntegerConstraint::Required { message } => Some(field.violation(
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

/// Checks a single constraint against a present value.
fn check_constraint(
    constraint: &IntegerConstraint,
    value: i128,
    field: &Field<'_>,
) -> Option<Violation> {
    let got = value.to_string();
    let display = field.display();

    match constraint {
        IntegerConstraint::Required { .. } => None,
        IntegerConstraint::Min { value: min, message } => (value < i128::from(*min)).then(|| {
            field.violation(message.as_deref(), &got, || {
                format!("{} must be at least {}, got {}", display, min, value)
            })
        }),
        IntegerConstraint::Max { value: max, message } => (value > i128::from(*max)).then(|| {
            field.violation(message.as_deref(), &got, || {
                format!("{} must be at most {}, got {}", display, max, value)
            })
        }),
        IntegerConstraint::Positive { message } => (value <= 0).then(|| {
            field.violation(message.as_deref(), &got, || {
                format!("{} must be positive, got {}", display, value)
            })
        }),
        IntegerConstraint::NonNegative { message } => (value < 0).then(|| {
            field.violation(message.as_deref(), &got, || {
                format!("{} must be non-negative, got {}", display, value)
            })
        }),
        IntegerConstraint::Negative { message } => (value >= 0).then(|| {
            field.violation(message.as_deref(), &got, || {
                format!("{} must be negative, got {}", display, value)
            })
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field() -> Field<'static> {
        Field::new("Age", "Age")
    }

    #[test]
    fn test_accepts_any_integer_without_constraints() {
        let schema = IntegerSchema::new();
        assert!(schema.check(&0i64, &field()).is_empty());
        assert!(schema.check(&-5i32, &field()).is_empty());
        assert!(schema.check(&None::<u8>, &field()).is_empty());
    }

    #[test]
    fn test_required() {
        let schema = IntegerSchema::new().required().positive();
        assert!(schema.check(&Some(3u32), &field()).is_empty());
        let violations = schema.check(&None::<u32>, &field());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message(), "Age is required");
    }

    #[test]
    fn test_range_reports_each_bound() {
        let schema = IntegerSchema::new().range(1..=10);
        assert!(schema.check(&1, &field()).is_empty());
        assert!(schema.check(&10, &field()).is_empty());
        assert_eq!(
            schema.check(&0, &field())[0].message(),
            "Age must be at least 1, got 0"
        );
        assert_eq!(
            schema.check(&11, &field())[0].message(),
            "Age must be at most 10, got 11"
        );
    }

    #[test]
    fn test_sign_constraints() {
        assert_eq!(IntegerSchema::new().positive().check(&0, &field()).len(), 1);
        assert!(IntegerSchema::new().non_negative().check(&0, &field()).is_empty());
        assert_eq!(IntegerSchema::new().non_negative().check(&-1, &field()).len(), 1);
        assert!(IntegerSchema::new().negative().check(&-1, &field()).is_empty());
        assert_eq!(IntegerSchema::new().negative().check(&0, &field()).len(), 1);
    }

    #[test]
    fn test_error_accumulation() {
        let schema = IntegerSchema::new().positive().min(5);
        assert_eq!(schema.check(&-1, &field()).len(), 2);
    }

    #[test]
    fn test_custom_error_with_value() {
        let schema = IntegerSchema::new().positive().error("{0} cannot be {1}");
        assert_eq!(schema.check(&-4, &field())[0].message(), "Age cannot be -4");
    }

    #[test]
    fn test_json_values() {
        let schema = IntegerSchema::new().max(10);
        assert!(schema.check(&json!(3), &field()).is_empty());
        assert_eq!(
            schema.check(&json!(1.5), &field())[0].message(),
            "Age must be an integer"
        );
        assert!(schema.check(&json!(null), &field()).is_empty());
    }

    #[test]
    fn test_large_unsigned_values() {
        let schema = IntegerSchema::new().max(i64::MAX);
        assert_eq!(schema.check(&u64::MAX, &field()).len(), 1);
    }
}
