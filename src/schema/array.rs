//! Sequence member rules.
//!
//! This module provides [`ArraySchema`] for checking sequence members with
//! an item rule and length constraints.

use crate::schema::traits::{Field, MemberRule, SequenceValue};
use crate::validation::Violation;

/// A constraint applied to sequence values.
#[derive(Clone)]
enum ArrayConstraint {
    Required { message: Option<String> },
    MinLength { min: usize, message: Option<String> },
    MaxLength { max: usize, message: Option<String> },
}

/// A rule for sequence members.
///
/// `ArraySchema` checks any [`SequenceValue`] (`Vec`, slices, arrays,
/// `Option`s of those, and JSON arrays). Each element is checked against the
/// item rule with the path `member[i]`, and the length constraints apply to
/// the sequence as a whole. All violations are accumulated.
///
/// # Example
///
/// ```rust
/// use inquest::{Field, MemberRule, Schema};
///
/// let schema = Schema::array(Schema::string().min_len(1))
///     .non_empty()
///     .max_len(10);
///
/// let tags = vec!["rust".to_string(), String::new()];
/// let violations = schema.check(&tags, &Field::new("Tags", "Tags"));
///
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].members(), ["Tags[1]"]);
/// ```
#[derive(Clone)]
pub struct ArraySchema<S> {
    item_schema: S,
    constraints: Vec<ArrayConstraint>,
    type_error_message: Option<String>,
}

impl<S> ArraySchema<S> {
    /// Creates a new array schema with the given item rule.
    pub fn new(item_schema: S) -> Self {
        Self {
            item_schema,
            constraints: Vec::new(),
            type_error_message: None,
        }
    }

    /// Requires a sequence to be present.
    pub fn required(mut self) -> Self {
        self.constraints.push(ArrayConstraint::Required { message: None });
        self
    }

    /// Adds a minimum length constraint.
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints.push(ArrayConstraint::MinLength { min, message: None });
        self
    }

    /// Adds a maximum length constraint.
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints.push(ArrayConstraint::MaxLength { max, message: None });
        self
    }

    /// Requires at least one item. Shorthand for `.min_len(1)`.
    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    /// Sets a custom error message for the most recent constraint.
    ///
    /// If no constraints have been added yet, this sets the type error
    /// message. `{0}` is the display name and `{1}` the item count.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.constraints.last_mut() {
            Some(
                ArrayConstraint::Required { message: m }
                | ArrayConstraint::MinLength { message: m, .. }
                | ArrayConstraint::MaxLength { message: m, .. },
            ) => *m = Some(message.into()),
            None => self.type_error_message = Some(message.into()),
        }
        self
    }
}

impl<V, S> MemberRule<V> for ArraySchema<S>
where
    V: SequenceValue + ?Sized,
    S: MemberRule<V::Item>,
{
    fn check(&self, value: &V, field: &Field<'_>) -> Vec<Violation> {
        let Some(items) = value.items() else {
            if value.is_present() {
                return vec![field.violation(
                    self.type_error_message.as_deref(),
                    "",
                    || format!("{} must be an array", field.display()),
                )];
            }
            return self
                .constraints
                .iter()
                .filter_map(|c| match c {
                    ArrayConstraint::Required { message } => Some(field.violation(
                        message.as_deref(),
                        "",
                        || format!("{} is required", field.display()),
                    )),
                    _ => None,
                })
                .collect();
        };

        let count = items.len().to_string();
        let mut violations: Vec<Violation> = self
            .constraints
            .iter()
            .filter_map(|constraint| match constraint {
                ArrayConstraint::MinLength { min, message } if items.len() < *min => {
                    Some(field.violation(message.as_deref(), &count, || {
                        format!(
                            "{} must have at least {} items, got {}",
                            field.display(),
                            min,
                            items.len()
                        )
                    }))
                }
                ArrayConstraint::MaxLength { max, message } if items.len() > *max => {
                    Some(field.violation(message.as_deref(), &count, || {
                        format!(
                            "{} must have at most {} items, got {}",
                            field.display(),
                            max,
                            items.len()
                        )
                    }))
                }
                _ => None,
            })
            .collect();

        for (index, item) in items.iter().enumerate() {
            let path = format!("{}[{}]", field.path(), index);
            let display = format!("{}[{}]", field.display(), index);
            violations.extend(self.item_schema.check(item, &Field::new(&path, &display)));
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{IntegerSchema, StringSchema};
    use serde_json::json;

    fn field() -> Field<'static> {
        Field::new("Scores", "Scores")
    }

    #[test]
    fn test_item_paths() {
        let schema = ArraySchema::new(IntegerSchema::new().positive());
        let violations = schema.check(&vec![1, -2, 3, 0], &field());
        let members: Vec<_> = violations.iter().flat_map(|v| v.members()).collect();
        assert_eq!(members, vec!["Scores[1]", "Scores[3]"]);
        assert_eq!(violations[0].message(), "Scores[1] must be positive, got -2");
    }

    #[test]
    fn test_length_constraints() {
        let schema = ArraySchema::new(IntegerSchema::new()).min_len(2).max_len(3);
        assert_eq!(
            schema.check(&vec![1], &field())[0].message(),
            "Scores must have at least 2 items, got 1"
        );
        assert!(schema.check(&[1, 2, 3], &field()).is_empty());
        assert_eq!(schema.check(&vec![1, 2, 3, 4], &field()).len(), 1);
    }

    #[test]
    fn test_length_and_item_errors_accumulate() {
        let schema = ArraySchema::new(IntegerSchema::new().positive()).max_len(1);
        assert_eq!(schema.check(&vec![-1, -2], &field()).len(), 3);
    }

    #[test]
    fn test_required_and_absent() {
        let schema = ArraySchema::new(IntegerSchema::new()).non_empty();
        assert!(schema.check(&None::<Vec<i32>>, &field()).is_empty());

        let schema = ArraySchema::new(IntegerSchema::new()).required();
        assert_eq!(
            schema.check(&None::<Vec<i32>>, &field())[0].message(),
            "Scores is required"
        );
    }

    #[test]
    fn test_custom_message_gets_count() {
        let schema = ArraySchema::new(IntegerSchema::new())
            .non_empty()
            .error("{0} has {1} entries");
        assert_eq!(
            schema.check(&Vec::<i32>::new(), &field())[0].message(),
            "Scores has 0 entries"
        );
    }

    #[test]
    fn test_json_arrays() {
        let schema = ArraySchema::new(StringSchema::new().min_len(2));
        let violations = schema.check(&json!(["ok", "x"]), &field());
        assert_eq!(violations[0].members(), ["Scores[1]"]);

        let violations = schema.check(&json!({"a": 1}), &field());
        assert_eq!(violations[0].message(), "Scores must be an array");
    }

    #[test]
    fn test_nested_arrays() {
        let schema = ArraySchema::new(ArraySchema::new(IntegerSchema::new().negative()));
        let violations = schema.check(&vec![vec![-1], vec![-2, 5]], &field());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].members(), ["Scores[1][1]"]);
    }
}
