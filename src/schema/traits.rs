//! Traits shared by the member rule schemas.
//!
//! [`MemberRule`] is what [`ObjectRules::field`](crate::ObjectRules::field)
//! attaches to a member. The value traits ([`TextValue`], [`IntegerValue`],
//! [`SequenceValue`]) let one schema accept the different shapes a member can
//! take: plain values, `Option`s and `serde_json::Value`s.

use std::borrow::Cow;

use serde_json::Value;

use crate::format::format_message;
use crate::validation::Violation;

/// The member a rule is being checked against.
///
/// `path` is the member name violations are attributed to; `display` is the
/// name used in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    path: &'a str,
    display: &'a str,
}

impl<'a> Field<'a> {
    /// Creates a field descriptor.
    pub fn new(path: &'a str, display: &'a str) -> Self {
        Self { path, display }
    }

    /// Returns the member path violations are attributed to.
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Returns the name used in messages.
    pub fn display(&self) -> &'a str {
        self.display
    }

    /// Builds a violation for this field.
    ///
    /// A custom message is a template: `{0}` is replaced by the display name
    /// and `{1}` by `value`. Without one, `default` produces the message.
    pub(crate) fn violation(
        &self,
        custom: Option<&str>,
        value: &str,
        default: impl FnOnce() -> String,
    ) -> Violation {
        let message = match custom {
            Some(template) => format_message(template, self.display, value),
            None => default(),
        };
        Violation::new(message, [self.path])
    }
}

/// A rule checked against a single member value.
///
/// Rules must be `Send + Sync` so that rule tables can be cached in a shared
/// [`RuleRegistry`](crate::RuleRegistry).
pub trait MemberRule<V: ?Sized>: Send + Sync {
    /// Checks `value`, returning every violation found.
    fn check(&self, value: &V, field: &Field<'_>) -> Vec<Violation>;
}

/// Values a [`StringSchema`](crate::StringSchema) can check.
pub trait TextValue {
    /// Returns the text, or `None` if the value is absent or not text.
    fn text(&self) -> Option<&str>;

    /// Returns true if a value is present, text or not.
    fn is_present(&self) -> bool {
        self.text().is_some()
    }
}

impl TextValue for str {
    fn text(&self) -> Option<&str> {
        Some(self)
    }
}

impl TextValue for String {
    fn text(&self) -> Option<&str> {
        Some(self)
    }
}

impl TextValue for Cow<'_, str> {
    fn text(&self) -> Option<&str> {
        Some(self)
    }
}

impl<T: TextValue> TextValue for Option<T> {
    fn text(&self) -> Option<&str> {
        self.as_ref().and_then(TextValue::text)
    }

    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(TextValue::is_present)
    }
}

impl TextValue for Value {
    fn text(&self) -> Option<&str> {
        self.as_str()
    }

    fn is_present(&self) -> bool {
        !self.is_null()
    }
}

/// Values an [`IntegerSchema`](crate::IntegerSchema) can check.
pub trait IntegerValue {
    /// Returns the integer, or `None` if the value is absent or not an integer.
    fn integer(&self) -> Option<i128>;

    /// Returns true if a value is present, integer or not.
    fn is_present(&self) -> bool {
        self.integer().is_some()
    }
}

macro_rules! integer_value {
    ($($ty:ty),*) => {
        $(
            impl IntegerValue for $ty {
                fn integer(&self) -> Option<i128> {
                    i128::try_from(*self).ok()
                }
            }
        )*
    };
}

integer_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl<T: IntegerValue> IntegerValue for Option<T> {
    fn integer(&self) -> Option<i128> {
        self.as_ref().and_then(IntegerValue::integer)
    }

    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(IntegerValue::is_present)
    }
}

impl IntegerValue for Value {
    fn integer(&self) -> Option<i128> {
        self.as_i64()
            .map(i128::from)
            .or_else(|| self.as_u64().map(i128::from))
    }

    fn is_present(&self) -> bool {
        !self.is_null()
    }
}

/// Values an [`ArraySchema`](crate::ArraySchema) can check.
pub trait SequenceValue {
    /// The element type.
    type Item;

    /// Returns the elements, or `None` if the value is absent or not a sequence.
    fn items(&self) -> Option<&[Self::Item]>;

    /// Returns true if a value is present, sequence or not.
    fn is_present(&self) -> bool {
        self.items().is_some()
    }
}

impl<T> SequenceValue for [T] {
    type Item = T;

    fn items(&self) -> Option<&[T]> {
        Some(self)
    }
}

impl<T> SequenceValue for Vec<T> {
    type Item = T;

    fn items(&self) -> Option<&[T]> {
        Some(self)
    }
}

impl<T, const N: usize> SequenceValue for [T; N] {
    type Item = T;

    fn items(&self) -> Option<&[T]> {
        Some(self)
    }
}

impl<S: SequenceValue> SequenceValue for Option<S> {
    type Item = S::Item;

    fn items(&self) -> Option<&[S::Item]> {
        self.as_ref().and_then(SequenceValue::items)
    }

    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(SequenceValue::is_present)
    }
}

impl SequenceValue for Value {
    type Item = Value;

    fn items(&self) -> Option<&[Value]> {
        self.as_array().map(Vec::as_slice)
    }

    fn is_present(&self) -> bool {
        !self.is_null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_values() {
        assert_eq!("a".text(), Some("a"));
        assert_eq!(None::<String>.text(), None);
        assert!(!None::<String>.is_present());
        assert_eq!(Cow::Borrowed("b").text(), Some("b"));
        assert_eq!(json!("c").text(), Some("c"));
        assert!(TextValue::is_present(&json!(3)));
        assert_eq!(json!(3).text(), None);
        assert!(!TextValue::is_present(&json!(null)));
    }

    #[test]
    fn test_integer_values() {
        assert_eq!(7u8.integer(), Some(7));
        assert_eq!(u64::MAX.integer(), Some(u64::MAX as i128));
        assert_eq!(Some(-2i32).integer(), Some(-2));
        assert_eq!(json!(1.5).integer(), None);
        assert!(IntegerValue::is_present(&json!(1.5)));
    }

    #[test]
    fn test_sequence_values() {
        assert_eq!(vec![1, 2].items().map(<[i32]>::len), Some(2));
        assert_eq!(None::<Vec<i32>>.items(), None);
        assert_eq!(json!([1]).items().map(<[Value]>::len), Some(1));
        assert!(SequenceValue::is_present(&json!({})));
        assert_eq!(json!({}).items(), None);
    }

    #[test]
    fn test_field_violation_templates() {
        let field = Field::new("Age", "Age in years");
        let v = field.violation(Some("{0} is off: {1}"), "-1", || unreachable!());
        assert_eq!(v.message(), "Age in years is off: -1");
        assert_eq!(v.members(), ["Age"]);

        let v = field.violation(None, "-1", || "default".to_string());
        assert_eq!(v.message(), "default");
    }
}
