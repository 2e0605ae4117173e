//! Member rules and object rule tables.
//!
//! This module provides the rule types a [`Validate`](crate::Validate)
//! implementation is built from. Each member rule checks one member value
//! and accumulates all of its violations rather than short-circuiting on the
//! first failure.
//!
//! # Example
//!
//! ```rust
//! use inquest::{Field, MemberRule, Schema};
//!
//! let schema = Schema::string().min_len(1).max_len(100);
//!
//! assert!(schema.check("hello", &Field::new("Title", "Title")).is_empty());
//! ```

mod array;
mod numeric;
mod object;
mod string;
mod traits;

pub use array::ArraySchema;
pub use numeric::IntegerSchema;
pub use object::ObjectRules;
pub use string::StringSchema;
pub use traits::{Field, IntegerValue, MemberRule, SequenceValue, TextValue};

/// Entry point for creating member rules.
///
/// `Schema` provides factory methods for the different rule types. Each rule
/// supports its constraints through a builder pattern.
///
/// # Example
///
/// ```rust
/// use inquest::Schema;
///
/// let name = Schema::string().required().max_len(100);
///
/// let email = Schema::string()
///     .pattern(r"@")
///     .unwrap()
///     .error("{0} must contain @");
///
/// let scores = Schema::array(Schema::integer().range(0..=10)).non_empty();
/// ```
pub struct Schema;

impl Schema {
    /// Creates a new string rule.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Field, MemberRule, Schema};
    ///
    /// let schema = Schema::string().min_len(5);
    /// let field = Field::new("Code", "Code");
    ///
    /// assert!(schema.check("hello", &field).is_empty());
    /// assert_eq!(schema.check("hi", &field).len(), 1);
    /// ```
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Creates a new integer rule.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Field, MemberRule, Schema};
    ///
    /// let schema = Schema::integer().min(0).max(100);
    /// let field = Field::new("Percent", "Percent");
    ///
    /// assert!(schema.check(&50, &field).is_empty());
    /// assert_eq!(schema.check(&-5, &field).len(), 1);
    /// ```
    pub fn integer() -> IntegerSchema {
        IntegerSchema::new()
    }

    /// Creates a new sequence rule checking each element with `item`.
    pub fn array<S>(item: S) -> ArraySchema<S> {
        ArraySchema::new(item)
    }

    /// Creates an empty rule table for `T`.
    pub fn object<T: 'static>() -> ObjectRules<T> {
        ObjectRules::new()
    }
}
