//! # Inquest
//!
//! An error accumulator that records every validation failure together with
//! the member path that caused it, rather than stopping at the first one.
//!
//! ## Overview
//!
//! A validation pass creates an [`ErrorBuilder`] and feeds it failures:
//! plain messages, messages keyed by a member name, messages about a value
//! reached through a typed [`Selector`], or the violations produced by
//! declarative [`Validate`] rules. Each entry is attributed to a canonical
//! path such as `Orders[3].Item.Sku`, so callers can map failures back onto
//! the fields of the request they came from.
//!
//! ## Core Types
//!
//! - [`ErrorBuilder`]: Collects failures and answers count/summary queries
//! - [`Selector`]: A typed reference to a member or element, resolved to a [`MemberPath`]
//! - [`ErrorList`]: A frozen, path-queryable snapshot of the collected failures
//! - [`Validate`] / [`ObjectRules`] / [`Schema`]: Declarative per-type rules
//! - [`RuleRegistry`]: Thread-safe cache of rule tables
//! - [`Outcome`]: Status-coded results for callers that report upstream
//!
//! ## Example
//!
//! ```rust
//! use inquest::{ErrorBuilder, ObjectRules, Schema, Selector, Validate};
//!
//! struct Address { street: Vec<String> }
//! struct Order { id: i64, address: Address }
//!
//! impl Validate for Order {
//!     fn rules() -> ObjectRules<Self> {
//!         ObjectRules::new().field("Id", |o: &Order| &o.id, Schema::integer().positive())
//!     }
//! }
//!
//! let order = Order {
//!     id: 0,
//!     address: Address { street: vec!["".into(), "".into(), "Main St".into()] },
//! };
//!
//! let mut errors = ErrorBuilder::new();
//! errors.valid(&order)?;
//! errors.add_selected(
//!     "{1} is not deliverable: {0}",
//!     &Selector::new("order", &order)
//!         .field("Address", |o| &o.address)
//!         .field("Street", |a| &a.street)
//!         .index(2),
//! )?;
//!
//! let list = errors.errors();
//! assert_eq!(list.len(), 2);
//! assert_eq!(list.lookup("Id"), Some("Id must be positive, got 0"));
//! assert_eq!(
//!     list.lookup("Address.Street[2]"),
//!     Some("Street[2] is not deliverable: Main St")
//! );
//! # Ok::<(), inquest::BuildError>(())
//! ```

pub mod builder;
pub mod error;
pub mod format;
pub mod outcome;
pub mod path;
pub mod registry;
pub mod resolve;
pub mod schema;
pub mod search;
pub mod selector;
pub mod validation;

pub use builder::ErrorBuilder;
pub use error::{BuildError, ErrorEntry, ErrorList, ResolutionError};
pub use format::MessageArg;
pub use outcome::{Failure, Outcome, StatusCode};
pub use path::{MemberPath, PathSegment};
pub use registry::{RegistryError, RuleRegistry};
pub use schema::{
    ArraySchema, Field, IntegerSchema, IntegerValue, MemberRule, ObjectRules, Schema,
    SequenceValue, StringSchema, TextValue,
};
pub use search::{check_results_page, read_results, UserSearch};
pub use selector::{Lookup, Property, Selector};
pub use validation::{validate_member, validate_object, Validate, ValidationContext, Violation};

/// Type alias for validation results carrying collected errors
pub type ValidationResult<T> = stillwater::Validation<T, ErrorList>;
