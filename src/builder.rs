//! The error accumulator.
//!
//! This module provides [`ErrorBuilder`], which records every failure found
//! during a validation pass together with the member path that caused it.

use std::fmt::{self, Display};
use std::sync::Arc;

use stillwater::Validation;
use tracing::{debug, trace};

use crate::error::{headline, BuildError, ErrorEntry, ErrorList, ResolutionError};
use crate::format::{format_message, MessageArg};
use crate::registry::RuleRegistry;
use crate::selector::{Property, Selector};
use crate::validation::{validate_member, validate_object, Validate, Violation};

/// Collects validation failures, each attributed to the member that caused it.
///
/// Every appending method returns `Result<_, BuildError>`: an empty message
/// or a selector that cannot be resolved is a caller error and is reported
/// immediately, before anything is appended. Failed checks, on the other
/// hand, are data: they are recorded as entries and reported through
/// [`count`](ErrorBuilder::count), [`summary`](ErrorBuilder::summary) and
/// [`errors`](ErrorBuilder::errors).
///
/// Messages are templates: `{0}` is replaced by the tested value and `{1}`
/// by the key identifying it.
///
/// # Example
///
/// ```rust
/// use inquest::{ErrorBuilder, Selector};
///
/// struct Signup { name: String, age: i64 }
///
/// let signup = Signup { name: String::new(), age: -1 };
/// let mut errors = ErrorBuilder::new();
///
/// errors.assert(!signup.name.is_empty(), "name can not be empty")?;
/// errors.assert_selected(
///     signup.age >= 0,
///     "{1} must be positive, got {0}",
///     &Selector::new("signup", &signup).field("Age", |s| &s.age),
/// )?;
///
/// assert_eq!(errors.count(), 2);
/// assert_eq!(errors.summary(), "name can not be empty");
/// assert_eq!(errors.errors().lookup("Age"), Some("Age must be positive, got -1"));
/// # Ok::<(), inquest::BuildError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ErrorBuilder {
    entries: Vec<ErrorEntry>,
    include_root_segment: bool,
    registry: Option<Arc<RuleRegistry>>,
}

impl ErrorBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder seeded with a root-level message.
    pub fn from_message(message: &str) -> Result<Self, BuildError> {
        let mut builder = Self::new();
        builder.add(message)?;
        Ok(builder)
    }

    /// Creates a builder seeded with a root-level message about `value`.
    pub fn from_value(message: &str, value: impl Display) -> Result<Self, BuildError> {
        let mut builder = Self::new();
        builder.add_value(message, value)?;
        Ok(builder)
    }

    /// Creates a builder seeded with a message attributed to `key`.
    pub fn from_keyed(message: &str, value: impl Display, key: &str) -> Result<Self, BuildError> {
        let mut builder = Self::new();
        builder.add_keyed(message, value, key)?;
        Ok(builder)
    }

    /// Keeps the root name as the first segment of selector paths.
    ///
    /// Off by default: `Selector::new("param", ..).field("Name", ..)` is
    /// recorded as `Name`, or as `param.Name` when this is enabled.
    pub fn include_root_segment(mut self, include: bool) -> Self {
        self.include_root_segment = include;
        self
    }

    /// Sets whether selector paths keep their root segment.
    pub fn set_include_root_segment(&mut self, include: bool) {
        self.include_root_segment = include;
    }

    /// Returns whether selector paths keep their root segment.
    pub fn includes_root_segment(&self) -> bool {
        self.include_root_segment
    }

    /// Uses `registry` for rule lookups instead of [`RuleRegistry::global`].
    pub fn with_registry(mut self, registry: Arc<RuleRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    fn registry(&self) -> &RuleRegistry {
        self.registry.as_deref().unwrap_or_else(|| RuleRegistry::global())
    }

    fn push<I, S>(&mut self, message: String, paths: I) -> Result<&mut Self, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if message.is_empty() {
            return Err(BuildError::EmptyArgument("message"));
        }

        let entry = ErrorEntry::new(message, paths);
        trace!(
            entries = self.entries.len() + 1,
            paths = entry.paths().len(),
            "recorded error"
        );
        self.entries.push(entry);
        Ok(self)
    }

    /// Appends a root-level message.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::EmptyArgument`] if the message is empty.
    pub fn add(&mut self, message: &str) -> Result<&mut Self, BuildError> {
        self.push(format_message(message, "", ""), None::<String>)
    }

    /// Appends a root-level message with `value` substituted into `{0}`.
    pub fn add_value(
        &mut self,
        message: &str,
        value: impl Display,
    ) -> Result<&mut Self, BuildError> {
        self.push(format_message(message, &value.to_string(), ""), None::<String>)
    }

    /// Appends a message attributed to `key`, with `value` substituted into
    /// `{0}` and `key` into `{1}`.
    ///
    /// An empty key is recorded as the empty path, which is root-level.
    pub fn add_keyed(
        &mut self,
        message: &str,
        value: impl Display,
        key: &str,
    ) -> Result<&mut Self, BuildError> {
        self.push(format_message(message, &value.to_string(), key), [key])
    }

    /// Appends a message attributed to the path of `selector`.
    ///
    /// The selected value is substituted into `{0}`, and the last segment of
    /// the path (or the member's display name) into `{1}`. An absent optional
    /// value is substituted as the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Resolution`] if the selector cannot be resolved
    /// or its value cannot be read.
    pub fn add_selected<T>(
        &mut self,
        message: &str,
        selector: &Selector<'_, T>,
    ) -> Result<&mut Self, BuildError>
    where
        T: MessageArg + ?Sized,
    {
        let resolved = selector
            .path(self.include_root_segment)
            .and_then(|path| selector.target().map(|value| (path, value)));

        let (path, value) = match resolved {
            Ok(resolved) => resolved,
            Err(err) => {
                debug!(error = %err, "selector failed to resolve");
                return Err(err.into());
            }
        };

        let key = selector.key_for(self.registry(), &path);
        let message = format_message(message, &value.message_arg(), &key);
        self.push(message, [path.to_string()])
    }

    /// Appends a violation with its own message and member names.
    pub fn add_result(&mut self, violation: Violation) -> Result<&mut Self, BuildError> {
        let (message, members) = violation.into_parts();
        self.push(message, members)
    }

    /// Appends every violation in order.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::EmptyArgument`] if any violation has an empty
    /// message. Nothing is appended in that case.
    pub fn add_range<I>(&mut self, violations: I) -> Result<&mut Self, BuildError>
    where
        I: IntoIterator<Item = Violation>,
    {
        let violations: Vec<Violation> = violations.into_iter().collect();
        if violations.iter().any(|v| v.message().is_empty()) {
            return Err(BuildError::EmptyArgument("message"));
        }

        for violation in violations {
            self.add_result(violation)?;
        }
        Ok(self)
    }

    /// Appends `message` if `condition` is false and returns `condition`.
    ///
    /// Nothing is checked or appended when the condition holds.
    pub fn assert(&mut self, condition: bool, message: &str) -> Result<bool, BuildError> {
        if !condition {
            self.add(message)?;
        }
        Ok(condition)
    }

    /// Like [`assert`](ErrorBuilder::assert), substituting `value` into `{0}`.
    pub fn assert_value(
        &mut self,
        condition: bool,
        message: &str,
        value: impl Display,
    ) -> Result<bool, BuildError> {
        if !condition {
            self.add_value(message, value)?;
        }
        Ok(condition)
    }

    /// Like [`assert`](ErrorBuilder::assert), attributing the message to `key`.
    pub fn assert_keyed(
        &mut self,
        condition: bool,
        message: &str,
        value: impl Display,
        key: &str,
    ) -> Result<bool, BuildError> {
        if !condition {
            self.add_keyed(message, value, key)?;
        }
        Ok(condition)
    }

    /// Like [`assert`](ErrorBuilder::assert), attributing the message to the
    /// path of `selector`. The selector is only resolved when the condition
    /// fails.
    pub fn assert_selected<T>(
        &mut self,
        condition: bool,
        message: &str,
        selector: &Selector<'_, T>,
    ) -> Result<bool, BuildError>
    where
        T: MessageArg + ?Sized,
    {
        if !condition {
            self.add_selected(message, selector)?;
        }
        Ok(condition)
    }

    /// Appends `message` if `condition` is false and returns its negation.
    pub fn not(&mut self, condition: bool, message: &str) -> Result<bool, BuildError> {
        Ok(!self.assert(condition, message)?)
    }

    /// Negated [`assert_value`](ErrorBuilder::assert_value).
    pub fn not_value(
        &mut self,
        condition: bool,
        message: &str,
        value: impl Display,
    ) -> Result<bool, BuildError> {
        Ok(!self.assert_value(condition, message, value)?)
    }

    /// Negated [`assert_keyed`](ErrorBuilder::assert_keyed).
    pub fn not_keyed(
        &mut self,
        condition: bool,
        message: &str,
        value: impl Display,
        key: &str,
    ) -> Result<bool, BuildError> {
        Ok(!self.assert_keyed(condition, message, value, key)?)
    }

    /// Negated [`assert_selected`](ErrorBuilder::assert_selected).
    pub fn not_selected<T>(
        &mut self,
        condition: bool,
        message: &str,
        selector: &Selector<'_, T>,
    ) -> Result<bool, BuildError>
    where
        T: MessageArg + ?Sized,
    {
        Ok(!self.assert_selected(condition, message, selector)?)
    }

    /// Validates `value` with its declared rules and appends every violation.
    ///
    /// Returns true if there were none.
    pub fn valid<T: Validate>(&mut self, value: &T) -> Result<bool, BuildError> {
        let violations = validate_object(self.registry(), value);
        let valid = violations.is_empty();
        self.add_range(violations)?;
        Ok(valid)
    }

    /// Negated [`valid`](ErrorBuilder::valid).
    pub fn not_valid<T: Validate>(&mut self, value: &T) -> Result<bool, BuildError> {
        Ok(!self.valid(value)?)
    }

    /// Validates each element, prefixing member names with `[i].`.
    ///
    /// Returns true only if every element was valid.
    pub fn valid_all<T: Validate>(&mut self, values: &[T]) -> Result<bool, BuildError> {
        let registry = self.registry();
        let violations: Vec<Violation> = values
            .iter()
            .enumerate()
            .flat_map(|(index, value)| {
                let prefix = format!("[{index}].");
                validate_object(registry, value)
                    .into_iter()
                    .map(move |v| v.prefixed(&prefix))
            })
            .collect();

        let valid = violations.is_empty();
        self.add_range(violations)?;
        Ok(valid)
    }

    /// Negated [`valid_all`](ErrorBuilder::valid_all).
    pub fn not_valid_all<T: Validate>(&mut self, values: &[T]) -> Result<bool, BuildError> {
        Ok(!self.valid_all(values)?)
    }

    /// Validates a single member of its owning instance.
    ///
    /// Only the rules attached to that member run. Violations are attributed
    /// to the member name.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Resolution`] if the owner cannot be resolved, or
    /// the member name is empty or not declared by the owner's rules.
    pub fn valid_property<T: Validate>(
        &mut self,
        property: &Property<'_, T>,
    ) -> Result<bool, BuildError> {
        if property.name().is_empty() {
            return Err(ResolutionError::EmptyMember.into());
        }

        let owner = property.owner()?;
        let violations = validate_member(self.registry(), owner, property.name())?;
        let valid = violations.is_empty();
        self.add_range(violations)?;
        Ok(valid)
    }

    /// Negated [`valid_property`](ErrorBuilder::valid_property).
    pub fn not_valid_property<T: Validate>(
        &mut self,
        property: &Property<'_, T>,
    ) -> Result<bool, BuildError> {
        Ok(!self.valid_property(property)?)
    }

    /// Removes every recorded entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of recorded entries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if any entry was recorded.
    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Returns the message of the first root-level entry, or `""`.
    pub fn summary(&self) -> &str {
        headline(&self.entries)
    }

    /// Returns the recorded entries in insertion order.
    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    /// Returns a frozen snapshot of the recorded entries.
    pub fn errors(&self) -> ErrorList {
        ErrorList::new(self.summary().to_string(), self.entries.clone())
    }

    /// Converts this builder into a validation of `value`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::ErrorBuilder;
    ///
    /// let errors = ErrorBuilder::new();
    /// assert!(errors.into_validation(7).is_success());
    ///
    /// let mut errors = ErrorBuilder::new();
    /// errors.add("out of stock").unwrap();
    /// let failure = errors.into_validation(7).into_result().unwrap_err();
    /// assert_eq!(failure.error_message(), "out of stock");
    /// ```
    pub fn into_validation<T>(self, value: T) -> Validation<T, ErrorList> {
        if self.has_errors() {
            Validation::Failure(self.errors())
        } else {
            Validation::Success(value)
        }
    }
}

impl Display for ErrorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.summary())
    }
}

impl From<ErrorBuilder> for ErrorList {
    fn from(builder: ErrorBuilder) -> Self {
        let error_message = builder.summary().to_string();
        ErrorList::new(error_message, builder.entries)
    }
}
