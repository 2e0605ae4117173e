//! Rule registry for per-type rule storage.
//!
//! This module provides the [`RuleRegistry`] type that caches the
//! [`ObjectRules`] of every [`Validate`] type and bounds nested validation.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::debug;

use crate::schema::ObjectRules;
use crate::validation::Validate;

/// Type alias for the rule storage map.
type RuleMap = RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>;

/// A thread-safe registry of validation rules, keyed by type.
///
/// The first time a type is validated its [`Validate::rules`] are built and
/// cached; later lookups share the cached table. A type's rules can also be
/// registered explicitly before first use, replacing the declared ones.
///
/// # Thread Safety
///
/// - Multiple threads can look up and validate concurrently (read access)
/// - Registration and cache fills are serialized (write access)
///
/// # Example
///
/// ```rust
/// use inquest::{ObjectRules, RuleRegistry, Schema, Validate};
///
/// struct Email(String);
///
/// impl Validate for Email {
///     fn rules() -> ObjectRules<Self> {
///         let address = Schema::string().pattern("@").unwrap();
///         ObjectRules::new().field("Address", |e: &Email| &e.0, address)
///     }
/// }
///
/// let registry = RuleRegistry::new().with_max_depth(10);
/// let rules = registry.rules_for::<Email>();
/// assert_eq!(rules.members().collect::<Vec<_>>(), vec!["Address"]);
/// assert_eq!(registry.len(), 1);
/// ```
pub struct RuleRegistry {
    rules: RuleMap,
    max_depth: usize,
}

impl RuleRegistry {
    /// Creates a new empty registry with default max depth (100).
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(HashMap::new()),
            max_depth: 100,
        }
    }

    /// Returns the process-wide registry used when no other is configured.
    pub fn global() -> &'static RuleRegistry {
        static GLOBAL: OnceLock<RuleRegistry> = OnceLock::new();
        GLOBAL.get_or_init(RuleRegistry::new)
    }

    /// Sets the maximum depth of nested object validation.
    ///
    /// The default max depth is 100. A nested member reached beyond this
    /// depth is reported as a violation instead of being validated.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Returns the maximum depth of nested object validation.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Registers the rules for `T`, replacing its declared rules.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateType` if `T` already has rules in this
    /// registry, whether registered or cached by an earlier validation.
    pub fn register<T: Validate>(&self, rules: ObjectRules<T>) -> Result<(), RegistryError> {
        let mut map = self.rules.write();
        let key = TypeId::of::<T>();

        if map.contains_key(&key) {
            return Err(RegistryError::DuplicateType(type_name::<T>()));
        }

        map.insert(key, Arc::new(rules));
        debug!(target_type = type_name::<T>(), "registered rules");
        Ok(())
    }

    /// Returns the rules for `T`, building and caching them on first use.
    pub fn rules_for<T: Validate>(&self) -> Arc<ObjectRules<T>> {
        if let Some(rules) = self.cached::<T>() {
            return rules;
        }

        // Built outside the lock; rule construction may consult this registry.
        let built = Arc::new(T::rules());
        let cached = Arc::clone(
            self.rules
                .write()
                .entry(TypeId::of::<T>())
                .or_insert_with(|| Arc::clone(&built) as Arc<dyn Any + Send + Sync>),
        );
        debug!(target_type = type_name::<T>(), "cached rules");

        cached.downcast::<ObjectRules<T>>().unwrap_or(built)
    }

    /// Returns the display name `T`'s rules declare for `member`.
    ///
    /// Unlike [`rules_for`](RuleRegistry::rules_for) this never fills the
    /// cache, so a later [`register`](RuleRegistry::register) still succeeds.
    pub fn display_name<T: Validate>(&self, member: &str) -> Option<String> {
        match self.cached::<T>() {
            Some(rules) => rules.display_name(member).map(str::to_string),
            None => T::rules().display_name(member).map(str::to_string),
        }
    }

    fn cached<T: Validate>(&self) -> Option<Arc<ObjectRules<T>>> {
        let found = self.rules.read().get(&TypeId::of::<T>()).cloned()?;
        found.downcast::<ObjectRules<T>>().ok()
    }

    /// Returns true if rules for `T` are registered or cached.
    pub fn contains<T: Validate>(&self) -> bool {
        self.rules.read().contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of types with rules in this registry.
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    /// Returns true if no type has rules in this registry.
    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("types", &self.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register rules for a type that already has them.
    #[error("rules for type '{0}' already registered")]
    DuplicateType(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IntegerSchema;

    struct Counter(i64);

    impl Validate for Counter {
        fn rules() -> ObjectRules<Self> {
            ObjectRules::new().field("Value", |c: &Counter| &c.0, IntegerSchema::new().positive())
        }
    }

    #[test]
    fn test_rules_are_cached() {
        let registry = RuleRegistry::new();
        assert!(registry.is_empty());

        let first = registry.rules_for::<Counter>();
        let second = registry.rules_for::<Counter>();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(registry.contains::<Counter>());
    }

    #[test]
    fn test_register_overrides_declared_rules() {
        let registry = RuleRegistry::new();
        registry
            .register(ObjectRules::<Counter>::new().display("Value", "Count"))
            .unwrap();

        let rules = registry.rules_for::<Counter>();
        assert_eq!(rules.display_name("Value"), Some("Count"));
    }

    #[test]
    fn test_display_name_lookup_leaves_cache_empty() {
        let registry = RuleRegistry::new();
        assert_eq!(registry.display_name::<Counter>("Value"), None);
        assert!(!registry.contains::<Counter>());

        registry
            .register(ObjectRules::<Counter>::new().display("Value", "Count"))
            .unwrap();
        assert_eq!(registry.display_name::<Counter>("Value"), Some("Count".to_string()));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let registry = RuleRegistry::new();
        registry.rules_for::<Counter>();

        let err = registry.register(Counter::rules()).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateType(name) if name.ends_with("Counter")));
    }

    #[test]
    fn test_default_max_depth() {
        assert_eq!(RuleRegistry::new().max_depth(), 100);
        assert_eq!(RuleRegistry::default().with_max_depth(4).max_depth(), 4);
    }
}
