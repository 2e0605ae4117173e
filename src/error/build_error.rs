//! Caller-facing failures of the builder itself.
//!
//! These are programming errors, not validation outcomes: they are returned
//! immediately and never accumulated.

/// Errors that can occur while appending to an [`ErrorBuilder`](crate::ErrorBuilder).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A required argument was empty (e.g., an error message).
    #[error("argument '{0}' must not be empty")]
    EmptyArgument(&'static str),

    /// A selector could not be resolved to a path or value.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Errors raised while evaluating a [`Selector`](crate::Selector).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// An index expression failed to produce an index.
    #[error("index expression failed: {0}")]
    IndexEvaluation(String),

    /// The container has no element at the evaluated index or key.
    #[error("no element at [{key}]")]
    MissingElement {
        /// The formatted index or key.
        key: String,
    },

    /// A member hop was given an empty name.
    #[error("member name must not be empty")]
    EmptyMember,

    /// A property names a member the owner's rules do not declare.
    #[error("no rules declared for member '{0}'")]
    UnknownMember(String),
}
