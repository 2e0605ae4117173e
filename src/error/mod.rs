//! Error types for the builder.
//!
//! This module provides the recorded failures ([`ErrorEntry`], [`ErrorList`])
//! and the errors the builder itself can return ([`BuildError`],
//! [`ResolutionError`]).

mod build_error;
mod entry;

pub use build_error::{BuildError, ResolutionError};
pub use entry::{ErrorEntry, ErrorList};

pub(crate) use entry::headline;
