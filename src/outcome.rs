//! Status-coded outcomes for callers that report failures upstream.
//!
//! The builder itself never produces an [`Outcome`]. Callers wrap the errors
//! they collected into one when handing a result to their own callers:
//!
//! ```rust
//! use inquest::{ErrorBuilder, Outcome, StatusCode};
//!
//! fn lookup(id: i64) -> Outcome<String> {
//!     let mut errors = ErrorBuilder::new();
//!     if let Err(err) = errors.assert_value(id > 0, "id must be positive, got {0}", id) {
//!         return err.into();
//!     }
//!     if errors.has_errors() {
//!         return Outcome::failure(StatusCode::BadRequest, errors);
//!     }
//!     Outcome::Success(format!("user-{id}"))
//! }
//!
//! assert_eq!(lookup(3), Outcome::Success("user-3".to_string()));
//! let failed = lookup(-1);
//! assert_eq!(failed.status(), StatusCode::BadRequest);
//! assert_eq!(failed.reason().unwrap().to_string(), "id must be positive, got -1");
//! ```

use std::fmt::{self, Display};

use stillwater::Validation;

use crate::builder::ErrorBuilder;
use crate::error::{BuildError, ErrorList};

/// Closed taxonomy of outcome statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// The operation succeeded.
    Ok,
    /// The request parameters were rejected.
    BadRequest,
    /// The requested resource does not exist.
    NotFound,
    /// The caller lacks valid credentials.
    Unauthorized,
    /// The upstream service did not answer in time.
    TimedOut,
    /// The resource already exists.
    Duplicated,
    /// A fetched page did not have the expected markup.
    InvalidPage,
    /// Any other failure.
    Error,
}

impl StatusCode {
    /// Classifies an HTTP status code.
    ///
    /// 200, 201, 202 and 204 are `Ok`; the client and server errors with a
    /// dedicated status map to it; everything else is `Error`.
    pub fn from_http(code: u16) -> Self {
        match code {
            200 | 201 | 202 | 204 => StatusCode::Ok,
            400 => StatusCode::BadRequest,
            401 => StatusCode::Unauthorized,
            404 => StatusCode::NotFound,
            408 => StatusCode::TimedOut,
            409 => StatusCode::Duplicated,
            _ => StatusCode::Error,
        }
    }

    /// Returns true for [`StatusCode::Ok`].
    pub fn is_ok(self) -> bool {
        self == StatusCode::Ok
    }

    /// Returns the name of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            StatusCode::Ok => "ok",
            StatusCode::BadRequest => "bad_request",
            StatusCode::NotFound => "not_found",
            StatusCode::Unauthorized => "unauthorized",
            StatusCode::TimedOut => "timed_out",
            StatusCode::Duplicated => "duplicated",
            StatusCode::InvalidPage => "invalid_page",
            StatusCode::Error => "error",
        }
    }
}

impl Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an outcome failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// A single message.
    Message(String),
    /// Errors collected by an [`ErrorBuilder`].
    Errors(ErrorList),
}

impl Failure {
    /// Returns the failure message; for collected errors, their headline.
    pub fn message(&self) -> &str {
        match self {
            Failure::Message(message) => message,
            Failure::Errors(errors) => errors.error_message(),
        }
    }

    /// Returns the collected errors, if any.
    pub fn errors(&self) -> Option<&ErrorList> {
        match self {
            Failure::Message(_) => None,
            Failure::Errors(errors) => Some(errors),
        }
    }
}

impl Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Failure::Message(message)
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Failure::Message(message.to_string())
    }
}

impl From<ErrorList> for Failure {
    fn from(errors: ErrorList) -> Self {
        Failure::Errors(errors)
    }
}

impl From<ErrorBuilder> for Failure {
    fn from(builder: ErrorBuilder) -> Self {
        Failure::Errors(builder.into())
    }
}

impl From<BuildError> for Failure {
    fn from(err: BuildError) -> Self {
        Failure::Message(err.to_string())
    }
}

/// The result of an operation that reports a status upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation produced a value.
    Success(T),
    /// A failure, never with status [`StatusCode::Ok`] when built through
    /// [`Outcome::failure`].
    Failure { status: StatusCode, reason: Failure },
}

impl<T> Outcome<T> {
    /// Creates a failed outcome.
    ///
    /// A failure is never `Ok`: that status is recorded as `Error`.
    pub fn failure(status: StatusCode, reason: impl Into<Failure>) -> Self {
        let status = if status.is_ok() { StatusCode::Error } else { status };
        Outcome::Failure {
            status,
            reason: reason.into(),
        }
    }

    /// Returns the status; `Ok` for a success.
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Success(_) => StatusCode::Ok,
            Outcome::Failure { status, .. } => *status,
        }
    }

    /// Returns true if this outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Returns true if this outcome is a failure.
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Returns the success value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure { .. } => None,
        }
    }

    /// Returns the failure reason, if any.
    pub fn reason(&self) -> Option<&Failure> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure { reason, .. } => Some(reason),
        }
    }

    /// Maps the success value, keeping failures as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure { status, reason } => Outcome::Failure { status, reason },
        }
    }

    /// Chains an operation on the success value.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Outcome::Success(value) => f(value),
            Outcome::Failure { status, reason } => Outcome::Failure { status, reason },
        }
    }

    /// Converts into a `Result`, pairing failures with their status.
    pub fn into_result(self) -> Result<T, (StatusCode, Failure)> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure { status, reason } => Err((status, reason)),
        }
    }
}

impl Outcome<String> {
    /// Classifies an HTTP response.
    ///
    /// Successful statuses yield the body. Failures carry the body, or a
    /// default message when the body is empty.
    pub fn from_response(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let code = StatusCode::from_http(status);

        if code.is_ok() {
            return Outcome::Success(body);
        }

        let reason = match (code, body.is_empty()) {
            (_, false) => body,
            (StatusCode::TimedOut, true) => "timeout".to_string(),
            (_, true) => "The HTTP status code of the response was not expected".to_string(),
        };
        Outcome::failure(code, reason)
    }
}

impl<T> From<BuildError> for Outcome<T> {
    fn from(err: BuildError) -> Self {
        Outcome::failure(StatusCode::Error, err)
    }
}

impl<T> From<Validation<T, ErrorList>> for Outcome<T> {
    fn from(validation: Validation<T, ErrorList>) -> Self {
        match validation {
            Validation::Success(value) => Outcome::Success(value),
            Validation::Failure(errors) => Outcome::failure(StatusCode::BadRequest, errors),
        }
    }
}
