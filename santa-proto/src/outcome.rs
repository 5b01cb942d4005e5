//! Success/failure result of a use-case call and its error taxonomy.
//!
//! Use-cases never propagate expected failures as panics or `Err`s across
//! their boundary; they hand back an [`Outcome`] and the caller branches on
//! both variants.

use serde::{Deserialize, Serialize};

/// Result of one asynchronous use-case invocation.
///
/// There is deliberately no `unwrap`-style accessor: callers `match` on the
/// two variants, or convert explicitly with [`into_result`](Self::into_result).
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an Outcome must be branched on, including its failure variant"]
pub enum Outcome<T> {
    /// The operation succeeded with a value.
    Success(T),
    /// The operation failed.
    Failure(ErrorInfo),
}

impl<T> Outcome<T> {
    /// Shorthand for a failure carrying a structured domain error.
    pub fn domain(kind: DomainErrorKind) -> Self {
        Self::Failure(ErrorInfo::Domain(DomainError::new(kind)))
    }

    /// Shorthand for a failure carrying only an opaque identifying name.
    pub fn unclassified(name: impl Into<String>) -> Self {
        Self::Failure(ErrorInfo::unclassified(name))
    }

    /// Returns `true` for [`Outcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Transform the success value, leaving a failure untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Convert into a standard `Result` for `?`-style propagation.
    ///
    /// # Errors
    ///
    /// Returns the carried [`ErrorInfo`] for [`Outcome::Failure`].
    pub fn into_result(self) -> Result<T, ErrorInfo> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(error) => Err(error),
        }
    }
}

impl<T> From<Result<T, ErrorInfo>> for Outcome<T> {
    fn from(result: Result<T, ErrorInfo>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

/// Why a use-case call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorInfo {
    /// An expected, classifiable failure of the business operation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Anything else. Only the failure's identifying name is kept.
    #[error("unclassified failure: {name}")]
    Unclassified {
        /// Short type name of the underlying failure (e.g. `IoError`).
        name: String,
    },
}

impl ErrorInfo {
    /// Build an unclassified error from an opaque name.
    pub fn unclassified(name: impl Into<String>) -> Self {
        Self::Unclassified { name: name.into() }
    }

    /// Build an unclassified error named after the concrete error type.
    ///
    /// Only the last path segment of the type name is kept, without generic
    /// arguments, so no diagnostic text of the error itself leaks out.
    pub fn from_error<E: std::error::Error>(_error: &E) -> Self {
        Self::unclassified(short_type_name::<E>())
    }

    /// Returns the domain error if this is one.
    #[must_use]
    pub const fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(error) => Some(error),
            Self::Unclassified { .. } => None,
        }
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}

/// A structured failure reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}{}", code_suffix(.code.as_deref()))]
pub struct DomainError {
    /// What went wrong.
    pub kind: DomainErrorKind,
    /// Optional machine-readable code supplied by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl DomainError {
    /// A domain error without a service code.
    #[must_use]
    pub const fn new(kind: DomainErrorKind) -> Self {
        Self { kind, code: None }
    }

    /// Attach a machine-readable code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

fn code_suffix(code: Option<&str>) -> String {
    code.map(|c| format!(" ({c})")).unwrap_or_default()
}

/// The closed set of failures the service reports in a structured form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainErrorKind {
    /// The auth token was missing, expired or rejected.
    Unauthorized,
    /// The caller is not allowed to perform this operation.
    Forbidden,
    /// The user record does not exist.
    UserNotFound,
    /// A user with this identity is already registered.
    UserAlreadyExists,
    /// The room does not exist.
    RoomNotFound,
    /// A room with this name already exists for the owner.
    RoomAlreadyExists,
    /// The room's game has already started.
    GameAlreadyStarted,
    /// The room password did not match.
    WrongPassword,
    /// The request was rejected as malformed by the service.
    BadRequest,
}

impl std::fmt::Display for DomainErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::UserNotFound => "user not found",
            Self::UserAlreadyExists => "user already exists",
            Self::RoomNotFound => "room not found",
            Self::RoomAlreadyExists => "room already exists",
            Self::GameAlreadyStarted => "game already started",
            Self::WrongPassword => "wrong password",
            Self::BadRequest => "bad request",
        };
        f.write_str(text)
    }
}
