//! Shared domain types for the Secret Santa client.
//!
//! Everything here is plain data: the [`outcome::Outcome`] returned by every
//! use-case call, the error taxonomy it carries, and the room/user DTOs
//! exchanged with the service.

pub mod outcome;
pub mod room;
pub mod user;

pub use outcome::{DomainError, DomainErrorKind, ErrorInfo, Outcome};
