//! Domain-level validation errors for the session subsystem.

use thiserror::Error;

/// Errors raised while constructing or mutating a [`super::Session`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionDomainError {
    /// The session name, when provided, must not be empty.
    #[error("session name must not be empty")]
    EmptySessionName,
}
