// crates/sirsi-core/src/error.rs

use thiserror::Error;

/// Control-plane error taxonomy.
///
/// Every variant maps to a stable wire code (see [`AdminError::code`]).
/// Registries produce `NotFound` and `Validation`; the settings store
/// produces `Io`; the router produces `Unimplemented` and `NotImplemented`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    /// Unknown entity id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness or shape violation on create/update, or a malformed request.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No handler registered for the requested service/method.
    #[error("Unimplemented: {0}")]
    Unimplemented(String),

    /// Method is known to the router but its domain logic is not supplied.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Settings persistence failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// The caller cancelled the request or its deadline expired.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Anything unexpected (poisoned locks, serialization of our own types).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminError {
    /// Stable, documented code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AdminError::NotFound(_) => "not_found",
            AdminError::Validation(_) => "invalid_argument",
            AdminError::Unimplemented(_) => "unimplemented",
            AdminError::NotImplemented(_) => "not_implemented",
            AdminError::Io(_) => "io_error",
            AdminError::Cancelled(_) => "cancelled",
            AdminError::Internal(_) => "internal",
        }
    }

    /// Shorthand for a `NotFound` on an entity kind and id.
    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        AdminError::NotFound(format!("{} {}", kind, id))
    }
}

impl From<std::io::Error> for AdminError {
    fn from(e: std::io::Error) -> Self {
        AdminError::Io(e.to_string())
    }
}
