use thiserror::Error;

/// Errors produced when parsing identifiers received from callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The identifier was empty or only whitespace.
    #[error("{kind} is required")]
    Missing { kind: &'static str },

    /// The identifier is not a valid UUID.
    #[error("invalid {kind}: {value}")]
    Malformed { kind: &'static str, value: String },
}

/// Coarse classification of a failure, shared by every service so the
/// gateway can translate errors uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request itself is malformed; retrying will not help.
    InvalidArgument,
    /// The referenced resource does not exist.
    NotFound,
    /// A dependency is temporarily unavailable or a deadline passed.
    Unavailable,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// Stable upper-case code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Unavailable => "UNAVAILABLE",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}
