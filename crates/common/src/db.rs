//! Helpers for interpreting database errors consistently across services.

use crate::ErrorKind;

/// SQLSTATE raised by Postgres when a unique constraint or index is violated.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Returns true if the error is a unique constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Classifies a database error for the gateway.
///
/// Connection-level failures are reported as unavailable so callers may retry;
/// everything else is internal.
pub fn classify(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::RowNotFound => ErrorKind::NotFound,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ErrorKind::Unavailable
        }
        _ => ErrorKind::Internal,
    }
}
