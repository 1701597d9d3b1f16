use common::{ErrorKind, ProductId};
use thiserror::Error;

/// Errors that can occur in the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A field failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No product exists with the given id.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CatalogError {
    /// Classifies this error for callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::InvalidInput(_) => ErrorKind::InvalidArgument,
            CatalogError::NotFound(_) => ErrorKind::NotFound,
            CatalogError::Database(e) => common::db::classify(e),
        }
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
