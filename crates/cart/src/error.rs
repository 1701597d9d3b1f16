use common::{CartId, ErrorKind, UserId};
use thiserror::Error;

/// Errors that can occur in the cart service.
#[derive(Debug, Error)]
pub enum CartError {
    /// A line quantity was zero or negative.
    #[error("quantity must be greater than zero: {quantity}")]
    InvalidQuantity { quantity: i32 },

    /// A line quantity would exceed the storable range.
    #[error("quantity out of range for product {product_id}")]
    QuantityOutOfRange { product_id: String },

    /// The user has no active cart.
    #[error("cart not found for user {0}")]
    NotFound(UserId),

    /// No active cart exists with the given id.
    #[error("cart not found: {0}")]
    CartNotFound(CartId),

    /// Another active cart already exists for the user.
    ///
    /// Raised by the store when its uniqueness constraint rejects a create.
    #[error("active cart already exists for user {user_id}")]
    UniqueViolation { user_id: UserId },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CartError {
    /// Classifies this error for callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CartError::InvalidQuantity { .. }
            | CartError::QuantityOutOfRange { .. } => ErrorKind::InvalidArgument,
            CartError::NotFound(_) | CartError::CartNotFound(_) => ErrorKind::NotFound,
            CartError::UniqueViolation { .. } => ErrorKind::Internal,
            CartError::Database(e) => common::db::classify(e),
        }
    }
}

/// Result type for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;
