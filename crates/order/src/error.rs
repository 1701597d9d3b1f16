use common::{ErrorKind, OrderId};
use thiserror::Error;

/// Errors that can occur in the order service.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("items must not be empty")]
    EmptyItems,

    #[error("currency is required")]
    MissingCurrency,

    #[error("shipping amount cannot be negative, got {amount}")]
    NegativeShipping { amount: i64 },

    #[error("item {index}: quantity must be positive, got {quantity}")]
    InvalidQuantity { index: usize, quantity: i32 },

    #[error("item {index}: unit amount cannot be negative, got {amount}")]
    NegativeUnitAmount { index: usize, amount: i64 },

    /// A line total, the subtotal, or the total does not fit in an amount.
    #[error("item {index}: amount overflow")]
    AmountOverflow { index: usize },

    /// A stored line total disagrees with `unit_amount * quantity`.
    #[error("item {index}: line total mismatch")]
    LineTotalMismatch { index: usize },

    /// No order exists with the given id.
    #[error("order not found: {0}")]
    NotFound(OrderId),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl OrderError {
    /// Classifies this error for callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::EmptyItems
            | OrderError::MissingCurrency
            | OrderError::NegativeShipping { .. }
            | OrderError::InvalidQuantity { .. }
            | OrderError::NegativeUnitAmount { .. }
            | OrderError::AmountOverflow { .. } => ErrorKind::InvalidArgument,
            OrderError::LineTotalMismatch { .. } => ErrorKind::Internal,
            OrderError::NotFound(_) => ErrorKind::NotFound,
            OrderError::Database(e) => common::db::classify(e),
        }
    }
}

/// Result type for order operations.
pub type Result<T> = std::result::Result<T, OrderError>;
