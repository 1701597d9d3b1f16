use cart::CartError;
use catalog::CatalogError;
use common::{ErrorKind, ProductId};
use thiserror::Error;

/// Errors that can occur while computing a quote.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line had a zero or negative quantity.
    #[error("invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: ProductId, quantity: i64 },

    /// Lines are priced in more than one currency.
    #[error("mixed currencies in cart: expected {expected}, found {found}")]
    MixedCurrency { expected: String, found: String },

    /// A line total or the grand total does not fit in an amount.
    #[error("amount overflow for product {product_id}")]
    AmountOverflow { product_id: ProductId },

    /// Reading the cart failed.
    #[error("cart lookup failed: {0}")]
    Cart(#[from] CartError),

    /// Looking up a product failed.
    #[error("product lookup failed: {0}")]
    Catalog(#[from] CatalogError),

    /// The caller's deadline passed before the quote was complete.
    #[error("quote deadline exceeded")]
    DeadlineExceeded,

    /// A lookup task panicked or could not run.
    #[error("quote task failed: {0}")]
    TaskFailed(String),
}

impl QuoteError {
    /// Classifies this error for callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuoteError::EmptyCart => ErrorKind::NotFound,
            QuoteError::InvalidQuantity { .. }
            | QuoteError::MixedCurrency { .. }
            | QuoteError::AmountOverflow { .. } => ErrorKind::InvalidArgument,
            QuoteError::Cart(e) => e.kind(),
            QuoteError::Catalog(e) => e.kind(),
            QuoteError::DeadlineExceeded => ErrorKind::Unavailable,
            QuoteError::TaskFailed(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for checkout operations.
pub type Result<T> = std::result::Result<T, QuoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_source() {
        assert_eq!(QuoteError::EmptyCart.kind(), ErrorKind::NotFound);
        assert_eq!(QuoteError::DeadlineExceeded.kind(), ErrorKind::Unavailable);
        assert_eq!(
            QuoteError::TaskFailed("panicked".into()).kind(),
            ErrorKind::Internal
        );

        let missing = QuoteError::from(CatalogError::NotFound(ProductId::new()));
        assert_eq!(missing.kind(), ErrorKind::NotFound);

        let bad_quantity = QuoteError::from(CartError::InvalidQuantity { quantity: 0 });
        assert_eq!(bad_quantity.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_empty_cart_message() {
        assert_eq!(QuoteError::EmptyCart.to_string(), "cart is empty");
    }
}
