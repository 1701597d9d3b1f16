//! Cart entity and line items.

use chrono::{DateTime, Utc};
use common::{CartId, ProductId, UserId};
use serde::{Deserialize, Serialize};

use crate::{CartError, Result};

/// Lifecycle status of a cart.
///
/// Only active carts are visible to this service; a store may keep carts in
/// other states, but they never compete with the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CartStatus {
    #[default]
    Active,
}

impl CartStatus {
    /// Returns the status as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            CartStatus::Active => "active",
        }
    }
}

impl std::fmt::Display for CartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One product and its quantity within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: i32,
}

impl CartLine {
    /// Creates a line, rejecting non-positive quantities.
    pub fn new(product_id: ProductId, quantity: i32) -> Result<Self> {
        validate_quantity(quantity)?;
        Ok(Self {
            product_id,
            quantity,
        })
    }
}

/// A user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub status: CartStatus,
    /// Lines in the order they were first added.
    pub lines: Vec<CartLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Returns the line for a product, if present.
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Returns the quantity of a product, or zero if absent.
    pub fn quantity_of(&self, product_id: ProductId) -> i32 {
        self.line(product_id).map(|l| l.quantity).unwrap_or(0)
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

pub(crate) fn validate_quantity(quantity: i32) -> Result<()> {
    if quantity <= 0 {
        return Err(CartError::InvalidQuantity { quantity });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_line_rejects_non_positive() {
        let product_id = ProductId::new();
        assert!(matches!(
            CartLine::new(product_id, 0),
            Err(CartError::InvalidQuantity { quantity: 0 })
        ));
        assert!(matches!(
            CartLine::new(product_id, -3),
            Err(CartError::InvalidQuantity { quantity: -3 })
        ));
        assert_eq!(CartLine::new(product_id, 2).unwrap().quantity, 2);
    }

    #[test]
    fn test_quantity_of() {
        let now = Utc::now();
        let p1 = ProductId::new();
        let cart = Cart {
            id: CartId::new(),
            user_id: UserId::new(),
            status: CartStatus::Active,
            lines: vec![CartLine::new(p1, 4).unwrap()],
            created_at: now,
            updated_at: now,
        };
        assert_eq!(cart.quantity_of(p1), 4);
        assert_eq!(cart.quantity_of(ProductId::new()), 0);
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&CartStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(CartStatus::Active.to_string(), "active");
    }
}
