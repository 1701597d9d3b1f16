//! Order entity and request validation.

use chrono::{DateTime, Utc};
use common::{OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{OrderError, Result};

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created and awaiting payment.
    #[default]
    Pending,
}

impl OrderStatus {
    /// Returns the status as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
        }
    }

    /// Parses a stored status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(OrderStatus::Pending),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One requested order item, priced by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub name: String,
    pub unit_amount: i64,
    pub quantity: i32,
}

/// A request to create an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: UserId,
    pub currency: String,
    pub shipping_amount: i64,
    pub items: Vec<OrderItemRequest>,
}

impl CreateOrderRequest {
    /// Validates the request and computes every amount.
    ///
    /// Errors name the offending item by its position in `items`.
    pub fn validate(self) -> Result<NewOrder> {
        if self.items.is_empty() {
            return Err(OrderError::EmptyItems);
        }
        let currency = self.currency.trim();
        if currency.is_empty() {
            return Err(OrderError::MissingCurrency);
        }
        if self.shipping_amount < 0 {
            return Err(OrderError::NegativeShipping {
                amount: self.shipping_amount,
            });
        }

        let mut subtotal_amount: i64 = 0;
        let mut items = Vec::with_capacity(self.items.len());

        for (index, item) in self.items.into_iter().enumerate() {
            if item.quantity <= 0 {
                return Err(OrderError::InvalidQuantity {
                    index,
                    quantity: item.quantity,
                });
            }
            if item.unit_amount < 0 {
                return Err(OrderError::NegativeUnitAmount {
                    index,
                    amount: item.unit_amount,
                });
            }

            let line_total_amount = item
                .unit_amount
                .checked_mul(i64::from(item.quantity))
                .ok_or(OrderError::AmountOverflow { index })?;
            subtotal_amount = subtotal_amount
                .checked_add(line_total_amount)
                .ok_or(OrderError::AmountOverflow { index })?;

            items.push(NewOrderItem {
                product_id: item.product_id,
                name: item.name,
                unit_amount: item.unit_amount,
                quantity: item.quantity,
                line_total_amount,
            });
        }

        let total_amount = subtotal_amount
            .checked_add(self.shipping_amount)
            .ok_or(OrderError::AmountOverflow {
                index: items.len() - 1,
            })?;

        Ok(NewOrder {
            user_id: self.user_id,
            status: OrderStatus::Pending,
            currency: currency.to_string(),
            subtotal_amount,
            shipping_amount: self.shipping_amount,
            total_amount,
            items,
        })
    }
}

/// A validated order item with its computed line total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_amount: i64,
    pub quantity: i32,
    pub line_total_amount: i64,
}

/// A validated order ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub status: OrderStatus,
    pub currency: String,
    pub subtotal_amount: i64,
    pub shipping_amount: i64,
    pub total_amount: i64,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    /// Checks that each line total equals `unit_amount * quantity`.
    ///
    /// Repositories call this before writing anything.
    pub fn verify_line_totals(&self) -> Result<()> {
        for (index, item) in self.items.iter().enumerate() {
            let expected = item.unit_amount.checked_mul(i64::from(item.quantity));
            if expected != Some(item.line_total_amount) {
                return Err(OrderError::LineTotalMismatch { index });
            }
        }
        Ok(())
    }
}

/// A persisted order item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub name: String,
    pub unit_amount: i64,
    pub quantity: i32,
    pub line_total_amount: i64,
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub currency: String,
    pub subtotal_amount: i64,
    pub shipping_amount: i64,
    pub total_amount: i64,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
