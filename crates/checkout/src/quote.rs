//! Quote value types and the reader-facing line and product views.

use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

use crate::{QuoteError, Result};

/// A cart line as seen by the quoting path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl CartItem {
    pub fn new(product_id: ProductId, quantity: i64) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// The price and display name of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    pub currency: String,
    pub unit_amount: i64,
}

/// One priced line of a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    /// Always `unit_price.amount * quantity`.
    pub line_total: Money,
}

impl QuoteLine {
    /// Prices a cart line with the product's unit price.
    pub fn price(item: &CartItem, product: CatalogProduct) -> Result<Self> {
        let unit_price = Money::new(product.currency, product.unit_amount);
        let line_total =
            unit_price
                .checked_times(item.quantity)
                .ok_or(QuoteError::AmountOverflow {
                    product_id: item.product_id,
                })?;

        Ok(Self {
            product_id: item.product_id,
            name: product.name,
            quantity: item.quantity,
            unit_price,
            line_total,
        })
    }
}

/// A priced cart.
///
/// Lines are in the order of the cart lines they were computed from, and
/// `total` is the sum of every line total in the first line's currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub lines: Vec<QuoteLine>,
    pub total: Money,
}

impl Quote {
    /// Sums the line totals into a quote.
    ///
    /// Fails with `EmptyCart` for no lines and `MixedCurrency` when a line is
    /// priced in a different currency than the first.
    pub fn from_lines(lines: Vec<QuoteLine>) -> Result<Self> {
        let first = lines.first().ok_or(QuoteError::EmptyCart)?;
        let mut total = Money::zero(first.line_total.currency.clone());

        for line in &lines {
            if line.line_total.currency != total.currency {
                return Err(QuoteError::MixedCurrency {
                    expected: total.currency,
                    found: line.line_total.currency.clone(),
                });
            }
            total = total
                .checked_add(&line.line_total)
                .ok_or(QuoteError::AmountOverflow {
                    product_id: line.product_id,
                })?;
        }

        Ok(Self { lines, total })
    }
}
