//! Product entity and the validated inputs used to create and list products.

use chrono::{DateTime, Utc};
use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

use crate::{CatalogError, Result};

/// Default page size when a caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Money,
}

impl NewProduct {
    /// Validates and normalizes product fields.
    ///
    /// Name and currency are trimmed and must be non-empty; the amount must be
    /// positive.
    pub fn new(
        name: &str,
        description: impl Into<String>,
        currency: &str,
        amount: i64,
    ) -> Result<Self> {
        let name = name.trim();
        let currency = currency.trim();

        if name.is_empty() {
            return Err(CatalogError::InvalidInput("name is required".to_string()));
        }
        if currency.is_empty() {
            return Err(CatalogError::InvalidInput(
                "currency is required".to_string(),
            ));
        }
        if amount <= 0 {
            return Err(CatalogError::InvalidInput(format!(
                "price amount must be greater than 0, got {amount}"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            description: description.into(),
            price: Money::new(currency, amount),
        })
    }
}

/// Parameters for listing products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    /// Case-insensitive substring matched against product names. Empty matches all.
    pub query: String,
    /// Page size, always within `1..=MAX_PAGE_SIZE`.
    pub limit: usize,
    /// Only products with an id strictly greater than this are returned.
    pub cursor: Option<ProductId>,
}

impl ProductQuery {
    /// Builds a query, clamping the limit.
    ///
    /// A non-positive limit selects the default page size.
    pub fn new(query: &str, limit: i64, cursor: Option<ProductId>) -> Self {
        let limit = if limit <= 0 {
            DEFAULT_PAGE_SIZE
        } else {
            (limit as usize).min(MAX_PAGE_SIZE)
        };
        Self {
            query: query.trim().to_string(),
            limit,
            cursor,
        }
    }

    /// Returns true if the product's name matches the search text.
    pub fn matches(&self, product: &Product) -> bool {
        self.query.is_empty()
            || product
                .name
                .to_lowercase()
                .contains(&self.query.to_lowercase())
    }
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self::new("", 0, None)
    }
}

/// A page of products and the cursor for the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Present only when the page was full, so more products may follow.
    pub next_cursor: Option<ProductId>,
}

impl ProductPage {
    /// Builds a page, deriving the next cursor from the last product.
    pub fn from_products(products: Vec<Product>, limit: usize) -> Self {
        let next_cursor = if products.len() < limit {
            None
        } else {
            products.last().map(|p| p.id)
        };
        Self {
            products,
            next_cursor,
        }
    }
}
