use std::sync::Arc;

use async_trait::async_trait;
use common::{ProductId, UserId};

use crate::{CartItem, CatalogProduct, Result};

/// Read access to a user's cart lines.
#[async_trait]
pub trait CartReader: Send + Sync {
    /// Returns the user's cart lines in cart order.
    async fn get_cart(&self, user_id: UserId) -> Result<Vec<CartItem>>;
}

/// Read access to product prices.
///
/// Called concurrently from many lookup tasks.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Returns the product, or a `NotFound`-classified error.
    async fn get_product(&self, product_id: ProductId) -> Result<CatalogProduct>;
}

#[async_trait]
impl<T: CartReader + ?Sized> CartReader for Arc<T> {
    async fn get_cart(&self, user_id: UserId) -> Result<Vec<CartItem>> {
        (**self).get_cart(user_id).await
    }
}

#[async_trait]
impl<T: CatalogReader + ?Sized> CatalogReader for Arc<T> {
    async fn get_product(&self, product_id: ProductId) -> Result<CatalogProduct> {
        (**self).get_product(product_id).await
    }
}
