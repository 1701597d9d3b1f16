//! Readers backed by the cart and catalog services.

use std::sync::Arc;

use async_trait::async_trait;
use cart::{CartRepository, CartService};
use catalog::{CatalogService, ProductRepository};
use common::{ProductId, UserId};

use crate::{CartItem, CartReader, CatalogProduct, CatalogReader, Result};

/// Reads cart lines through [`CartService`].
///
/// The cart is materialized with `get_or_create`, so a user without a cart
/// reads as an empty one rather than as not found.
pub struct CartServiceReader<R: CartRepository> {
    service: Arc<CartService<R>>,
}

impl<R: CartRepository> CartServiceReader<R> {
    pub fn new(service: Arc<CartService<R>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<R: CartRepository> CartReader for CartServiceReader<R> {
    async fn get_cart(&self, user_id: UserId) -> Result<Vec<CartItem>> {
        let cart = self.service.get_or_create(user_id).await?;
        Ok(cart
            .lines
            .into_iter()
            .map(|line| CartItem::new(line.product_id, i64::from(line.quantity)))
            .collect())
    }
}

/// Reads product prices through [`CatalogService`].
pub struct CatalogServiceReader<R: ProductRepository> {
    service: Arc<CatalogService<R>>,
}

impl<R: ProductRepository> CatalogServiceReader<R> {
    pub fn new(service: Arc<CatalogService<R>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<R: ProductRepository> CatalogReader for CatalogServiceReader<R> {
    async fn get_product(&self, product_id: ProductId) -> Result<CatalogProduct> {
        let product = self.service.get_product(product_id).await?;
        Ok(CatalogProduct {
            id: product.id,
            name: product.name,
            currency: product.price.currency,
            unit_amount: product.price.amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuoteError;
    use cart::InMemoryCartRepository;
    use catalog::{CatalogError, InMemoryProductRepository};

    #[tokio::test]
    async fn test_cart_reader_materializes_cart() {
        let carts = Arc::new(CartService::new(InMemoryCartRepository::new()));
        let reader = CartServiceReader::new(carts.clone());
        let user_id = UserId::new();

        let items = reader.get_cart(user_id).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(carts.repository().active_cart_count(user_id).await, 1);
    }

    #[tokio::test]
    async fn test_cart_reader_maps_lines_in_order() {
        let carts = Arc::new(CartService::new(InMemoryCartRepository::new()));
        let reader = CartServiceReader::new(carts.clone());
        let user_id = UserId::new();
        let p1 = ProductId::new();
        let p2 = ProductId::new();

        let cart = carts.get_or_create(user_id).await.unwrap();
        carts.add_item(cart.id, p1, 2).await.unwrap();
        carts.add_item(cart.id, p2, 3).await.unwrap();

        let items = reader.get_cart(user_id).await.unwrap();
        assert_eq!(items, vec![CartItem::new(p1, 2), CartItem::new(p2, 3)]);
    }

    #[tokio::test]
    async fn test_catalog_reader() {
        let catalog = Arc::new(CatalogService::new(InMemoryProductRepository::new()));
        let reader = CatalogServiceReader::new(catalog.clone());
        let created = catalog
            .create_product("Coffee", "arabica", "IDR", 1000)
            .await
            .unwrap();

        let product = reader.get_product(created.id).await.unwrap();
        assert_eq!(product.name, "Coffee");
        assert_eq!(product.currency, "IDR");
        assert_eq!(product.unit_amount, 1000);

        let missing = reader.get_product(ProductId::new()).await;
        assert!(matches!(
            missing,
            Err(QuoteError::Catalog(CatalogError::NotFound(_)))
        ));
    }
}
