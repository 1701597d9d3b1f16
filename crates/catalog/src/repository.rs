use std::sync::Arc;

use async_trait::async_trait;

use crate::{NewProduct, Product, ProductId, ProductPage, ProductQuery, Result};

/// Storage for catalog products.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persists a new product and returns it with its assigned id and timestamps.
    async fn create(&self, product: NewProduct) -> Result<Product>;

    /// Fetches a product by id.
    ///
    /// Returns `CatalogError::NotFound` if no product has this id.
    async fn get(&self, id: ProductId) -> Result<Product>;

    /// Lists products matching the query, ordered by id.
    async fn list(&self, query: &ProductQuery) -> Result<ProductPage>;
}

#[async_trait]
impl<T: ProductRepository + ?Sized> ProductRepository for Arc<T> {
    async fn create(&self, product: NewProduct) -> Result<Product> {
        (**self).create(product).await
    }

    async fn get(&self, id: ProductId) -> Result<Product> {
        (**self).get(id).await
    }

    async fn list(&self, query: &ProductQuery) -> Result<ProductPage> {
        (**self).list(query).await
    }
}
