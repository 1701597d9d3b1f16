//! Catalog service wrapping a product repository with input validation.

use crate::{NewProduct, Product, ProductId, ProductPage, ProductQuery, ProductRepository, Result};

/// Service for managing catalog products.
pub struct CatalogService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> CatalogService<R> {
    /// Creates a new catalog service over the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Validates and creates a product.
    #[tracing::instrument(skip(self, description))]
    pub async fn create_product(
        &self,
        name: &str,
        description: &str,
        currency: &str,
        amount: i64,
    ) -> Result<Product> {
        let product = NewProduct::new(name, description, currency, amount)?;
        let created = self.repo.create(product).await?;
        metrics::counter!("products_created_total").increment(1);
        tracing::info!(product_id = %created.id, "product created");
        Ok(created)
    }

    /// Fetches a product by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product> {
        self.repo.get(id).await
    }

    /// Lists products, clamping the page size to `1..=100`.
    #[tracing::instrument(skip(self))]
    pub async fn list_products(
        &self,
        query: &str,
        limit: i64,
        cursor: Option<ProductId>,
    ) -> Result<ProductPage> {
        self.repo
            .list(&ProductQuery::new(query, limit, cursor))
            .await
    }
}
