use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    CatalogError, NewProduct, Product, ProductId, ProductPage, ProductQuery, ProductRepository,
    Result,
};

/// In-memory product repository.
///
/// Products are kept ordered by id so listing pages behave like the
/// PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<BTreeMap<ProductId, Product>>>,
}

impl InMemoryProductRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored products.
    pub async fn product_count(&self) -> usize {
        self.products.read().await.len()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product> {
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(),
            name: product.name,
            description: product.description,
            price: product.price,
            created_at: now,
            updated_at: now,
        };
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn get(&self, id: ProductId) -> Result<Product> {
        self.products
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    async fn list(&self, query: &ProductQuery) -> Result<ProductPage> {
        let products = self.products.read().await;
        let page: Vec<Product> = products
            .values()
            .filter(|p| query.cursor.is_none_or(|cursor| p.id > cursor))
            .filter(|p| query.matches(p))
            .take(query.limit)
            .cloned()
            .collect();
        Ok(ProductPage::from_products(page, query.limit))
    }
}
