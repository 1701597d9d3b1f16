use async_trait::async_trait;
use chrono::Utc;
use common::Money;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    CatalogError, NewProduct, Product, ProductId, ProductPage, ProductQuery, ProductRepository,
    Result,
};

/// PostgreSQL-backed product repository.
#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    /// Creates a new repository over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: Money::new(
                row.try_get::<String, _>("currency")?,
                row.try_get::<i64, _>("price_amount")?,
            ),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO products
                (id, name, description, price_amount, currency, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, name, description, price_amount, currency, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.amount)
        .bind(&product.price.currency)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_product(row)
    }

    async fn get(&self, id: ProductId) -> Result<Product> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, name, description, price_amount, currency, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::row_to_product(row),
            None => Err(CatalogError::NotFound(id)),
        }
    }

    async fn list(&self, query: &ProductQuery) -> Result<ProductPage> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price_amount, currency, created_at, updated_at
            FROM products
            WHERE ($1 = '' OR strpos(lower(name), lower($1)) > 0)
              AND ($2::uuid IS NULL OR id > $2)
            ORDER BY id ASC
            LIMIT $3
            "#,
        )
        .bind(&query.query)
        .bind(query.cursor.map(|c| c.as_uuid()))
        .bind(query.limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let products = rows
            .into_iter()
            .map(Self::row_to_product)
            .collect::<Result<Vec<_>>>()?;
        Ok(ProductPage::from_products(products, query.limit))
    }
}
