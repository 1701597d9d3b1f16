use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Cart, CartError, CartId, CartLine, CartRepository, CartStatus, ProductId, Result, UserId,
};

/// SQLSTATE raised when an integer column overflows.
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// PostgreSQL-backed cart repository.
///
/// Relies on the `unique_active_cart_per_user` partial index for cart
/// creation races and on `INSERT ... ON CONFLICT DO UPDATE` for increments.
#[derive(Clone)]
pub struct PostgresCartRepository {
    pool: PgPool,
}

impl PostgresCartRepository {
    /// Creates a new repository over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn list_lines(&self, cart_id: CartId) -> Result<Vec<CartLine>> {
        let rows = sqlx::query(
            r#"
            SELECT product_id, quantity
            FROM cart_items
            WHERE cart_id = $1
            ORDER BY created_at ASC, product_id ASC
            "#,
        )
        .bind(cart_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(CartLine {
                    product_id: ProductId::from_uuid(row.try_get::<Uuid, _>("product_id")?),
                    quantity: row.try_get("quantity")?,
                })
            })
            .collect()
    }

    fn row_to_cart(row: &PgRow, lines: Vec<CartLine>) -> Result<Cart> {
        Ok(Cart {
            id: CartId::from_uuid(row.try_get::<Uuid, _>("id")?),
            user_id: UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            status: CartStatus::Active,
            lines,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn map_write_error(e: sqlx::Error, product_id: ProductId) -> CartError {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.code().as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE)
        {
            return CartError::QuantityOutOfRange {
                product_id: product_id.to_string(),
            };
        }
        CartError::Database(e)
    }
}

#[async_trait]
impl CartRepository for PostgresCartRepository {
    async fn get_active(&self, user_id: UserId) -> Result<Cart> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, user_id, created_at, updated_at
            FROM carts
            WHERE user_id = $1 AND status = 'active'
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or(CartError::NotFound(user_id))?;
        let cart_id = CartId::from_uuid(row.try_get::<Uuid, _>("id")?);
        let lines = self.list_lines(cart_id).await?;
        Self::row_to_cart(&row, lines)
    }

    async fn create_active(&self, user_id: UserId) -> Result<Cart> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO carts (id, user_id, status, created_at, updated_at)
            VALUES ($1, $2, 'active', $3, $3)
            RETURNING id, user_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id.as_uuid())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if common::db::is_unique_violation(&e) {
                return CartError::UniqueViolation { user_id };
            }
            CartError::Database(e)
        })?;

        Self::row_to_cart(&row, Vec::new())
    }

    async fn add_item(&self, cart_id: CartId, product_id: ProductId, delta: i32) -> Result<i32> {
        // One statement: touch the cart and upsert the line. The conflict
        // branch adds to the stored quantity inside the database.
        let quantity: Option<i32> = sqlx::query_scalar(
            r#"
            WITH touched AS (
                UPDATE carts SET updated_at = NOW()
                WHERE id = $1 AND status = 'active'
                RETURNING id
            )
            INSERT INTO cart_items (cart_id, product_id, quantity)
            SELECT id, $2, $3 FROM touched
            ON CONFLICT (cart_id, product_id) DO UPDATE
                SET quantity = cart_items.quantity + EXCLUDED.quantity,
                    updated_at = NOW()
            RETURNING quantity
            "#,
        )
        .bind(cart_id.as_uuid())
        .bind(product_id.as_uuid())
        .bind(delta)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, product_id))?;

        quantity.ok_or(CartError::CartNotFound(cart_id))
    }

    async fn set_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<()> {
        let stored: Option<i32> = sqlx::query_scalar(
            r#"
            WITH touched AS (
                UPDATE carts SET updated_at = NOW()
                WHERE id = $1 AND status = 'active'
                RETURNING id
            )
            INSERT INTO cart_items (cart_id, product_id, quantity)
            SELECT id, $2, $3 FROM touched
            ON CONFLICT (cart_id, product_id) DO UPDATE
                SET quantity = EXCLUDED.quantity,
                    updated_at = NOW()
            RETURNING quantity
            "#,
        )
        .bind(cart_id.as_uuid())
        .bind(product_id.as_uuid())
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;

        stored.map(|_| ()).ok_or(CartError::CartNotFound(cart_id))
    }

    async fn remove_item(&self, cart_id: CartId, product_id: ProductId) -> Result<()> {
        let touched: i64 = sqlx::query_scalar(
            r#"
            WITH touched AS (
                UPDATE carts SET updated_at = NOW()
                WHERE id = $1 AND status = 'active'
                RETURNING id
            ), removed AS (
                DELETE FROM cart_items
                USING touched
                WHERE cart_items.cart_id = touched.id AND cart_items.product_id = $2
                RETURNING 1
            )
            SELECT COUNT(*) FROM touched
            "#,
        )
        .bind(cart_id.as_uuid())
        .bind(product_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        if touched == 0 {
            return Err(CartError::CartNotFound(cart_id));
        }
        Ok(())
    }

    async fn clear(&self, cart_id: CartId) -> Result<()> {
        let touched: i64 = sqlx::query_scalar(
            r#"
            WITH touched AS (
                UPDATE carts SET updated_at = NOW()
                WHERE id = $1 AND status = 'active'
                RETURNING id
            ), removed AS (
                DELETE FROM cart_items
                USING touched
                WHERE cart_items.cart_id = touched.id
                RETURNING 1
            )
            SELECT COUNT(*) FROM touched
            "#,
        )
        .bind(cart_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        if touched == 0 {
            return Err(CartError::CartNotFound(cart_id));
        }
        Ok(())
    }
}
