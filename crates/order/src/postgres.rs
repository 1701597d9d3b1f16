use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    NewOrder, Order, OrderError, OrderId, OrderItem, OrderRepository, OrderStatus, ProductId,
    Result, UserId,
};

/// PostgreSQL-backed order repository.
///
/// An order row and its item rows are written in a single transaction.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new repository over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_item(row: &PgRow) -> Result<OrderItem> {
        Ok(OrderItem {
            id: row.try_get("id")?,
            order_id: OrderId::from_uuid(row.try_get::<Uuid, _>("order_id")?),
            product_id: ProductId::from_uuid(row.try_get::<Uuid, _>("product_id")?),
            name: row.try_get("name")?,
            unit_amount: row.try_get("unit_amount")?,
            quantity: row.try_get("quantity")?,
            line_total_amount: row.try_get("line_total_amount")?,
        })
    }

    fn row_to_order(row: &PgRow, items: Vec<OrderItem>) -> Result<Order> {
        let status: String = row.try_get("status")?;
        let status = OrderStatus::parse(&status).ok_or_else(|| {
            OrderError::Database(sqlx::Error::Decode(
                format!("unknown order status: {status}").into(),
            ))
        })?;

        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            user_id: UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            status,
            currency: row.try_get("currency")?,
            subtotal_amount: row.try_get("subtotal_amount")?,
            shipping_amount: row.try_get("shipping_amount")?,
            total_amount: row.try_get("total_amount")?,
            items,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(&self, order: NewOrder) -> Result<Order> {
        order.verify_line_totals()?;

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let order_row = sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, status, currency, subtotal_amount,
                                shipping_amount, total_amount, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id, user_id, status, currency, subtotal_amount,
                      shipping_amount, total_amount, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(order.user_id.as_uuid())
        .bind(order.status.as_str())
        .bind(&order.currency)
        .bind(order.subtotal_amount)
        .bind(order.shipping_amount)
        .bind(order.total_amount)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let order_id: Uuid = order_row.try_get("id")?;
        let mut items = Vec::with_capacity(order.items.len());

        for (line_no, item) in order.items.iter().enumerate() {
            let row = sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, line_no, product_id, name,
                                         unit_amount, quantity, line_total_amount)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id, order_id, product_id, name, unit_amount, quantity, line_total_amount
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(order_id)
            .bind(line_no as i32)
            .bind(item.product_id.as_uuid())
            .bind(&item.name)
            .bind(item.unit_amount)
            .bind(item.quantity)
            .bind(item.line_total_amount)
            .fetch_one(&mut *tx)
            .await?;

            items.push(Self::row_to_item(&row)?);
        }

        tx.commit().await?;

        let created = Self::row_to_order(&order_row, items)?;
        tracing::debug!(order_id = %created.id, items = created.items.len(), "order persisted");
        Ok(created)
    }

    async fn get(&self, id: OrderId) -> Result<Order> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, user_id, status, currency, subtotal_amount,
                   shipping_amount, total_amount, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or(OrderError::NotFound(id))?;

        let item_rows = sqlx::query(
            r#"
            SELECT id, order_id, product_id, name, unit_amount, quantity, line_total_amount
            FROM order_items
            WHERE order_id = $1
            ORDER BY line_no
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let items = item_rows
            .iter()
            .map(Self::row_to_item)
            .collect::<Result<Vec<_>>>()?;
        Self::row_to_order(&row, items)
    }
}
