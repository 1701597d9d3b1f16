use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{NewOrder, Order, OrderError, OrderId, OrderItem, OrderRepository, Result};

/// In-memory order repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: NewOrder) -> Result<Order> {
        order.verify_line_totals()?;

        let now = Utc::now();
        let id = OrderId::new();
        let items = order
            .items
            .into_iter()
            .map(|item| OrderItem {
                id: Uuid::new_v4(),
                order_id: id,
                product_id: item.product_id,
                name: item.name,
                unit_amount: item.unit_amount,
                quantity: item.quantity,
                line_total_amount: item.line_total_amount,
            })
            .collect();

        let order = Order {
            id,
            user_id: order.user_id,
            status: order.status,
            currency: order.currency,
            subtotal_amount: order.subtotal_amount,
            shipping_amount: order.shipping_amount,
            total_amount: order.total_amount,
            items,
            created_at: now,
            updated_at: now,
        };
        self.orders.write().await.insert(id, order.clone());
        Ok(order)
    }

    async fn get(&self, id: OrderId) -> Result<Order> {
        self.orders
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(OrderError::NotFound(id))
    }
}
