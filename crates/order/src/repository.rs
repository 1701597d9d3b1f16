use std::sync::Arc;

use async_trait::async_trait;

use crate::{NewOrder, Order, OrderId, Result};

/// Storage for orders.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists an order and all of its items atomically.
    ///
    /// Line totals are re-verified first; on any failure nothing is written.
    async fn create(&self, order: NewOrder) -> Result<Order>;

    /// Fetches an order with its items.
    ///
    /// Returns `OrderError::NotFound` if no order has this id.
    async fn get(&self, id: OrderId) -> Result<Order>;
}

#[async_trait]
impl<T: OrderRepository + ?Sized> OrderRepository for Arc<T> {
    async fn create(&self, order: NewOrder) -> Result<Order> {
        (**self).create(order).await
    }

    async fn get(&self, id: OrderId) -> Result<Order> {
        (**self).get(id).await
    }
}
