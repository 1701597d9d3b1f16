//! Order service wrapping an order repository with request validation.

use crate::{CreateOrderRequest, Order, OrderId, OrderRepository, Result};

/// Service for creating and reading orders.
pub struct OrderService<R: OrderRepository> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    /// Creates a new order service over the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Validates the request, computes totals, and persists a pending order.
    #[tracing::instrument(
        skip(self, request),
        fields(user_id = %request.user_id, items = request.items.len())
    )]
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Order> {
        let order = request.validate()?;
        let created = self.repo.create(order).await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(
            order_id = %created.id,
            total_amount = created.total_amount,
            "order created"
        );
        Ok(created)
    }

    /// Fetches an order by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order> {
        self.repo.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryOrderRepository, OrderError, OrderItemRequest, OrderStatus};
    use common::{ProductId, UserId};

    fn create_service() -> OrderService<InMemoryOrderRepository> {
        OrderService::new(InMemoryOrderRepository::new())
    }

    fn request(items: Vec<(i64, i32)>) -> CreateOrderRequest {
        CreateOrderRequest {
            user_id: UserId::new(),
            currency: "IDR".to_string(),
            shipping_amount: 1000,
            items: items
                .into_iter()
                .map(|(unit_amount, quantity)| OrderItemRequest {
                    product_id: ProductId::new(),
                    name: "Widget".to_string(),
                    unit_amount,
                    quantity,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_create_order() {
        let service = create_service();
        let order = service
            .create_order(request(vec![(1000, 2), (500, 3)]))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.subtotal_amount, 3500);
        assert_eq!(order.shipping_amount, 1000);
        assert_eq!(order.total_amount, 4500);
        assert_eq!(order.items.len(), 2);

        let fetched = service.get_order(order.id).await.unwrap();
        assert_eq!(fetched.id, order.id);
    }

    #[tokio::test]
    async fn test_invalid_order_is_not_persisted() {
        let service = create_service();
        let result = service.create_order(request(vec![(1000, 1), (-1, 1)])).await;

        assert!(matches!(
            result,
            Err(OrderError::NegativeUnitAmount { index: 1, .. })
        ));
        assert_eq!(service.repository().order_count().await, 0);
    }

    #[tokio::test]
    async fn test_empty_order_is_rejected() {
        let service = create_service();
        let result = service.create_order(request(vec![])).await;
        assert!(matches!(result, Err(OrderError::EmptyItems)));
    }
}
