//! Cart service providing validated cart operations over a repository.

use crate::cart::validate_quantity;
use crate::{Cart, CartError, CartId, CartLine, CartRepository, ProductId, Result, UserId};

/// Service for managing user carts.
///
/// Holds no locks of its own: every guarantee about concurrent callers comes
/// from the atomic operations of the repository.
pub struct CartService<R: CartRepository> {
    repo: R,
}

impl<R: CartRepository> CartService<R> {
    /// Creates a new cart service over the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Loads the user's active cart.
    ///
    /// Returns `CartError::NotFound` if the user has none.
    #[tracing::instrument(skip(self))]
    pub async fn get_cart(&self, user_id: UserId) -> Result<Cart> {
        self.repo.get_active(user_id).await
    }

    /// Explicitly creates the user's active cart, optionally with initial lines.
    ///
    /// Fails with `CartError::UniqueViolation` if the user already has an
    /// active cart; use [`get_or_create`](Self::get_or_create) when that is
    /// acceptable.
    #[tracing::instrument(skip(self, lines), fields(line_count = lines.len()))]
    pub async fn create_cart(&self, user_id: UserId, lines: Vec<CartLine>) -> Result<Cart> {
        for line in &lines {
            validate_quantity(line.quantity)?;
        }

        let cart = self.repo.create_active(user_id).await?;
        if lines.is_empty() {
            return Ok(cart);
        }

        for line in lines {
            self.repo
                .add_item(cart.id, line.product_id, line.quantity)
                .await?;
        }
        self.repo.get_active(user_id).await
    }

    /// Returns the user's active cart, creating it on first access.
    ///
    /// Safe under any number of concurrent callers for the same user: all of
    /// them converge on the single cart that won the store's uniqueness
    /// constraint. A losing `create` is expected under contention and is
    /// resolved by reading the winner's cart.
    #[tracing::instrument(skip(self))]
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart> {
        match self.repo.get_active(user_id).await {
            Ok(cart) => return Ok(cart),
            Err(CartError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        match self.repo.create_active(user_id).await {
            Ok(cart) => {
                tracing::info!(cart_id = %cart.id, "active cart created");
                Ok(cart)
            }
            Err(CartError::UniqueViolation { .. }) => {
                metrics::counter!("cart_create_conflicts_total").increment(1);
                tracing::debug!("lost cart creation race, re-reading active cart");
                self.repo.get_active(user_id).await
            }
            Err(e) => Err(e),
        }
    }

    /// Adds `quantity` of a product to the cart, incrementing an existing line.
    ///
    /// Returns the resulting line quantity.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<i32> {
        validate_quantity(quantity)?;
        let stored = self.repo.add_item(cart_id, product_id, quantity).await?;
        metrics::counter!("cart_items_added_total").increment(1);
        Ok(stored)
    }

    /// Sets the quantity of a line, creating it if absent.
    #[tracing::instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<()> {
        validate_quantity(quantity)?;
        self.repo.set_quantity(cart_id, product_id, quantity).await
    }

    /// Removes a line from the cart. Removing an absent line is a no-op.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(&self, cart_id: CartId, product_id: ProductId) -> Result<()> {
        self.repo.remove_item(cart_id, product_id).await
    }

    /// Removes all lines, leaving the cart active.
    #[tracing::instrument(skip(self))]
    pub async fn clear(&self, cart_id: CartId) -> Result<()> {
        self.repo.clear(cart_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryCartRepository;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn create_service() -> CartService<InMemoryCartRepository> {
        CartService::new(InMemoryCartRepository::new())
    }

    /// Repository whose first reads miss a cart another caller already
    /// created, as when a concurrent creator commits between read and insert.
    #[derive(Default)]
    struct StaleReadRepository {
        inner: InMemoryCartRepository,
        stale_reads: AtomicUsize,
        conflicts: AtomicUsize,
    }

    #[async_trait]
    impl CartRepository for StaleReadRepository {
        async fn get_active(&self, user_id: UserId) -> Result<Cart> {
            let stale = self
                .stale_reads
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if stale {
                return Err(CartError::NotFound(user_id));
            }
            self.inner.get_active(user_id).await
        }

        async fn create_active(&self, user_id: UserId) -> Result<Cart> {
            let result = self.inner.create_active(user_id).await;
            if matches!(result, Err(CartError::UniqueViolation { .. })) {
                self.conflicts.fetch_add(1, Ordering::SeqCst);
            }
            result
        }

        async fn add_item(
            &self,
            cart_id: CartId,
            product_id: ProductId,
            delta: i32,
        ) -> Result<i32> {
            self.inner.add_item(cart_id, product_id, delta).await
        }

        async fn set_quantity(
            &self,
            cart_id: CartId,
            product_id: ProductId,
            quantity: i32,
        ) -> Result<()> {
            self.inner.set_quantity(cart_id, product_id, quantity).await
        }

        async fn remove_item(&self, cart_id: CartId, product_id: ProductId) -> Result<()> {
            self.inner.remove_item(cart_id, product_id).await
        }

        async fn clear(&self, cart_id: CartId) -> Result<()> {
            self.inner.clear(cart_id).await
        }
    }

    #[tokio::test]
    async fn test_get_or_create_returns_existing_cart() {
        let service = create_service();
        let user_id = UserId::new();

        let first = service.get_or_create(user_id).await.unwrap();
        let second = service.get_or_create(user_id).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(service.repository().cart_count().await, 1);
    }

    #[tokio::test]
    async fn test_get_or_create_recovers_from_lost_creation_race() {
        let service = CartService::new(StaleReadRepository::default());
        let user_id = UserId::new();
        let winner = service.repository().inner.create_active(user_id).await.unwrap();
        let product_id = ProductId::new();
        service.add_item(winner.id, product_id, 2).await.unwrap();
        service.repository().stale_reads.store(1, Ordering::SeqCst);

        let cart = service.get_or_create(user_id).await.unwrap();

        assert_eq!(cart.id, winner.id);
        assert_eq!(cart.quantity_of(product_id), 2);
        assert_eq!(service.repository().conflicts.load(Ordering::SeqCst), 1);
        assert_eq!(service.repository().inner.active_cart_count(user_id).await, 1);
    }

    #[tokio::test]
    async fn test_get_or_create_fails_when_winner_cannot_be_read() {
        let service = CartService::new(StaleReadRepository::default());
        let user_id = UserId::new();
        service.repository().inner.create_active(user_id).await.unwrap();
        service.repository().stale_reads.store(2, Ordering::SeqCst);

        let result = service.get_or_create(user_id).await;

        assert!(matches!(result, Err(CartError::NotFound(id)) if id == user_id));
        assert_eq!(service.repository().conflicts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_or_create_propagates_other_create_failures() {
        let service = create_service();
        service.repository().set_fail_on_create(true);

        let result = service.get_or_create(UserId::new()).await;
        assert!(matches!(result, Err(CartError::Database(_))));
    }

    #[tokio::test]
    async fn test_get_cart_without_cart_is_not_found() {
        let service = create_service();
        let result = service.get_cart(UserId::new()).await;
        assert!(matches!(result, Err(CartError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_cart_with_initial_lines() {
        let service = create_service();
        let user_id = UserId::new();
        let p1 = ProductId::new();
        let p2 = ProductId::new();

        let cart = service
            .create_cart(
                user_id,
                vec![
                    CartLine::new(p1, 2).unwrap(),
                    CartLine::new(p2, 1).unwrap(),
                    CartLine::new(p1, 1).unwrap(),
                ],
            )
            .await
            .unwrap();

        assert_eq!(cart.quantity_of(p1), 3);
        assert_eq!(cart.quantity_of(p2), 1);
        assert_eq!(cart.lines.len(), 2);
    }

    #[tokio::test]
    async fn test_create_cart_twice_is_rejected() {
        let service = create_service();
        let user_id = UserId::new();
        service.create_cart(user_id, vec![]).await.unwrap();

        let result = service.create_cart(user_id, vec![]).await;
        assert!(matches!(result, Err(CartError::UniqueViolation { .. })));
    }

    #[tokio::test]
    async fn test_add_item_rejects_non_positive_quantity() {
        let service = create_service();
        let cart = service.get_or_create(UserId::new()).await.unwrap();

        let zero = service.add_item(cart.id, ProductId::new(), 0).await;
        assert!(matches!(zero, Err(CartError::InvalidQuantity { quantity: 0 })));

        let negative = service.add_item(cart.id, ProductId::new(), -1).await;
        assert!(matches!(
            negative,
            Err(CartError::InvalidQuantity { quantity: -1 })
        ));

        let cart = service.get_cart(cart.user_id).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_set_quantity_creates_then_overwrites() {
        let service = create_service();
        let cart = service.get_or_create(UserId::new()).await.unwrap();
        let product_id = ProductId::new();

        service.set_quantity(cart.id, product_id, 4).await.unwrap();
        let loaded = service.get_cart(cart.user_id).await.unwrap();
        assert_eq!(loaded.quantity_of(product_id), 4);

        service.set_quantity(cart.id, product_id, 2).await.unwrap();
        let loaded = service.get_cart(cart.user_id).await.unwrap();
        assert_eq!(loaded.quantity_of(product_id), 2);
    }

    #[tokio::test]
    async fn test_set_quantity_rejects_zero() {
        let service = create_service();
        let cart = service.get_or_create(UserId::new()).await.unwrap();
        let result = service.set_quantity(cart.id, ProductId::new(), 0).await;
        assert!(matches!(result, Err(CartError::InvalidQuantity { .. })));
    }

    #[tokio::test]
    async fn test_remove_missing_item_is_noop() {
        let service = create_service();
        let cart = service.get_or_create(UserId::new()).await.unwrap();
        let kept = ProductId::new();
        service.add_item(cart.id, kept, 1).await.unwrap();

        service.remove_item(cart.id, ProductId::new()).await.unwrap();

        let loaded = service.get_cart(cart.user_id).await.unwrap();
        assert_eq!(loaded.quantity_of(kept), 1);
    }

    #[tokio::test]
    async fn test_remove_item() {
        let service = create_service();
        let cart = service.get_or_create(UserId::new()).await.unwrap();
        let product_id = ProductId::new();
        service.add_item(cart.id, product_id, 5).await.unwrap();

        service.remove_item(cart.id, product_id).await.unwrap();

        let loaded = service.get_cart(cart.user_id).await.unwrap();
        assert!(loaded.line(product_id).is_none());
    }

    #[tokio::test]
    async fn test_clear_keeps_cart_active() {
        let service = create_service();
        let user_id = UserId::new();
        let cart = service.get_or_create(user_id).await.unwrap();
        service.add_item(cart.id, ProductId::new(), 1).await.unwrap();
        service.add_item(cart.id, ProductId::new(), 2).await.unwrap();

        service.clear(cart.id).await.unwrap();

        let loaded = service.get_cart(user_id).await.unwrap();
        assert_eq!(loaded.id, cart.id);
        assert!(loaded.is_empty());
        assert_eq!(service.repository().active_cart_count(user_id).await, 1);
    }
}
