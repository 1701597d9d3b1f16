//! Concurrency properties of the cart service against the in-memory store.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use cart::{
    Cart, CartError, CartId, CartRepository, CartService, InMemoryCartRepository, ProductId,
    Result, UserId,
};
use futures_util::future::join_all;
use tokio::sync::Barrier;

/// Holds the first `gated` reads until all of them have missed, so every
/// caller goes on to attempt creation.
struct GatedRepository {
    inner: InMemoryCartRepository,
    barrier: Barrier,
    gated: AtomicUsize,
    conflicts: AtomicUsize,
}

impl GatedRepository {
    fn new(callers: usize) -> Self {
        Self {
            inner: InMemoryCartRepository::new(),
            barrier: Barrier::new(callers),
            gated: AtomicUsize::new(callers),
            conflicts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CartRepository for GatedRepository {
    async fn get_active(&self, user_id: UserId) -> Result<Cart> {
        let result = self.inner.get_active(user_id).await;
        let gated = self
            .gated
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if gated {
            self.barrier.wait().await;
        }
        result
    }

    async fn create_active(&self, user_id: UserId) -> Result<Cart> {
        let result = self.inner.create_active(user_id).await;
        if matches!(result, Err(CartError::UniqueViolation { .. })) {
            self.conflicts.fetch_add(1, Ordering::SeqCst);
        }
        result
    }

    async fn add_item(&self, cart_id: CartId, product_id: ProductId, delta: i32) -> Result<i32> {
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

fn create_service() -> Arc<CartService<InMemoryCartRepository>> {
    Arc::new(CartService::new(InMemoryCartRepository::new()))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_get_or_create_yields_single_active_cart() {
    const N: usize = 50;
    let service = create_service();
    let user_id = UserId::new();

    let handles: Vec<_> = (0..N)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.get_or_create(user_id).await })
        })
        .collect();

    let mut ids = HashSet::new();
    for result in join_all(handles).await {
        let cart = result.unwrap().unwrap();
        ids.insert(cart.id);
    }

    assert_eq!(ids.len(), 1, "all callers must observe the same cart");
    assert_eq!(service.repository().active_cart_count(user_id).await, 1);
    assert_eq!(service.repository().cart_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn racing_creators_converge_on_the_winner() {
    const N: usize = 16;
    let service = Arc::new(CartService::new(GatedRepository::new(N)));
    let user_id = UserId::new();

    let handles: Vec<_> = (0..N)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.get_or_create(user_id).await })
        })
        .collect();

    let mut ids = HashSet::new();
    for result in join_all(handles).await {
        ids.insert(result.unwrap().unwrap().id);
    }

    let repo = service.repository();
    assert_eq!(ids.len(), 1);
    assert_eq!(repo.conflicts.load(Ordering::SeqCst), N - 1);
    assert_eq!(repo.inner.active_cart_count(user_id).await, 1);
    assert_eq!(repo.inner.cart_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_get_or_create_for_distinct_users() {
    let service = create_service();
    let users: Vec<UserId> = (0..20).map(|_| UserId::new()).collect();

    let handles: Vec<_> = users
        .iter()
        .flat_map(|user_id| std::iter::repeat_n(*user_id, 5))
        .map(|user_id| {
            let service = service.clone();
            tokio::spawn(async move { service.get_or_create(user_id).await })
        })
        .collect();

    for result in join_all(handles).await {
        result.unwrap().unwrap();
    }

    assert_eq!(service.repository().cart_count().await, users.len());
    for user_id in users {
        assert_eq!(service.repository().active_cart_count(user_id).await, 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_add_item_loses_no_updates() {
    const N: i32 = 100;
    let service = create_service();
    let user_id = UserId::new();
    let product_id = ProductId::new();
    let cart = service.get_or_create(user_id).await.unwrap();

    let handles: Vec<_> = (0..N)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.add_item(cart.id, product_id, 1).await })
        })
        .collect();

    for result in join_all(handles).await {
        result.unwrap().unwrap();
    }

    let cart = service.get_cart(user_id).await.unwrap();
    assert_eq!(cart.quantity_of(product_id), N);
    assert_eq!(cart.lines.len(), 1);
}
