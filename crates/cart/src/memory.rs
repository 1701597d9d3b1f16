use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    Cart, CartError, CartId, CartLine, CartRepository, CartStatus, ProductId, Result, UserId,
};

#[derive(Debug, Clone)]
struct CartRecord {
    id: CartId,
    user_id: UserId,
    status: CartStatus,
    lines: Vec<CartLine>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CartRecord {
    fn to_cart(&self) -> Cart {
        Cart {
            id: self.id,
            user_id: self.user_id,
            status: self.status,
            lines: self.lines.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Default)]
struct InMemoryCartState {
    carts: HashMap<CartId, CartRecord>,
    /// Unique index: user -> their active cart.
    active_by_user: HashMap<UserId, CartId>,
}

impl InMemoryCartState {
    fn active_cart_mut(&mut self, cart_id: CartId) -> Result<&mut CartRecord> {
        self.carts
            .get_mut(&cart_id)
            .filter(|c| c.status == CartStatus::Active)
            .ok_or(CartError::CartNotFound(cart_id))
    }
}

/// In-memory cart repository for testing and single-process deployments.
///
/// Each operation holds the write lock for its whole duration, which gives the
/// same guarantees as a single SQL statement: the active-cart index rejects a
/// second active cart per user, and increments are applied atomically.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartRepository {
    state: Arc<RwLock<InMemoryCartState>>,
    fail_on_create: Arc<AtomicBool>,
}

impl InMemoryCartRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures cart creation to fail with a connection error.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.fail_on_create.store(fail, Ordering::SeqCst);
    }

    /// Returns the total number of stored carts.
    pub async fn cart_count(&self) -> usize {
        self.state.read().await.carts.len()
    }

    /// Returns the number of active carts owned by a user.
    pub async fn active_cart_count(&self, user_id: UserId) -> usize {
        self.state
            .read()
            .await
            .carts
            .values()
            .filter(|c| c.user_id == user_id && c.status == CartStatus::Active)
            .count()
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn get_active(&self, user_id: UserId) -> Result<Cart> {
        let state = self.state.read().await;
        state
            .active_by_user
            .get(&user_id)
            .and_then(|id| state.carts.get(id))
            .map(CartRecord::to_cart)
            .ok_or(CartError::NotFound(user_id))
    }

    async fn create_active(&self, user_id: UserId) -> Result<Cart> {
        if self.fail_on_create.load(Ordering::SeqCst) {
            return Err(CartError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut state = self.state.write().await;
        if state.active_by_user.contains_key(&user_id) {
            return Err(CartError::UniqueViolation { user_id });
        }

        let now = Utc::now();
        let record = CartRecord {
            id: CartId::new(),
            user_id,
            status: CartStatus::Active,
            lines: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let cart = record.to_cart();
        state.active_by_user.insert(user_id, record.id);
        state.carts.insert(record.id, record);
        Ok(cart)
    }

    async fn add_item(&self, cart_id: CartId, product_id: ProductId, delta: i32) -> Result<i32> {
        let mut state = self.state.write().await;
        let cart = state.active_cart_mut(cart_id)?;

        let quantity = match cart.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = line.quantity.checked_add(delta).ok_or_else(|| {
                    CartError::QuantityOutOfRange {
                        product_id: product_id.to_string(),
                    }
                })?;
                line.quantity
            }
            None => {
                cart.lines.push(CartLine {
                    product_id,
                    quantity: delta,
                });
                delta
            }
        };
        cart.updated_at = Utc::now();
        Ok(quantity)
    }

    async fn set_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let cart = state.active_cart_mut(cart_id)?;

        match cart.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => line.quantity = quantity,
            None => cart.lines.push(CartLine {
                product_id,
                quantity,
            }),
        }
        cart.updated_at = Utc::now();
        Ok(())
    }

    async fn remove_item(&self, cart_id: CartId, product_id: ProductId) -> Result<()> {
        let mut state = self.state.write().await;
        let cart = state.active_cart_mut(cart_id)?;
        cart.lines.retain(|l| l.product_id != product_id);
        cart.updated_at = Utc::now();
        Ok(())
    }

    async fn clear(&self, cart_id: CartId) -> Result<()> {
        let mut state = self.state.write().await;
        let cart = state.active_cart_mut(cart_id)?;
        cart.lines.clear();
        cart.updated_at = Utc::now();
        Ok(())
    }
}
