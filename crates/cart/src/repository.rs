use std::sync::Arc;

use async_trait::async_trait;

use crate::{Cart, CartId, ProductId, Result, UserId};

/// Storage primitives for carts.
///
/// Every method is a single atomic operation in the backing store. Callers
/// never read a quantity and write it back; concurrency safety of cart state
/// lives entirely behind this trait.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Fetches the user's active cart with its lines.
    ///
    /// Returns `CartError::NotFound` if the user has no active cart.
    async fn get_active(&self, user_id: UserId) -> Result<Cart>;

    /// Inserts a new, empty active cart for the user.
    ///
    /// Returns `CartError::UniqueViolation` if an active cart already exists.
    async fn create_active(&self, user_id: UserId) -> Result<Cart>;

    /// Inserts the line at `delta`, or adds `delta` to the existing quantity.
    ///
    /// Returns the resulting quantity.
    async fn add_item(&self, cart_id: CartId, product_id: ProductId, delta: i32) -> Result<i32>;

    /// Overwrites the quantity of a line, inserting it if absent.
    async fn set_quantity(&self, cart_id: CartId, product_id: ProductId, quantity: i32)
    -> Result<()>;

    /// Deletes a line. Deleting a missing line is not an error.
    async fn remove_item(&self, cart_id: CartId, product_id: ProductId) -> Result<()>;

    /// Deletes every line of the cart, keeping the cart itself active.
    async fn clear(&self, cart_id: CartId) -> Result<()>;
}

#[async_trait]
impl<T: CartRepository + ?Sized> CartRepository for Arc<T> {
    async fn get_active(&self, user_id: UserId) -> Result<Cart> {
        (**self).get_active(user_id).await
    }

    async fn create_active(&self, user_id: UserId) -> Result<Cart> {
        (**self).create_active(user_id).await
    }

    async fn add_item(&self, cart_id: CartId, product_id: ProductId, delta: i32) -> Result<i32> {
        (**self).add_item(cart_id, product_id, delta).await
    }

    async fn set_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<()> {
        (**self).set_quantity(cart_id, product_id, quantity).await
    }

    async fn remove_item(&self, cart_id: CartId, product_id: ProductId) -> Result<()> {
        (**self).remove_item(cart_id, product_id).await
    }

    async fn clear(&self, cart_id: CartId) -> Result<()> {
        (**self).clear(cart_id).await
    }
}
