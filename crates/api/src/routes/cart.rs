//! Cart endpoints, keyed by user.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use cart::Cart;
use common::{ProductId, UserId};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AddItemRequest {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub quantity: i32,
}

#[derive(Deserialize)]
pub struct SetQuantityRequest {
    #[serde(default)]
    pub quantity: i32,
}

#[derive(Serialize)]
pub struct CartItemResponse {
    pub product_id: ProductId,
    pub quantity: i32,
}

#[derive(Serialize)]
pub struct CartResponse {
    pub id: String,
    pub user_id: String,
    pub status: String,
    pub items: Vec<CartItemResponse>,
    pub created_at_unix: i64,
    pub updated_at_unix: i64,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            id: cart.id.to_string(),
            user_id: cart.user_id.to_string(),
            status: cart.status.to_string(),
            items: cart
                .lines
                .into_iter()
                .map(|line| CartItemResponse {
                    product_id: line.product_id,
                    quantity: line.quantity,
                })
                .collect(),
            created_at_unix: cart.created_at.timestamp(),
            updated_at_unix: cart.updated_at.timestamp(),
        }
    }
}

/// GET /v1/cart/{user_id}: return the user's cart, creating it on first access.
#[tracing::instrument(skip(state))]
pub async fn get_or_create(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let user_id = UserId::parse(&user_id)?;
    let cart = state.within(state.carts.get_or_create(user_id)).await?;
    Ok(Json(cart.into()))
}

/// POST /v1/cart/{user_id}/items: add to a line, creating the cart if needed.
#[tracing::instrument(skip(state, body))]
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    body: Result<Json<AddItemRequest>, JsonRejection>,
) -> Result<Json<CartResponse>, ApiError> {
    let user_id = UserId::parse(&user_id)?;
    let Json(req) = body?;
    let product_id = ProductId::parse(&req.product_id)?;

    let cart = state
        .within(async {
            let cart = state.carts.get_or_create(user_id).await?;
            state
                .carts
                .add_item(cart.id, product_id, req.quantity)
                .await?;
            state.carts.get_cart(user_id).await
        })
        .await?;
    Ok(Json(cart.into()))
}

/// PUT /v1/cart/{user_id}/items/{product_id}: overwrite a line's quantity.
#[tracing::instrument(skip(state, body))]
pub async fn set_quantity(
    State(state): State<Arc<AppState>>,
    Path((user_id, product_id)): Path<(String, String)>,
    body: Result<Json<SetQuantityRequest>, JsonRejection>,
) -> Result<Json<CartResponse>, ApiError> {
    let user_id = UserId::parse(&user_id)?;
    let product_id = ProductId::parse(&product_id)?;
    let Json(req) = body?;

    let cart = state
        .within(async {
            let cart = state.carts.get_cart(user_id).await?;
            state
                .carts
                .set_quantity(cart.id, product_id, req.quantity)
                .await?;
            state.carts.get_cart(user_id).await
        })
        .await?;
    Ok(Json(cart.into()))
}

/// DELETE /v1/cart/{user_id}/items/{product_id}: remove a line.
#[tracing::instrument(skip(state))]
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path((user_id, product_id)): Path<(String, String)>,
) -> Result<Json<CartResponse>, ApiError> {
    let user_id = UserId::parse(&user_id)?;
    let product_id = ProductId::parse(&product_id)?;

    let cart = state
        .within(async {
            let cart = state.carts.get_cart(user_id).await?;
            state.carts.remove_item(cart.id, product_id).await?;
            state.carts.get_cart(user_id).await
        })
        .await?;
    Ok(Json(cart.into()))
}

/// DELETE /v1/cart/{user_id}/items: remove every line.
#[tracing::instrument(skip(state))]
pub async fn clear(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let user_id = UserId::parse(&user_id)?;

    let cart = state
        .within(async {
            let cart = state.carts.get_cart(user_id).await?;
            state.carts.clear(cart.id).await?;
            state.carts.get_cart(user_id).await
        })
        .await?;
    Ok(Json(cart.into()))
}
