//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{OrderId, ProductId, UserId};
use order::{CreateOrderRequest, Order, OrderItemRequest};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderBody {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub shipping_amount: i64,
    #[serde(default)]
    pub items: Vec<OrderItemBody>,
}

#[derive(Deserialize)]
pub struct OrderItemBody {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub unit_amount: i64,
    #[serde(default)]
    pub quantity: i32,
}

impl CreateOrderBody {
    fn into_request(self) -> Result<CreateOrderRequest, ApiError> {
        let user_id = UserId::parse(&self.user_id)?;
        let items = self
            .items
            .into_iter()
            .map(|item| {
                Ok(OrderItemRequest {
                    product_id: ProductId::parse(&item.product_id)?,
                    name: item.name,
                    unit_amount: item.unit_amount,
                    quantity: item.quantity,
                })
            })
            .collect::<Result<Vec<_>, ApiError>>()?;

        Ok(CreateOrderRequest {
            user_id,
            currency: self.currency,
            shipping_amount: self.shipping_amount,
            items,
        })
    }
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: ProductId,
    pub name: String,
    pub unit_amount: i64,
    pub quantity: i32,
    pub line_total_amount: i64,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: String,
    pub currency: String,
    pub subtotal_amount: i64,
    pub shipping_amount: i64,
    pub total_amount: i64,
    pub items: Vec<OrderItemResponse>,
    pub created_at_unix: i64,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            status: o.status.to_string(),
            currency: o.currency,
            subtotal_amount: o.subtotal_amount,
            shipping_amount: o.shipping_amount,
            total_amount: o.total_amount,
            items: o
                .items
                .into_iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id,
                    name: item.name,
                    unit_amount: item.unit_amount,
                    quantity: item.quantity,
                    line_total_amount: item.line_total_amount,
                })
                .collect(),
            created_at_unix: o.created_at.timestamp(),
        }
    }
}

// -- Handlers --

/// POST /v1/orders: create a pending order.
#[tracing::instrument(skip(state, body))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateOrderBody>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let Json(body) = body?;
    let request = body.into_request()?;
    let order = state.within(state.orders.create_order(request)).await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /v1/orders/{id}: fetch an order with its items.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let id = OrderId::parse(&id)?;
    let order = state.within(state.orders.get_order(id)).await?;
    Ok(Json(order.into()))
}
