//! Catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use catalog::{DEFAULT_PAGE_SIZE, Product};
use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PriceBody {
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub amount: i64,
}

#[derive(Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: PriceBody,
}

#[derive(Deserialize)]
pub struct ListProductsParams {
    pub query: Option<String>,
    pub limit: Option<String>,
    pub cursor: Option<String>,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub created_at_unix: i64,
    pub updated_at_unix: i64,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            created_at_unix: p.created_at.timestamp(),
            updated_at_unix: p.updated_at.timestamp(),
        }
    }
}

#[derive(Serialize)]
pub struct ListProductsResponse {
    pub products: Vec<ProductResponse>,
    /// Empty when there are no more pages.
    pub next_cursor: String,
}

/// POST /v1/products: create a product.
#[tracing::instrument(skip(state, body))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let Json(req) = body?;
    let product = state
        .within(state.catalog.create_product(
            &req.name,
            &req.description,
            &req.price.currency,
            req.price.amount,
        ))
        .await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// GET /v1/products/{id}: fetch a product.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let id = ProductId::parse(&id)?;
    let product = state.within(state.catalog.get_product(id)).await?;
    Ok(Json(product.into()))
}

/// GET /v1/products?query=&limit=&cursor=: list products by ascending id.
#[tracing::instrument(skip(state, params))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListProductsParams>,
) -> Result<Json<ListProductsResponse>, ApiError> {
    let limit = params
        .limit
        .as_deref()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_PAGE_SIZE as i64);
    let cursor = match params.cursor.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(ProductId::parse(raw)?),
    };
    let query = params.query.unwrap_or_default();

    let page = state
        .within(state.catalog.list_products(&query, limit, cursor))
        .await?;

    Ok(Json(ListProductsResponse {
        products: page.products.into_iter().map(Into::into).collect(),
        next_cursor: page
            .next_cursor
            .map(|id| id.to_string())
            .unwrap_or_default(),
    }))
}
