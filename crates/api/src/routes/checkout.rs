//! Checkout quote endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use checkout::Quote;
use common::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /v1/checkout/quote/{user_id}: price the user's cart.
#[tracing::instrument(skip(state))]
pub async fn quote(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Quote>, ApiError> {
    let user_id = UserId::parse(&user_id)?;
    let quote = state
        .checkout
        .quote_within(user_id, state.request_timeout)
        .await?;
    Ok(Json(quote))
}
