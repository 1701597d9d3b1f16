//! HTTP gateway for the shop services.
//!
//! Exposes catalog, cart, checkout and order endpoints over the in-process
//! services, with request-id tagging, structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub use config::{Config, LogFormat};
pub use error::ApiError;
pub use state::{AppState, StartupError, build_state};

/// Header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Creates the Axum application router with all routes and shared state.
///
/// An incoming `X-Request-Id` is kept, otherwise a UUID is generated; either
/// way it is echoed on the response and recorded on the request span.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/healthz", get(routes::health::live))
        .route("/readyz", get(routes::health::ready))
        .route(
            "/v1/products",
            post(routes::products::create).get(routes::products::list),
        )
        .route("/v1/products/{id}", get(routes::products::get))
        .route("/v1/cart/{user_id}", get(routes::cart::get_or_create))
        .route(
            "/v1/cart/{user_id}/items",
            post(routes::cart::add_item).delete(routes::cart::clear),
        )
        .route(
            "/v1/cart/{user_id}/items/{product_id}",
            put(routes::cart::set_quantity).delete(routes::cart::remove_item),
        )
        .route("/v1/checkout/quote/{user_id}", get(routes::checkout::quote))
        .route("/v1/orders", post(routes::orders::create))
        .route("/v1/orders/{id}", get(routes::orders::get))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
