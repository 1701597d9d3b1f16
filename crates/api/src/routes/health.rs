//! Liveness and readiness endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /healthz: the process is up.
pub async fn live() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /readyz: the process can serve traffic.
///
/// With a database configured, a failed ping reports 503.
pub async fn ready(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    if let Some(pool) = &state.pool
        && let Err(e) = sqlx::query("SELECT 1").execute(pool).await
    {
        tracing::warn!(error = %e, "readiness check failed");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unavailable",
            }),
        );
    }
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}
