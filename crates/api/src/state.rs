//! Shared application state and backend selection.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use cart::{CartRepository, CartService, InMemoryCartRepository, PostgresCartRepository};
use catalog::{
    CatalogService, InMemoryProductRepository, PostgresProductRepository, ProductRepository,
};
use checkout::{CartServiceReader, CatalogServiceReader, CheckoutService};
use order::{InMemoryOrderRepository, OrderRepository, OrderService, PostgresOrderRepository};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::config::Config;
use crate::error::ApiError;

pub type DynProductRepository = Arc<dyn ProductRepository>;
pub type DynCartRepository = Arc<dyn CartRepository>;
pub type DynOrderRepository = Arc<dyn OrderRepository>;

/// The checkout service as wired by the gateway.
pub type GatewayCheckout = CheckoutService<
    CartServiceReader<DynCartRepository>,
    CatalogServiceReader<DynProductRepository>,
>;

/// Errors raised while building the application state.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to connect to database: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub catalog: Arc<CatalogService<DynProductRepository>>,
    pub carts: Arc<CartService<DynCartRepository>>,
    pub checkout: GatewayCheckout,
    pub orders: OrderService<DynOrderRepository>,
    /// Deadline applied to each gateway call.
    pub request_timeout: Duration,
    /// Present when the stores are backed by PostgreSQL; used for readiness.
    pub pool: Option<PgPool>,
}

impl AppState {
    /// Wires the services over the given repositories.
    pub fn new(
        products: DynProductRepository,
        carts: DynCartRepository,
        orders: DynOrderRepository,
        config: &Config,
    ) -> Self {
        let catalog = Arc::new(CatalogService::new(products));
        let carts = Arc::new(CartService::new(carts));
        let checkout = CheckoutService::new(
            CartServiceReader::new(carts.clone()),
            CatalogServiceReader::new(catalog.clone()),
            config.quote_max_concurrent,
        );

        Self {
            catalog,
            carts,
            checkout,
            orders: OrderService::new(orders),
            request_timeout: config.request_timeout,
            pool: None,
        }
    }

    /// Creates state backed by in-memory stores.
    pub fn in_memory(config: &Config) -> Self {
        Self::new(
            Arc::new(InMemoryProductRepository::new()),
            Arc::new(InMemoryCartRepository::new()),
            Arc::new(InMemoryOrderRepository::new()),
            config,
        )
    }

    /// Creates state backed by PostgreSQL stores sharing one pool.
    pub fn postgres(pool: PgPool, config: &Config) -> Self {
        let mut state = Self::new(
            Arc::new(PostgresProductRepository::new(pool.clone())),
            Arc::new(PostgresCartRepository::new(pool.clone())),
            Arc::new(PostgresOrderRepository::new(pool.clone())),
            config,
        );
        state.pool = Some(pool);
        state
    }

    /// Runs `fut` under the request deadline.
    pub async fn within<T, E>(&self, fut: impl Future<Output = Result<T, E>>) -> Result<T, ApiError>
    where
        ApiError: From<E>,
    {
        match tokio::time::timeout(self.request_timeout, fut).await {
            Ok(result) => result.map_err(ApiError::from),
            Err(_) => Err(ApiError::deadline_exceeded()),
        }
    }
}

/// Builds the application state from configuration.
///
/// With `DATABASE_URL` set, connects to PostgreSQL and applies the embedded
/// migrations; otherwise every store is in-memory.
pub async fn build_state(config: &Config) -> Result<Arc<AppState>, StartupError> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::info!("DATABASE_URL not set, using in-memory stores");
        return Ok(Arc::new(AppState::in_memory(config)));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await?;

    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!(
        max_connections = config.db_max_connections,
        "connected to PostgreSQL, migrations applied"
    );

    Ok(Arc::new(AppState::postgres(pool, config)))
}
