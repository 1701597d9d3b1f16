//! PostgreSQL integration tests for the order repository.
//!
//! Run with:
//!
//! ```bash
//! cargo test -p order --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use order::{
    CreateOrderRequest, OrderError, OrderId, OrderItemRequest, OrderRepository, OrderService,
    OrderStatus, PostgresOrderRepository, ProductId, UserId,
};
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/003_create_orders_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn get_test_service() -> OrderService<PostgresOrderRepository> {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE order_items, orders")
        .execute(&pool)
        .await
        .unwrap();

    OrderService::new(PostgresOrderRepository::new(pool))
}

fn request(items: Vec<(i64, i32)>) -> CreateOrderRequest {
    CreateOrderRequest {
        user_id: UserId::new(),
        currency: "IDR".to_string(),
        shipping_amount: 500,
        items: items
            .into_iter()
            .enumerate()
            .map(|(i, (unit_amount, quantity))| OrderItemRequest {
                product_id: ProductId::new(),
                name: format!("Item {i}"),
                unit_amount,
                quantity,
            })
            .collect(),
    }
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
#[serial]
async fn create_and_get_order() {
    let service = get_test_service().await;

    let created = service
        .create_order(request(vec![(1000, 2), (500, 3), (0, 1)]))
        .await
        .unwrap();
    assert_eq!(created.status, OrderStatus::Pending);
    assert_eq!(created.subtotal_amount, 3500);
    assert_eq!(created.total_amount, 4000);

    let fetched = service.get_order(created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.items.len(), 3);
    let names: Vec<&str> = fetched.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Item 0", "Item 1", "Item 2"]);
    assert_eq!(fetched.items[1].line_total_amount, 1500);
}

#[tokio::test]
#[serial]
async fn mismatched_line_total_rolls_back() {
    let service = get_test_service().await;
    let mut order = request(vec![(1000, 2), (500, 3)]).validate().unwrap();
    order.items[1].line_total_amount = 1;

    let result = service.repository().create(order).await;
    assert!(matches!(
        result,
        Err(OrderError::LineTotalMismatch { index: 1 })
    ));

    let pool = service.repository().pool();
    assert_eq!(count(pool, "orders").await, 0);
    assert_eq!(count(pool, "order_items").await, 0);
}

#[tokio::test]
#[serial]
async fn failing_item_insert_rolls_back_order() {
    let service = get_test_service().await;
    let mut order = request(vec![(1000, 1), (500, 1)]).validate().unwrap();
    // Violates the quantity check constraint on the second row only.
    order.items[1].quantity = 0;
    order.items[1].line_total_amount = 0;

    let result = service.repository().create(order).await;
    assert!(matches!(result, Err(OrderError::Database(_))));

    let pool = service.repository().pool();
    assert_eq!(count(pool, "orders").await, 0);
    assert_eq!(count(pool, "order_items").await, 0);
}

#[tokio::test]
#[serial]
async fn get_unknown_order() {
    let service = get_test_service().await;
    let result = service.get_order(OrderId::new()).await;
    assert!(matches!(result, Err(OrderError::NotFound(_))));
}
