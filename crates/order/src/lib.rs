//! Order service.
//!
//! Orders are created from a list of priced items. The service validates the
//! request, computes line totals, the subtotal and the total, and the
//! repository persists the order with all of its items atomically.

pub mod error;
pub mod memory;
pub mod order;
pub mod postgres;
pub mod repository;
pub mod service;

pub use common::{OrderId, ProductId, UserId};
pub use error::{OrderError, Result};
pub use memory::InMemoryOrderRepository;
pub use order::{
    CreateOrderRequest, NewOrder, NewOrderItem, Order, OrderItem, OrderItemRequest, OrderStatus,
};
pub use postgres::PostgresOrderRepository;
pub use repository::OrderRepository;
pub use service::OrderService;
