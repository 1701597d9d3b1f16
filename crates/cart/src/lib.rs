//! Cart service.
//!
//! Each user has at most one active cart. The invariant is enforced by the
//! backing store rather than by in-process locks:
//!
//! - cart creation relies on a uniqueness constraint over active carts per
//!   user, and [`CartService::get_or_create`] treats a violation of that
//!   constraint as "someone else won the race" and re-reads;
//! - line increments are a single atomic upsert in the store, so concurrent
//!   increments never lose updates.

pub mod cart;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod service;

pub use cart::{Cart, CartLine, CartStatus};
pub use common::{CartId, ProductId, UserId};
pub use error::{CartError, Result};
pub use memory::InMemoryCartRepository;
pub use postgres::PostgresCartRepository;
pub use repository::CartRepository;
pub use service::CartService;
