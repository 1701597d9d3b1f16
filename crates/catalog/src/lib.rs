//! Product catalog service.
//!
//! Products are created with a validated name and a positive price, fetched by
//! id, and listed with a keyset cursor over product ids.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod product;
pub mod repository;
pub mod service;

pub use common::{Money, ProductId};
pub use error::{CatalogError, Result};
pub use memory::InMemoryProductRepository;
pub use postgres::PostgresProductRepository;
pub use product::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, NewProduct, Product, ProductPage, ProductQuery,
};
pub use repository::ProductRepository;
pub use service::CatalogService;
