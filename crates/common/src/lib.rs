//! Shared types used by every shop service: typed identifiers and money.

pub mod db;
pub mod error;
pub mod money;
pub mod types;

pub use error::{ErrorKind, IdError};
pub use money::Money;
pub use types::{CartId, OrderId, ProductId, UserId};
