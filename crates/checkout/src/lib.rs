//! Checkout quoting.
//!
//! [`CheckoutService`] reads a user's cart lines through a [`CartReader`],
//! resolves every line's product through a [`CatalogReader`] in parallel with
//! a ceiling on in-flight lookups, and assembles a [`Quote`] whose lines keep
//! the cart's order. Any failing line fails the whole quote.

pub mod adapters;
pub mod error;
pub mod quote;
pub mod reader;
pub mod service;

pub use adapters::{CartServiceReader, CatalogServiceReader};
pub use common::{Money, ProductId, UserId};
pub use error::{QuoteError, Result};
pub use quote::{CartItem, CatalogProduct, Quote, QuoteLine};
pub use reader::{CartReader, CatalogReader};
pub use service::{CheckoutService, DEFAULT_MAX_CONCURRENT};
