//! The quote aggregator.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use common::UserId;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::{CartItem, CartReader, CatalogReader, Quote, QuoteError, QuoteLine, Result};

/// In-flight product lookups per quote when the caller does not choose.
pub const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Computes quotes for user carts.
///
/// Each cart line is resolved by its own task; a per-call semaphore caps how
/// many of them are inside the catalog reader at once. Lines come back in
/// cart order regardless of completion order. A failing line or an expired
/// deadline aborts every other task, and the call returns only once all of
/// them have stopped.
pub struct CheckoutService<C, P>
where
    C: CartReader,
    P: CatalogReader + 'static,
{
    cart: C,
    catalog: Arc<P>,
    max_concurrent: usize,
}

impl<C, P> CheckoutService<C, P>
where
    C: CartReader,
    P: CatalogReader + 'static,
{
    /// Creates a checkout service.
    ///
    /// A `max_concurrent` of zero selects [`DEFAULT_MAX_CONCURRENT`]; values
    /// above [`Semaphore::MAX_PERMITS`] are clamped to it.
    pub fn new(cart: C, catalog: P, max_concurrent: usize) -> Self {
        let max_concurrent = if max_concurrent == 0 {
            DEFAULT_MAX_CONCURRENT
        } else {
            max_concurrent.min(Semaphore::MAX_PERMITS)
        };
        Self {
            cart,
            catalog: Arc::new(catalog),
            max_concurrent,
        }
    }

    /// Returns the effective lookup ceiling.
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Computes the quote for a user's cart.
    #[tracing::instrument(skip(self))]
    pub async fn quote(&self, user_id: UserId) -> Result<Quote> {
        self.observe(self.aggregate(user_id, None)).await
    }

    /// Computes the quote, giving up once `deadline` has elapsed.
    ///
    /// The deadline covers the cart read and every lookup. On expiry the
    /// outstanding lookups are aborted and awaited before
    /// [`QuoteError::DeadlineExceeded`] is returned.
    #[tracing::instrument(skip(self))]
    pub async fn quote_within(&self, user_id: UserId, deadline: Duration) -> Result<Quote> {
        let expires_at = tokio::time::Instant::now().checked_add(deadline);
        self.observe(self.aggregate(user_id, expires_at)).await
    }

    async fn observe(&self, aggregation: impl Future<Output = Result<Quote>>) -> Result<Quote> {
        metrics::counter!("quote_requests_total").increment(1);
        let start = Instant::now();

        let result = aggregation.await;

        metrics::histogram!("quote_duration_seconds").record(start.elapsed().as_secs_f64());
        match &result {
            Ok(quote) => {
                tracing::debug!(lines = quote.lines.len(), total = %quote.total, "quote computed");
            }
            Err(e) => {
                metrics::counter!("quote_failures_total").increment(1);
                tracing::warn!(error = %e, "quote failed");
            }
        }
        result
    }

    async fn aggregate(
        &self,
        user_id: UserId,
        expires_at: Option<tokio::time::Instant>,
    ) -> Result<Quote> {
        let items = before(expires_at, self.cart.get_cart(user_id)).await??;
        if items.is_empty() {
            return Err(QuoteError::EmptyCart);
        }

        let permits = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();
        let mut slots: Vec<Option<QuoteLine>> = (0..items.len()).map(|_| None).collect();

        for (idx, item) in items.into_iter().enumerate() {
            let catalog = Arc::clone(&self.catalog);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| QuoteError::TaskFailed(e.to_string()))?;
                resolve_line(catalog.as_ref(), item)
                    .await
                    .map(|line| (idx, line))
            });
        }

        loop {
            let next = before(expires_at, tasks.join_next()).await;
            let outcome = match next {
                Ok(Some(joined)) => {
                    joined.unwrap_or_else(|e| Err(QuoteError::TaskFailed(e.to_string())))
                }
                Ok(None) => break,
                Err(expired) => Err(expired),
            };
            match outcome {
                Ok((idx, line)) => slots[idx] = Some(line),
                Err(e) => {
                    tasks.abort_all();
                    while tasks.join_next().await.is_some() {}
                    return Err(e);
                }
            }
        }

        let lines = slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| QuoteError::TaskFailed("lookup task produced no line".to_string()))?;
        Quote::from_lines(lines)
    }
}

/// Awaits `fut`, failing with `DeadlineExceeded` once `expires_at` passes.
async fn before<F: Future>(expires_at: Option<tokio::time::Instant>, fut: F) -> Result<F::Output> {
    match expires_at {
        Some(at) => tokio::time::timeout_at(at, fut)
            .await
            .map_err(|_| QuoteError::DeadlineExceeded),
        None => Ok(fut.await),
    }
}

async fn resolve_line<P>(catalog: &P, item: CartItem) -> Result<QuoteLine>
where
    P: CatalogReader + ?Sized,
{
    if item.quantity <= 0 {
        return Err(QuoteError::InvalidQuantity {
            product_id: item.product_id,
            quantity: item.quantity,
        });
    }
    let product = catalog.get_product(item.product_id).await?;
    QuoteLine::price(&item, product)
}
