//! Exchange client trait definition
//!
//! The trading worker only talks to the exchange through this trait, so
//! the Bybit REST client and test doubles are interchangeable.

use async_trait::async_trait;

use crate::adapters::errors::ExchangeResult;
use crate::adapters::types::{Candle, KlineRequest, OrderRequest, OrderResponse};

/// Common trait for exchange clients consumed by the trading worker
///
/// # Example Implementation
///
/// ```ignore
/// use async_trait::async_trait;
///
/// struct PaperExchange;
///
/// #[async_trait]
/// impl ExchangeClient for PaperExchange {
///     async fn get_klines(&self, req: &KlineRequest) -> ExchangeResult<Vec<Candle>> {
///         Ok(Vec::new())
///     }
///     // ... other methods
/// }
/// ```
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Fetch the most recent candles, ordered oldest first
    ///
    /// # Arguments
    /// * `request` - category, symbol, interval code and window size
    async fn get_klines(&self, request: &KlineRequest) -> ExchangeResult<Vec<Candle>>;

    /// Place an order on the exchange
    ///
    /// # Returns
    /// Order acknowledgement with the exchange-assigned order ID
    async fn place_order(&self, order: OrderRequest) -> ExchangeResult<OrderResponse>;

    /// Get the exchange name identifier (e.g. "bybit")
    fn exchange_name(&self) -> &'static str;
}

#[async_trait]
impl<T: ExchangeClient + ?Sized> ExchangeClient for std::sync::Arc<T> {
    async fn get_klines(&self, request: &KlineRequest) -> ExchangeResult<Vec<Candle>> {
        (**self).get_klines(request).await
    }

    async fn place_order(&self, order: OrderRequest) -> ExchangeResult<OrderResponse> {
        (**self).place_order(order).await
    }

    fn exchange_name(&self) -> &'static str {
        (**self).exchange_name()
    }
}
