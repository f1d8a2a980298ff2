//! Exchange adapters
//!
//! This module provides the exchange-client abstraction consumed by the
//! trading worker and its Bybit REST implementation.

pub mod bybit;
pub mod errors;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types for convenience
pub use bybit::{BybitAdapter, BybitConfig};
pub use errors::{ExchangeError, ExchangeResult};
pub use traits::ExchangeClient;
pub use types::{Candle, Category, KlineRequest, OrderRequest, OrderResponse, OrderSide};
