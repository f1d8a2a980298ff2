//! Core data types for exchange adapters
//!
//! These types are used across the exchange client, the worker, and tests
//! for consistent candle representation and order management.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// =============================================================================
// HTTP Client Constants
// =============================================================================

/// HTTP connection timeout (milliseconds) — fail fast if host unreachable
const HTTP_CONNECT_TIMEOUT_MS: u64 = 3000;
/// Max idle connections per host in connection pool
const HTTP_POOL_MAX_IDLE: usize = 2;
/// How long idle connections stay in the pool (seconds)
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;
/// TCP keepalive interval (seconds)
const HTTP_TCP_KEEPALIVE_SECS: u64 = 30;

/// Create the pooled HTTP client used by a single exchange session
///
/// The pool is sized for one request per minute; keepalive outlives the
/// default poll interval so the next iteration reuses the connection.
pub fn create_http_client(exchange_name: &str, timeout: Duration) -> reqwest::Client {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(HTTP_POOL_MAX_IDLE)
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .tcp_keepalive(Duration::from_secs(HTTP_TCP_KEEPALIVE_SECS))
        .connect_timeout(Duration::from_millis(HTTP_CONNECT_TIMEOUT_MS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());
    tracing::debug!(
        phase = "init",
        exchange = %exchange_name,
        timeout_ms = timeout.as_millis() as u64,
        connect_timeout_ms = HTTP_CONNECT_TIMEOUT_MS,
        pool_max_idle = HTTP_POOL_MAX_IDLE,
        "HTTP client configured"
    );
    client
}

// =============================================================================
// Market Data
// =============================================================================

/// One kline: open/high/low/close/volume/turnover for an interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Interval start in Unix milliseconds
    pub timestamp: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub turnover: f64,
}

/// Product category on a unified-account exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// USDT/USDC margined perpetuals and futures
    #[default]
    Linear,
    Inverse,
    Spot,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Linear => "linear",
            Category::Inverse => "inverse",
            Category::Spot => "spot",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for a recent-candles query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlineRequest {
    pub category: Category,
    pub symbol: String,
    /// Exchange interval code ("1" = one minute)
    pub interval: String,
    pub limit: u32,
}

// =============================================================================
// Orders
// =============================================================================

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "Buy",
            OrderSide::Sell => "Sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type; the bot only sends market orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Market,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "Market",
        }
    }
}

/// Time in force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    GoodTillCancel,
}

impl TimeInForce {
    /// v5 wire code
    pub fn as_wire(&self) -> &'static str {
        match self {
            TimeInForce::GoodTillCancel => "GTC",
        }
    }
}

/// Order request sent to an exchange client
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    /// Client-assigned id (sent as orderLinkId)
    pub client_order_id: String,
    pub category: Category,
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub time_in_force: TimeInForce,
}

impl OrderRequest {
    /// Market order, good-till-cancel, with a fresh client order id
    pub fn market(
        category: Category,
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
    ) -> Self {
        Self {
            client_order_id: uuid::Uuid::new_v4().to_string(),
            category,
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            quantity,
            time_in_force: TimeInForce::GoodTillCancel,
        }
    }

    /// Returns a reason when the request cannot be sent
    pub fn validate(&self) -> Option<String> {
        if self.symbol.trim().is_empty() {
            return Some("symbol is empty".to_string());
        }
        if self.quantity <= Decimal::ZERO {
            return Some(format!("quantity must be positive (got {})", self.quantity));
        }
        None
    }
}

/// Exchange acknowledgement of an accepted order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order_id: String,
    pub client_order_id: String,
}
