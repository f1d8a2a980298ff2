//! Bybit REST adapter
//!
//! Implements the two operations the trading worker consumes:
//! public kline queries and signed market-order placement.

use async_trait::async_trait;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::adapters::bybit::config::BybitConfig;
use crate::adapters::bybit::signing::signed_headers;
use crate::adapters::bybit::types::{ApiEnvelope, KlineResult, OrderCreateBody, OrderCreateResult};
use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::traits::ExchangeClient;
use crate::adapters::types::{create_http_client, Candle, KlineRequest, OrderRequest, OrderResponse};

const KLINE_PATH: &str = "/v5/market/kline";
const ORDER_CREATE_PATH: &str = "/v5/order/create";

fn current_time_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Authenticated REST session against one Bybit environment
pub struct BybitAdapter {
    config: BybitConfig,
    http_client: reqwest::Client,
    timeout_ms: u64,
}

impl BybitAdapter {
    /// Create a session; no network traffic happens until the first call
    pub fn new(config: BybitConfig, timeout: Duration) -> Self {
        tracing::info!(
            phase = "init",
            exchange = "bybit",
            network = %config.network,
            base_url = %config.rest_base_url(),
            "Exchange session created"
        );
        Self {
            http_client: create_http_client("bybit", timeout),
            timeout_ms: timeout.as_millis() as u64,
            config,
        }
    }

    /// Read the body and unwrap the v5 envelope
    async fn parse_envelope(&self, response: reqwest::Response) -> ExchangeResult<ApiEnvelope> {
        let status = response.status();
        let text = response.text().await.map_err(|e| {
            ExchangeError::InvalidResponse(format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            return Err(ExchangeError::InvalidResponse(format!(
                "HTTP {}: {}",
                status, text
            )));
        }

        serde_json::from_str(&text).map_err(|e| {
            ExchangeError::InvalidResponse(format!("Invalid JSON: {} - {}", e, text))
        })
    }
}

#[async_trait]
impl ExchangeClient for BybitAdapter {
    async fn get_klines(&self, request: &KlineRequest) -> ExchangeResult<Vec<Candle>> {
        let url = format!("{}{}", self.config.rest_base_url(), KLINE_PATH);
        let limit = request.limit.to_string();

        tracing::debug!(
            symbol = %request.symbol,
            interval = %request.interval,
            limit = request.limit,
            "Bybit get_klines: GET {}",
            url
        );

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("category", request.category.as_str()),
                ("symbol", request.symbol.as_str()),
                ("interval", request.interval.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ExchangeError::from_transport(e, self.timeout_ms))?;

        let result: KlineResult = self.parse_envelope(response).await?.into_result()?;
        result.into_candles()
    }

    async fn place_order(&self, order: OrderRequest) -> ExchangeResult<OrderResponse> {
        if let Some(err) = order.validate() {
            return Err(ExchangeError::OrderRejected(format!("Invalid order: {}", err)));
        }

        let body = OrderCreateBody {
            category: order.category.as_str(),
            symbol: &order.symbol,
            side: order.side.as_str(),
            order_type: order.order_type.as_str(),
            qty: order.quantity.normalize().to_string(),
            time_in_force: order.time_in_force.as_wire(),
            order_link_id: &order.client_order_id,
        };
        let body = serde_json::to_string(&body)
            .map_err(|e| ExchangeError::InvalidResponse(format!("Failed to encode order: {}", e)))?;

        let headers = signed_headers(
            &self.config.api_key,
            &self.config.api_secret,
            current_time_ms(),
            self.config.recv_window_ms,
            &body,
        )?;

        tracing::debug!("Bybit place_order body: {}", body);

        let url = format!("{}{}", self.config.rest_base_url(), ORDER_CREATE_PATH);
        let mut builder = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json");
        for (name, value) in headers.pairs() {
            builder = builder.header(name, value);
        }

        let response = builder
            .body(body)
            .send()
            .await
            .map_err(|e| ExchangeError::from_transport(e, self.timeout_ms))?;

        let result: OrderCreateResult = self.parse_envelope(response).await?.into_result()?;

        tracing::info!(
            pair = %order.symbol,
            side = %order.side,
            size = %order.quantity,
            order_id = %result.order_id,
            "Order placed"
        );

        Ok(OrderResponse {
            order_id: result.order_id,
            client_order_id: order.client_order_id,
        })
    }

    fn exchange_name(&self) -> &'static str {
        "bybit"
    }
}
