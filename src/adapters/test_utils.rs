//! Shared test utilities for exchange-client testing
//!
//! Provides a scriptable `TestMockExchange` used by the worker, controller
//! and trait test modules.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::traits::ExchangeClient;
use crate::adapters::types::{Candle, KlineRequest, OrderRequest, OrderResponse};

/// Build a one-minute candle window from a close series
pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            timestamp: 1_700_000_000_000 + i as u64 * 60_000,
            open: close,
            high: close,
            low: close,
            close,
            volume: 100.0,
            turnover: 100.0 * close,
        })
        .collect()
}

/// Mock exchange with scripted candle windows and failure injection
///
/// Each `get_klines` call pops the next scripted window; once the script
/// is exhausted the last window keeps being served.
pub struct TestMockExchange {
    windows: Mutex<VecDeque<Vec<Candle>>>,
    current: Mutex<Vec<Candle>>,
    kline_failures: AtomicU32,
    order_failures: AtomicU32,
    kline_calls: AtomicU64,
    kline_delay: Option<Duration>,
    orders: Mutex<Vec<OrderRequest>>,
}

impl TestMockExchange {
    /// Mock that always serves the same window
    pub fn with_closes(closes: &[f64]) -> Self {
        Self::with_windows(vec![closes.to_vec()])
    }

    /// Mock that serves one window per call, in order
    pub fn with_windows(windows: Vec<Vec<f64>>) -> Self {
        Self {
            windows: Mutex::new(windows.iter().map(|w| candles_from_closes(w)).collect()),
            current: Mutex::new(Vec::new()),
            kline_failures: AtomicU32::new(0),
            order_failures: AtomicU32::new(0),
            kline_calls: AtomicU64::new(0),
            kline_delay: None,
            orders: Mutex::new(Vec::new()),
        }
    }

    /// Hold every kline fetch for `delay`, like a slow HTTP round trip
    pub fn with_kline_delay(mut self, delay: Duration) -> Self {
        self.kline_delay = Some(delay);
        self
    }

    /// Make the next `n` kline fetches fail
    pub fn fail_next_klines(&self, n: u32) {
        self.kline_failures.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` order placements fail
    pub fn fail_next_orders(&self, n: u32) {
        self.order_failures.store(n, Ordering::SeqCst);
    }

    pub fn kline_calls(&self) -> u64 {
        self.kline_calls.load(Ordering::SeqCst)
    }

    /// Orders accepted so far
    pub fn orders(&self) -> Vec<OrderRequest> {
        self.orders.lock().map(|o| o.clone()).unwrap_or_default()
    }

    fn take_failure(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl ExchangeClient for TestMockExchange {
    async fn get_klines(&self, _request: &KlineRequest) -> ExchangeResult<Vec<Candle>> {
        self.kline_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.kline_delay {
            tokio::time::sleep(delay).await;
        }

        if Self::take_failure(&self.kline_failures) {
            return Err(ExchangeError::ConnectionFailed("Mock kline failure".to_string()));
        }

        let mut current = self.current.lock().expect("mock current lock");
        if let Some(next) = self.windows.lock().expect("mock windows lock").pop_front() {
            *current = next;
        }
        Ok(current.clone())
    }

    async fn place_order(&self, order: OrderRequest) -> ExchangeResult<OrderResponse> {
        if Self::take_failure(&self.order_failures) {
            return Err(ExchangeError::OrderRejected("Mock failure".to_string()));
        }

        let response = OrderResponse {
            order_id: format!("mock-{}", order.client_order_id),
            client_order_id: order.client_order_id.clone(),
        };
        self.orders.lock().expect("mock orders lock").push(order);
        Ok(response)
    }

    fn exchange_name(&self) -> &'static str {
        "mock"
    }
}
