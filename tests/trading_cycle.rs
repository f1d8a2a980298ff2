//! End-to-End Trading Cycle Tests
//!
//! Drives the controller and worker against:
//! 1. The real Bybit adapter pointed at a mockito server
//! 2. A scripted in-process exchange for multi-iteration scenarios
//!
//! # Running the tests
//! ```bash
//! cargo test --test trading_cycle
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mockito::Matcher;
use tokio::sync::broadcast;

use ema_bot::adapters::errors::{ExchangeError, ExchangeResult};
use ema_bot::adapters::types::{Candle, KlineRequest, OrderRequest, OrderResponse, OrderSide};
use ema_bot::adapters::{BybitAdapter, BybitConfig, ExchangeClient};
use ema_bot::config::{Network, Symbol};
use ema_bot::core::{LastAction, RunParams, StatusEvent, TradingController, WorkerSettings};

// =============================================================================
// Helpers
// =============================================================================

fn ramp_up() -> Vec<f64> {
    (0..50).map(|i| 1.0 + i as f64 * 0.01).collect()
}

fn ramp_down() -> Vec<f64> {
    (0..50).map(|i| 1.49 - i as f64 * 0.01).collect()
}

fn params(quantity: &str) -> RunParams {
    RunParams {
        symbol: Symbol::AdaUsdt,
        quantity: quantity.to_string(),
        network: Network::Testnet,
    }
}

fn fast_settings() -> WorkerSettings {
    WorkerSettings {
        poll_interval: Duration::from_millis(10),
        ..WorkerSettings::default()
    }
}

/// Kline response body with rows newest first, as Bybit sends them
fn kline_body(closes: &[f64]) -> String {
    let rows: Vec<serde_json::Value> = closes
        .iter()
        .enumerate()
        .rev()
        .map(|(i, close)| {
            let close = format!("{:.2}", close);
            serde_json::json!([
                (1_700_000_000_000u64 + i as u64 * 60_000).to_string(),
                close,
                close,
                close,
                close,
                "1000",
                "1000"
            ])
        })
        .collect();

    serde_json::json!({
        "retCode": 0,
        "retMsg": "OK",
        "result": { "symbol": "ADAUSDT", "category": "linear", "list": rows },
        "time": 1_700_000_000_000u64
    })
    .to_string()
}

fn bybit_adapter(server: &mockito::Server) -> BybitAdapter {
    let config = BybitConfig::new("test-key", "test-secret", Network::Testnet)
        .with_base_url(server.url());
    BybitAdapter::new(config, Duration::from_secs(2))
}

/// Receive status events until `pred` matches, failing after 5s
async fn wait_for<F>(rx: &mut broadcast::Receiver<StatusEvent>, mut pred: F) -> Vec<StatusEvent>
where
    F: FnMut(&StatusEvent) -> bool,
{
    let mut seen = Vec::new();
    let result = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = rx.recv().await.expect("status channel closed");
            let done = pred(&event);
            seen.push(event);
            if done {
                break;
            }
        }
    })
    .await;
    assert!(result.is_ok(), "timed out waiting for status; saw {:?}", seen);
    seen
}

// =============================================================================
// Scripted exchange
// =============================================================================

/// Serves one close window per call; the last window repeats
struct ScriptedExchange {
    windows: Mutex<VecDeque<Vec<f64>>>,
    last: Mutex<Vec<f64>>,
    kline_failures: AtomicU32,
    orders: Mutex<Vec<OrderSide>>,
}

impl ScriptedExchange {
    fn new(windows: Vec<Vec<f64>>) -> Self {
        Self {
            windows: Mutex::new(windows.into()),
            last: Mutex::new(Vec::new()),
            kline_failures: AtomicU32::new(0),
            orders: Mutex::new(Vec::new()),
        }
    }

    fn failing_first(windows: Vec<Vec<f64>>, failures: u32) -> Self {
        let exchange = Self::new(windows);
        exchange.kline_failures.store(failures, Ordering::SeqCst);
        exchange
    }

    fn orders(&self) -> Vec<OrderSide> {
        self.orders.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExchangeClient for ScriptedExchange {
    async fn get_klines(&self, _request: &KlineRequest) -> ExchangeResult<Vec<Candle>> {
        if self
            .kline_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(ExchangeError::ConnectionFailed("scripted outage".into()));
        }

        let closes = {
            let mut windows = self.windows.lock().unwrap();
            let mut last = self.last.lock().unwrap();
            if let Some(next) = windows.pop_front() {
                *last = next;
            }
            last.clone()
        };

        Ok(closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                timestamp: i as u64 * 60_000,
                open: close,
                high: close,
                low: close,
                close,
                volume: 1.0,
                turnover: close,
            })
            .collect())
    }

    async fn place_order(&self, order: OrderRequest) -> ExchangeResult<OrderResponse> {
        let mut orders = self.orders.lock().unwrap();
        orders.push(order.side);
        Ok(OrderResponse {
            order_id: format!("order-{}", orders.len()),
            client_order_id: order.client_order_id,
        })
    }

    fn exchange_name(&self) -> &'static str {
        "scripted"
    }
}

// =============================================================================
// Bybit adapter against a mock server
// =============================================================================

#[tokio::test]
async fn test_rising_market_places_single_buy_over_bybit() {
    let mut server = mockito::Server::new_async().await;
    let klines = server
        .mock("GET", "/v5/market/kline")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("category".into(), "linear".into()),
            Matcher::UrlEncoded("symbol".into(), "ADAUSDT".into()),
            Matcher::UrlEncoded("interval".into(), "1".into()),
            Matcher::UrlEncoded("limit".into(), "50".into()),
        ]))
        .with_status(200)
        .with_body(kline_body(&ramp_up()))
        .expect_at_least(2)
        .create_async()
        .await;
    let order = server
        .mock("POST", "/v5/order/create")
        .match_header("X-BAPI-API-KEY", "test-key")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "category": "linear",
            "symbol": "ADAUSDT",
            "side": "Buy",
            "orderType": "Market",
            "qty": "5",
            "timeInForce": "GTC"
        })))
        .with_status(200)
        .with_body(r#"{"retCode":0,"retMsg":"OK","result":{"orderId":"bybit-1"}}"#)
        .expect(1)
        .create_async()
        .await;

    let mut controller = TradingController::new();
    let mut rx = controller.subscribe();
    controller
        .start(bybit_adapter(&server), params("5"), fast_settings())
        .unwrap();

    // Buy on the first iteration, then hold on the next
    let seen = wait_for(&mut rx, |e| *e == StatusEvent::NoSignal).await;
    let summary = controller.stop().await.unwrap();

    let lines: Vec<String> = seen.iter().map(|e| e.to_string()).collect();
    assert!(lines.iter().any(|l| l.starts_with("💹 ADAUSDT | Price: 1.4900, EMA20: ")));
    assert!(lines.contains(&"✅ BUY order placed".to_string()));
    assert_eq!(summary.last_action, LastAction::Buy);
    assert_eq!(summary.orders, 1);

    klines.assert_async().await;
    order.assert_async().await;
}

#[tokio::test]
async fn test_invalid_quantity_reports_error_without_network_calls() {
    let mut server = mockito::Server::new_async().await;
    let klines = server
        .mock("GET", "/v5/market/kline")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let mut controller = TradingController::new();
    let mut rx = controller.subscribe();
    controller
        .start(bybit_adapter(&server), params("abc"), fast_settings())
        .unwrap();

    let seen = wait_for(&mut rx, |e| matches!(e, StatusEvent::Error(_))).await;
    controller.stop().await;

    let error = seen.last().unwrap().to_string();
    assert!(error.starts_with("❌ Error: "));
    assert!(error.contains("abc"));
    klines.assert_async().await;
}

#[tokio::test]
async fn test_rejected_order_surfaces_and_retries() {
    let mut server = mockito::Server::new_async().await;
    let _klines = server
        .mock("GET", "/v5/market/kline")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(kline_body(&ramp_up()))
        .create_async()
        .await;
    let _order = server
        .mock("POST", "/v5/order/create")
        .with_status(200)
        .with_body(r#"{"retCode":110007,"retMsg":"ab not enough for new order","result":{}}"#)
        .expect_at_least(2)
        .create_async()
        .await;

    let mut controller = TradingController::new();
    let mut rx = controller.subscribe();
    controller
        .start(bybit_adapter(&server), params("5"), fast_settings())
        .unwrap();

    let mut errors = 0;
    wait_for(&mut rx, |e| {
        if matches!(e, StatusEvent::Error(_)) {
            errors += 1;
        }
        errors == 2
    })
    .await;
    let summary = controller.stop().await.unwrap();

    // Never accepted, so the strategy keeps trying to buy
    assert_eq!(summary.last_action, LastAction::None);
    assert_eq!(summary.orders, 0);
    assert!(summary.errors >= 2);
}

// =============================================================================
// Scripted multi-iteration scenarios
// =============================================================================

#[tokio::test]
async fn test_buy_then_sell_on_crossover() {
    let exchange = Arc::new(ScriptedExchange::new(vec![ramp_up(), ramp_up(), ramp_down()]));
    let mut controller = TradingController::new();
    let mut rx = controller.subscribe();
    controller
        .start(Arc::clone(&exchange), params("5"), fast_settings())
        .unwrap();

    let seen = wait_for(&mut rx, |e| e.to_string() == "🔻 SELL order placed").await;
    let summary = controller.stop().await.unwrap();

    let placed: Vec<&StatusEvent> = seen
        .iter()
        .filter(|e| matches!(e, StatusEvent::OrderPlaced { .. }))
        .collect();
    assert_eq!(placed.len(), 2);
    assert!(seen.contains(&StatusEvent::NoSignal));
    assert_eq!(exchange.orders(), vec![OrderSide::Buy, OrderSide::Sell]);
    assert_eq!(summary.last_action, LastAction::Sell);
}

#[tokio::test]
async fn test_errors_do_not_end_the_loop() {
    let exchange = Arc::new(ScriptedExchange::failing_first(vec![ramp_up()], 2));
    let mut controller = TradingController::new();
    let mut rx = controller.subscribe();
    controller
        .start(Arc::clone(&exchange), params("5"), fast_settings())
        .unwrap();

    let seen = wait_for(&mut rx, |e| matches!(e, StatusEvent::OrderPlaced { .. })).await;
    let summary = controller.stop().await.unwrap();

    let errors = seen.iter().filter(|e| e.is_error()).count();
    assert_eq!(errors, 2);
    assert!(seen
        .iter()
        .any(|e| e.to_string() == "❌ Error: Exchange error: Connection failed: scripted outage"));
    assert_eq!(summary.errors, 2);
    assert_eq!(exchange.orders(), vec![OrderSide::Buy]);
}

#[tokio::test]
async fn test_stop_ends_with_stopped_event_and_no_more_calls() {
    let exchange = Arc::new(ScriptedExchange::new(vec![ramp_up()]));
    let mut controller = TradingController::new();
    let mut rx = controller.subscribe();
    controller
        .start(Arc::clone(&exchange), params("5"), fast_settings())
        .unwrap();

    wait_for(&mut rx, |e| matches!(e, StatusEvent::OrderPlaced { .. })).await;
    controller.stop().await;
    assert!(!controller.is_running());

    let rest = wait_for(&mut rx, |e| *e == StatusEvent::Stopped).await;
    assert_eq!(rest.last().unwrap().to_string(), "🚫 Trading stopped.");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err());
}
