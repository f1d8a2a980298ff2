//! Trading worker loop
//!
//! One worker runs per Start. Each iteration fetches a fresh candle
//! window, recomputes the EMA over it, and places at most one market
//! order. Any failure becomes an error status line and the loop carries
//! on after the usual wait.
//!
//! # Logging
//! - Every published `StatusEvent` is also logged with its `event_type`

use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::adapters::types::{Category, KlineRequest, OrderRequest, OrderSide};
use crate::adapters::ExchangeClient;
use crate::config::{AppConfig, Network, Symbol};
use crate::core::events::{log_status_event, StatusEvent};
use crate::core::indicator::ema;
use crate::core::strategy::{EmaCrossStrategy, LastAction, Signal};
use crate::error::{AppError, Result};

/// Loop constants taken from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerSettings {
    pub category: Category,
    pub interval: String,
    pub candle_limit: u32,
    pub ema_period: usize,
    pub poll_interval: Duration,
}

impl WorkerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            category: config.exchange.category,
            interval: config.strategy.interval.clone(),
            candle_limit: config.strategy.candle_limit,
            ema_period: config.strategy.ema_period,
            poll_interval: config.strategy.poll_interval(),
        }
    }
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// User input captured when Start is pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    pub symbol: Symbol,
    /// Raw quantity text; parsed at the top of every iteration
    pub quantity: String,
    pub network: Network,
}

/// Result of one successful iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOutcome {
    Ordered(OrderSide),
    NoSignal,
}

/// Counters returned when the worker exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerSummary {
    pub iterations: u64,
    pub orders: u64,
    pub errors: u64,
    pub last_action: LastAction,
}

/// Parse the order quantity typed by the user
pub fn parse_quantity(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    let qty = Decimal::from_str(trimmed)
        .map_err(|_| AppError::InvalidInput(format!("quantity '{}' is not a number", trimmed)))?;
    if qty <= Decimal::ZERO {
        return Err(AppError::InvalidInput(format!(
            "quantity must be positive (got {})",
            qty
        )));
    }
    Ok(qty)
}

pub struct TradingWorker<E> {
    exchange: E,
    params: RunParams,
    settings: WorkerSettings,
    strategy: EmaCrossStrategy,
    status_tx: broadcast::Sender<StatusEvent>,
}

impl<E: ExchangeClient> TradingWorker<E> {
    pub fn new(
        exchange: E,
        params: RunParams,
        settings: WorkerSettings,
        status_tx: broadcast::Sender<StatusEvent>,
    ) -> Self {
        Self {
            exchange,
            params,
            settings,
            strategy: EmaCrossStrategy::new(),
            status_tx,
        }
    }

    pub fn last_action(&self) -> LastAction {
        self.strategy.last_action()
    }

    fn publish(&self, event: StatusEvent) {
        log_status_event(&event);
        // No subscribers is fine (headless mode)
        let _ = self.status_tx.send(event);
    }

    /// Fetch, compute, decide, and maybe order
    pub async fn run_iteration(&mut self) -> Result<IterationOutcome> {
        let quantity = parse_quantity(&self.params.quantity)?;
        let symbol = self.params.symbol.as_str();

        let request = KlineRequest {
            category: self.settings.category,
            symbol: symbol.to_string(),
            interval: self.settings.interval.clone(),
            limit: self.settings.candle_limit,
        };
        let candles = self.exchange.get_klines(&request).await?;
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

        let price = *closes
            .last()
            .ok_or_else(|| AppError::Indicator(format!("no candles returned for {}", symbol)))?;
        let ema = ema(&closes, self.settings.ema_period)
            .ok_or_else(|| AppError::Indicator("EMA period must be > 0".to_string()))?;

        debug!(
            pair = %symbol,
            candles = closes.len(),
            last_action = ?self.strategy.last_action(),
            "Indicator computed"
        );

        self.publish(StatusEvent::Tick {
            symbol: symbol.to_string(),
            price,
            ema,
            period: self.settings.ema_period,
        });

        match self.strategy.evaluate(price, ema) {
            Signal::Enter(side) => {
                let order = OrderRequest::market(self.settings.category, symbol, side, quantity);
                let response = self.exchange.place_order(order).await?;
                // Only an accepted order counts; a rejection is retried next iteration
                self.strategy.record_fill(side);
                self.publish(StatusEvent::OrderPlaced {
                    side,
                    order_id: response.order_id,
                });
                Ok(IterationOutcome::Ordered(side))
            }
            Signal::Hold => {
                self.publish(StatusEvent::NoSignal);
                Ok(IterationOutcome::NoSignal)
            }
        }
    }

    /// Run until `cancel` fires
    ///
    /// Cancellation is checked at the loop top and during the wait; an
    /// iteration already in progress is allowed to finish.
    pub async fn run(mut self, cancel: CancellationToken) -> WorkerSummary {
        self.publish(StatusEvent::Started {
            symbol: self.params.symbol.to_string(),
            network: self.params.network,
        });

        let mut summary = WorkerSummary::default();

        loop {
            if cancel.is_cancelled() {
                break;
            }

            summary.iterations += 1;
            match self.run_iteration().await {
                Ok(IterationOutcome::Ordered(_)) => summary.orders += 1,
                Ok(IterationOutcome::NoSignal) => {}
                Err(e) => {
                    summary.errors += 1;
                    self.publish(StatusEvent::Error(e.to_string()));
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.settings.poll_interval) => {}
            }
        }

        summary.last_action = self.strategy.last_action();
        self.publish(StatusEvent::Stopped);
        summary
    }
}
