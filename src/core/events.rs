//! Status events published by the trading worker
//!
//! Each event renders as the single human-readable status line the UI
//! shows, and is also logged with a stable `event_type` field.
//!
//! # Event Types
//!
//! - **TRADING_STARTED**: worker task began
//! - **MARKET_TICK**: price and EMA for this iteration
//! - **ORDER_PLACED**: market order accepted
//! - **NO_SIGNAL**: nothing to do this iteration
//! - **ITERATION_ERROR**: iteration failed, loop continues
//! - **TRADING_STOPPED**: worker task exited

use std::fmt;
use tracing::{error, info};

use crate::adapters::types::OrderSide;
use crate::config::Network;

/// Worker status update
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    Started {
        symbol: String,
        network: Network,
    },
    Tick {
        symbol: String,
        price: f64,
        ema: f64,
        period: usize,
    },
    OrderPlaced {
        side: OrderSide,
        order_id: String,
    },
    NoSignal,
    Error(String),
    Stopped,
}

impl StatusEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            StatusEvent::Started { .. } => "TRADING_STARTED",
            StatusEvent::Tick { .. } => "MARKET_TICK",
            StatusEvent::OrderPlaced { .. } => "ORDER_PLACED",
            StatusEvent::NoSignal => "NO_SIGNAL",
            StatusEvent::Error(_) => "ITERATION_ERROR",
            StatusEvent::Stopped => "TRADING_STOPPED",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatusEvent::Error(_))
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusEvent::Started { symbol, network } => {
                write!(f, "▶️ Trading started: {} on {}", symbol, network)
            }
            StatusEvent::Tick {
                symbol,
                price,
                ema,
                period,
            } => write!(
                f,
                "💹 {} | Price: {:.4}, EMA{}: {:.4}",
                symbol, price, period, ema
            ),
            StatusEvent::OrderPlaced {
                side: OrderSide::Buy,
                ..
            } => write!(f, "✅ BUY order placed"),
            StatusEvent::OrderPlaced {
                side: OrderSide::Sell,
                ..
            } => write!(f, "🔻 SELL order placed"),
            StatusEvent::NoSignal => write!(f, "⏳ No trade signal."),
            StatusEvent::Error(msg) => write!(f, "❌ Error: {}", msg),
            StatusEvent::Stopped => write!(f, "🚫 Trading stopped."),
        }
    }
}

/// Log a status event with its structured fields
pub fn log_status_event(event: &StatusEvent) {
    let event_type = event.event_type();
    match event {
        StatusEvent::Error(msg) => {
            error!(event_type, error = %msg, "{}", event);
        }
        StatusEvent::Tick {
            symbol, price, ema, ..
        } => {
            info!(event_type, pair = %symbol, price = *price, ema = *ema, "{}", event);
        }
        StatusEvent::OrderPlaced { side, order_id } => {
            info!(event_type, direction = %side, order_id = %order_id, "{}", event);
        }
        _ => {
            info!(event_type, "{}", event);
        }
    }
}
