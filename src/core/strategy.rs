//! EMA crossover decision with one-step hysteresis
//!
//! Price above the EMA means Buy, below means Sell, unless the last
//! executed action was already the same side. Equality never trades.

use crate::adapters::types::OrderSide;

/// Last order side executed in this run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastAction {
    #[default]
    None,
    Buy,
    Sell,
}

impl From<OrderSide> for LastAction {
    fn from(side: OrderSide) -> Self {
        match side {
            OrderSide::Buy => LastAction::Buy,
            OrderSide::Sell => LastAction::Sell,
        }
    }
}

/// What the strategy wants this iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Enter(OrderSide),
    Hold,
}

/// Stateful crossover strategy; owns only the last action
#[derive(Debug, Clone, Default)]
pub struct EmaCrossStrategy {
    last_action: LastAction,
}

impl EmaCrossStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_action(&self) -> LastAction {
        self.last_action
    }

    /// Decide without mutating state
    pub fn evaluate(&self, price: f64, ema: f64) -> Signal {
        if price > ema && self.last_action != LastAction::Buy {
            Signal::Enter(OrderSide::Buy)
        } else if price < ema && self.last_action != LastAction::Sell {
            Signal::Enter(OrderSide::Sell)
        } else {
            Signal::Hold
        }
    }

    /// Record an order the exchange accepted
    pub fn record_fill(&mut self, side: OrderSide) {
        self.last_action = side.into();
    }
}
