//! Core module - indicator, strategy, worker loop, and its controller
//!
//! # Module Architecture
//!
//! This module uses **explicit re-exports** instead of glob exports
//! (`pub use module::*`) to keep the public API visible.
//!
//! ## Usage
//! ```ignore
//! use crate::core::{TradingController, RunParams, WorkerSettings};
//! ```

pub mod controller;
pub mod events;
pub mod indicator;
pub mod strategy;
pub mod worker;

pub use controller::{TradingController, STATUS_CHANNEL_CAPACITY};
pub use events::{log_status_event, StatusEvent};
pub use indicator::ema;
pub use strategy::{EmaCrossStrategy, LastAction, Signal};
pub use worker::{
    parse_quantity, IterationOutcome, RunParams, TradingWorker, WorkerSettings, WorkerSummary,
};
