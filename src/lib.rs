//! EMA Bot — EMA crossover trading on Bybit linear perpetuals
//!
//! - Bybit v5 REST client (klines + signed market orders)
//! - Recompute-from-window EMA and crossover strategy
//! - Cancellable trading worker behind a Start/Stop controller
//! - Terminal UI shell

pub mod adapters;
pub mod config;
pub mod core;
pub mod error;
pub mod tui;

pub use error::AppError;
