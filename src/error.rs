//! Application-wide error types using thiserror
//!
//! Every failure inside a trading iteration is funnelled into `AppError`
//! so the worker can stringify it into a single status line.

use crate::adapters::errors::ExchangeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Indicator error: {0}")]
    Indicator(String),

    #[error("A trading run is already active")]
    AlreadyRunning,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
