//! Exchange adapter error types
//!
//! All exchange-related errors are wrapped in ExchangeError enum
//! which implements thiserror for consistent error handling.

use thiserror::Error;

/// Bybit retCodes that indicate a credential problem
const AUTH_RET_CODES: [i64; 3] = [10003, 10004, 10005];

/// Exchange-specific error types for adapter operations
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Connection to exchange failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Network operation timed out
    #[error("Network timeout after {0}ms")]
    NetworkTimeout(u64),

    /// Invalid or unexpected response from exchange
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// API key / signature rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Order refused before or by the matching engine
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// Exchange returned a non-zero retCode
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },
}

impl ExchangeError {
    /// Map a non-zero Bybit retCode to the matching variant
    pub fn from_ret_code(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        if AUTH_RET_CODES.contains(&code) {
            ExchangeError::AuthenticationFailed(format!("{} (retCode {})", message, code))
        } else {
            ExchangeError::Api { code, message }
        }
    }

    /// Convert a reqwest transport error, keeping timeouts distinct
    pub fn from_transport(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            ExchangeError::NetworkTimeout(timeout_ms)
        } else {
            ExchangeError::ConnectionFailed(err.to_string())
        }
    }
}

/// Result type alias for exchange operations
pub type ExchangeResult<T> = std::result::Result<T, ExchangeError>;
