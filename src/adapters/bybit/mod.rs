//! Bybit v5 REST client
//!
//! - `config`: credentials and endpoint selection
//! - `signing`: HMAC-SHA256 request signatures
//! - `types`: response envelope and wire structs
//! - `adapter`: `ExchangeClient` implementation

pub mod adapter;
pub mod config;
pub mod signing;
pub mod types;

pub use adapter::BybitAdapter;
pub use config::BybitConfig;
