//! Bybit Configuration
//!
//! Session credentials and endpoint selection, including environment loading.

use std::fmt;

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::config::{ExchangeConfig, Network};

const MAINNET_REST_URL: &str = "https://api.bybit.com";
const TESTNET_REST_URL: &str = "https://api-testnet.bybit.com";

/// Configuration for one authenticated Bybit REST session
#[derive(Clone)]
pub struct BybitConfig {
    pub api_key: String,
    pub api_secret: String,
    pub network: Network,
    /// Signature validity window (milliseconds)
    pub recv_window_ms: u64,
    /// Replaces the network's base URL (mock servers in tests)
    pub base_url_override: Option<String>,
}

impl BybitConfig {
    /// Build from UI input; surrounding whitespace is trimmed
    pub fn new(api_key: &str, api_secret: &str, network: Network) -> Self {
        Self {
            api_key: api_key.trim().to_string(),
            api_secret: api_secret.trim().to_string(),
            network,
            recv_window_ms: ExchangeConfig::default().recv_window_ms,
            base_url_override: None,
        }
    }

    /// Create configuration from environment variables
    ///
    /// `BYBIT_API_KEY` and `BYBIT_API_SECRET` are required; `BYBIT_TESTNET`
    /// defaults to true.
    pub fn from_env() -> ExchangeResult<Self> {
        let api_key = std::env::var("BYBIT_API_KEY")
            .map_err(|_| ExchangeError::AuthenticationFailed("BYBIT_API_KEY not set".into()))?;
        if api_key.trim().is_empty() {
            return Err(ExchangeError::AuthenticationFailed("BYBIT_API_KEY is empty".into()));
        }

        let api_secret = std::env::var("BYBIT_API_SECRET")
            .map_err(|_| ExchangeError::AuthenticationFailed("BYBIT_API_SECRET not set".into()))?;
        if api_secret.trim().is_empty() {
            return Err(ExchangeError::AuthenticationFailed("BYBIT_API_SECRET is empty".into()));
        }

        Ok(Self::new(&api_key, &api_secret, network_from_env()))
    }

    pub fn with_exchange_config(mut self, exchange: &ExchangeConfig) -> Self {
        self.recv_window_ms = exchange.recv_window_ms;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url_override = Some(url.into());
        self
    }

    /// Get REST API base URL
    pub fn rest_base_url(&self) -> &str {
        if let Some(url) = &self.base_url_override {
            return url.trim_end_matches('/');
        }
        match self.network {
            Network::Testnet => TESTNET_REST_URL,
            Network::Mainnet => MAINNET_REST_URL,
        }
    }
}

/// `BYBIT_TESTNET`: anything but "false"/"0" keeps the sandbox
pub fn network_from_env() -> Network {
    match std::env::var("BYBIT_TESTNET").as_deref() {
        Ok("false") | Ok("0") => Network::Mainnet,
        _ => Network::Testnet,
    }
}

impl fmt::Debug for BybitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BybitConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("network", &self.network)
            .field("recv_window_ms", &self.recv_window_ms)
            .field("base_url_override", &self.base_url_override)
            .finish()
    }
}
