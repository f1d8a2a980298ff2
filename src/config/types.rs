//! Configuration types for the EMA bot
//!
//! This module defines the configuration structs that are loaded from YAML.
//! Every section has defaults, so an absent or partial file is valid.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::adapters::types::Category;
use crate::error::AppError;

/// Bybit caps kline queries at 1000 rows
const MAX_CANDLE_LIMIT: u32 = 1000;

// ============================================================================
// Enums
// ============================================================================

/// Supported trading pairs (USDT linear perpetuals)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Symbol {
    #[default]
    #[serde(rename = "ADAUSDT")]
    AdaUsdt,
    #[serde(rename = "BTCUSDT")]
    BtcUsdt,
    #[serde(rename = "ETHUSDT")]
    EthUsdt,
    #[serde(rename = "SOLUSDT")]
    SolUsdt,
    #[serde(rename = "XRPUSDT")]
    XrpUsdt,
}

impl Symbol {
    /// Selector order shown in the UI
    pub const ALL: [Symbol; 5] = [
        Symbol::AdaUsdt,
        Symbol::BtcUsdt,
        Symbol::EthUsdt,
        Symbol::SolUsdt,
        Symbol::XrpUsdt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::AdaUsdt => "ADAUSDT",
            Symbol::BtcUsdt => "BTCUSDT",
            Symbol::EthUsdt => "ETHUSDT",
            Symbol::SolUsdt => "SOLUSDT",
            Symbol::XrpUsdt => "XRPUSDT",
        }
    }

    /// Parse an exchange ticker, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|sym| sym.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exchange environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Sandbox with fake funds
    #[default]
    Testnet,
    /// Live production exchange
    Mainnet,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::Testnet, Network::Mainnet];

    pub fn is_testnet(&self) -> bool {
        matches!(self, Network::Testnet)
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Testnet => write!(f, "Testnet"),
            Network::Mainnet => write!(f, "Mainnet"),
        }
    }
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// EMA crossover parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrategyConfig {
    /// EMA span in candles
    pub ema_period: usize,
    /// Number of candles fetched per iteration
    pub candle_limit: u32,
    /// Kline interval code ("1" = one minute)
    pub interval: String,
    /// Wait between iterations (seconds)
    pub poll_interval_secs: u64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            ema_period: 20,
            candle_limit: 50,
            interval: "1".to_string(),
            poll_interval_secs: 60,
        }
    }
}

impl StrategyConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.ema_period == 0 {
            return Err(AppError::Config("strategy.ema_period must be > 0".to_string()));
        }

        if self.candle_limit == 0 || self.candle_limit > MAX_CANDLE_LIMIT {
            return Err(AppError::Config(format!(
                "strategy.candle_limit must be between 1 and {} (got {})",
                MAX_CANDLE_LIMIT, self.candle_limit
            )));
        }

        if self.interval.trim().is_empty() {
            return Err(AppError::Config("strategy.interval cannot be empty".to_string()));
        }

        if self.poll_interval_secs == 0 {
            return Err(AppError::Config(
                "strategy.poll_interval_secs must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// REST session parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExchangeConfig {
    pub category: Category,
    /// Signature validity window (milliseconds)
    pub recv_window_ms: u64,
    /// Whole-request timeout (seconds)
    pub http_timeout_secs: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            category: Category::Linear,
            recv_window_ms: 5000,
            http_timeout_secs: 10,
        }
    }
}

impl ExchangeConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.recv_window_ms == 0 {
            return Err(AppError::Config("exchange.recv_window_ms must be > 0".to_string()));
        }
        if self.http_timeout_secs == 0 {
            return Err(AppError::Config(
                "exchange.http_timeout_secs must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Initial selector values in the UI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DefaultsConfig {
    pub symbol: Symbol,
    pub network: Network,
}

/// Root application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub strategy: StrategyConfig,
    pub exchange: ExchangeConfig,
    pub defaults: DefaultsConfig,
}

impl AppConfig {
    /// Validate all configuration rules
    pub fn validate(&self) -> Result<(), AppError> {
        self.strategy.validate()?;
        self.exchange.validate()?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
