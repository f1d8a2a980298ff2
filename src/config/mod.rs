//! Configuration module for bot settings and YAML loading
//!
//! This module provides:
//! - Configuration types (`AppConfig`, `StrategyConfig`, `ExchangeConfig`)
//! - Selector enums (`Symbol`, `Network`)
//! - YAML loading functionality (`load_config`)
//! - Logging configuration (`init_logging`)

mod loader;
pub mod logging;
mod types;

// Re-export types
pub use types::{AppConfig, DefaultsConfig, ExchangeConfig, Network, StrategyConfig, Symbol};

// Re-export loader functions
pub use loader::{load_config, load_config_from_str, load_config_or_default};

// Re-export logging functions
pub use logging::{init_logging, is_tui_mode, LogFormat};
