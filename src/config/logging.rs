//! Logging configuration module
//!
//! Provides configurable TUI/JSON/Pretty logging output
//!
//! # Environment Variables
//! - `LOG_FORMAT`: Output format - `tui` (default), `pretty`, or `json`
//! - `RUST_LOG`: Log level filter (default: `info`)

use tracing_subscriber::EnvFilter;

/// Output format selected by `LOG_FORMAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Interactive terminal UI; logs go to the log panel
    Tui,
    /// Human-readable headless output
    Pretty,
    /// Machine-parseable headless output
    Json,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value; anything unrecognised selects the TUI
    pub fn parse(value: &str) -> Self {
        match value {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => LogFormat::Tui,
        }
    }

    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|f| Self::parse(&f))
            .unwrap_or(LogFormat::Tui)
    }
}

/// Check if TUI mode is requested
///
/// When TUI mode is requested, caller should initialize logging manually
/// with the TuiLayer.
pub fn is_tui_mode() -> bool {
    LogFormat::from_env() == LogFormat::Tui
}

/// Default filter used when `RUST_LOG` is unset or invalid
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize headless logging
///
/// - `json`: Machine-parseable JSON output
/// - `pretty`: Human-readable output
/// - `tui`: Skip initialization (caller sets up TuiLayer manually)
pub fn init_logging() {
    match LogFormat::from_env() {
        LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .pretty()
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .json()
                .init();
        }
        LogFormat::Tui => {
            // The TUI owns the terminal; a fmt subscriber here would draw over it.
            debug_assert!(
                false,
                "init_logging() called in TUI mode; the caller installs TuiLayer instead"
            );
        }
    }
}
