//! TUI Application State
//!
//! Form contents, run flag, and display data shared between the render
//! loop, the status forwarder, and the log layer. Wrapped in
//! Arc<Mutex<>> for safe sharing between tasks.

use std::collections::VecDeque;
use std::time::Instant;

use crate::config::{DefaultsConfig, Network, Symbol};
use crate::core::events::StatusEvent;
use crate::core::worker::RunParams;

/// Maximum number of log entries to keep in memory
pub const MAX_LOG_ENTRIES: usize = 100;

/// Status line shown before the first run
pub const INITIAL_STATUS: &str = "Logs will appear here...";

/// Single log entry for display
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

/// Focusable form fields, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ApiKey,
    ApiSecret,
    Symbol,
    Quantity,
    Network,
}

impl Field {
    const ORDER: [Field; 5] = [
        Field::ApiKey,
        Field::ApiSecret,
        Field::Symbol,
        Field::Quantity,
        Field::Network,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::ApiKey => "API Key",
            Field::ApiSecret => "API Secret",
            Field::Symbol => "Symbol",
            Field::Quantity => "Position Size",
            Field::Network => "Network",
        }
    }
}

/// Central application state shared between TUI and bot tasks
#[derive(Debug)]
pub struct AppState {
    // Form
    pub api_key: String,
    pub api_secret: String,
    pub quantity: String,
    pub symbol_index: usize,
    pub network_index: usize,
    pub focus: Field,

    // Run
    pub running: bool,
    pub status_line: String,
    pub run_started: Option<Instant>,
    /// Set by Start until the new worker reports `Started`
    pub awaiting_start: bool,

    // Stats for the current run
    pub last_price: Option<f64>,
    pub last_ema: Option<f64>,
    pub orders_placed: u32,
    pub error_count: u32,

    // Logs (ring buffer)
    pub recent_logs: VecDeque<LogEntry>,
    pub dropped_logs_count: u64,

    // Control
    pub log_scroll_offset: usize,
    pub show_debug_logs: bool,
}

impl AppState {
    /// Blank form with selectors at the configured defaults
    pub fn new(defaults: &DefaultsConfig) -> Self {
        let symbol_index = Symbol::ALL
            .iter()
            .position(|s| *s == defaults.symbol)
            .unwrap_or(0);
        let network_index = Network::ALL
            .iter()
            .position(|n| *n == defaults.network)
            .unwrap_or(0);

        Self {
            api_key: String::new(),
            api_secret: String::new(),
            quantity: String::new(),
            symbol_index,
            network_index,
            focus: Field::ApiKey,
            running: false,
            status_line: INITIAL_STATUS.to_string(),
            run_started: None,
            awaiting_start: false,
            last_price: None,
            last_ema: None,
            orders_placed: 0,
            error_count: 0,
            recent_logs: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            dropped_logs_count: 0,
            log_scroll_offset: 0,
            show_debug_logs: false,
        }
    }

    pub fn symbol(&self) -> Symbol {
        Symbol::ALL[self.symbol_index % Symbol::ALL.len()]
    }

    pub fn network(&self) -> Network {
        Network::ALL[self.network_index % Network::ALL.len()]
    }

    /// Add a log entry with automatic rotation
    pub fn push_log(&mut self, entry: LogEntry) {
        if self.recent_logs.len() >= MAX_LOG_ENTRIES {
            self.recent_logs.pop_front();
        }
        self.recent_logs.push_back(entry);
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::ApiKey => Some(&mut self.api_key),
            Field::ApiSecret => Some(&mut self.api_secret),
            Field::Quantity => Some(&mut self.quantity),
            Field::Symbol | Field::Network => None,
        }
    }

    /// Type into the focused text field; selectors ignore input
    pub fn insert_char(&mut self, c: char) {
        if let Some(text) = self.focused_text_mut() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text_mut() {
            text.pop();
        }
    }

    /// Cycle the focused selector; text fields ignore it
    pub fn cycle_selector(&mut self, forward: bool) {
        let (index, len) = match self.focus {
            Field::Symbol => (&mut self.symbol_index, Symbol::ALL.len()),
            Field::Network => (&mut self.network_index, Network::ALL.len()),
            _ => return,
        };
        *index = if forward {
            (*index + 1) % len
        } else {
            (*index + len - 1) % len
        };
    }

    /// Start is enabled when idle
    pub fn can_start(&self) -> bool {
        !self.running
    }

    /// Stop is enabled when running
    pub fn can_stop(&self) -> bool {
        self.running
    }

    /// Flip to running and capture the form
    ///
    /// Returns the trimmed credentials alongside the run parameters.
    pub fn begin_run(&mut self) -> (String, String, RunParams) {
        self.running = true;
        self.run_started = Some(Instant::now());
        self.awaiting_start = true;
        self.last_price = None;
        self.last_ema = None;
        self.orders_placed = 0;
        self.error_count = 0;

        let params = RunParams {
            symbol: self.symbol(),
            quantity: self.quantity.trim().to_string(),
            network: self.network(),
        };
        (
            self.api_key.trim().to_string(),
            self.api_secret.trim().to_string(),
            params,
        )
    }

    /// Flip to idle and show the stop confirmation
    pub fn end_run(&mut self) {
        self.running = false;
        self.run_started = None;
        self.awaiting_start = false;
        self.status_line = StatusEvent::Stopped.to_string();
    }

    /// Back to idle after a Start the controller refused
    pub fn abort_run(&mut self, reason: &str) {
        self.running = false;
        self.run_started = None;
        self.awaiting_start = false;
        self.status_line = StatusEvent::Error(reason.to_string()).to_string();
    }

    /// Mirror a worker status event into the display
    ///
    /// After Start, events still draining from the previous worker are
    /// dropped until the new worker's `Started` arrives.
    pub fn apply_status(&mut self, event: &StatusEvent) {
        if self.awaiting_start {
            if !matches!(event, StatusEvent::Started { .. }) {
                return;
            }
            self.awaiting_start = false;
        }
        match event {
            StatusEvent::Tick { price, ema, .. } => {
                self.last_price = Some(*price);
                self.last_ema = Some(*ema);
            }
            StatusEvent::OrderPlaced { .. } => self.orders_placed += 1,
            StatusEvent::Error(_) => self.error_count += 1,
            StatusEvent::Started { .. } | StatusEvent::NoSignal | StatusEvent::Stopped => {}
        }
        // A previous worker's exit must not overwrite a newer run's status
        if matches!(event, StatusEvent::Stopped) && self.running {
            return;
        }
        self.status_line = event.to_string();
    }

    /// Secret rendered as bullets
    pub fn masked_secret(&self) -> String {
        "•".repeat(self.api_secret.chars().count())
    }

    /// Get formatted run time string
    pub fn uptime_str(&self) -> String {
        let Some(started) = self.run_started else {
            return "-".to_string();
        };
        let elapsed = started.elapsed();
        let hours = elapsed.as_secs() / 3600;
        let minutes = (elapsed.as_secs() % 3600) / 60;
        format!("{}h{:02}m", hours, minutes)
    }
}
