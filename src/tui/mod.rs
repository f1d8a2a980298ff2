//! TUI Module for EMA Bot
//!
//! Terminal form for credentials and run settings, with Start/Stop
//! controls, a status line, and a captured log panel. Active when
//! LOG_FORMAT=tui (the default).
//!
//! # Keyboard Controls
//! - `Tab` / `Shift+Tab`: Move between fields
//! - `←/→`: Cycle symbol and network
//! - `Enter`: Start, `Esc`: Stop
//! - `PgUp/PgDn`: Scroll logs
//! - `Ctrl+L`: Toggle DEBUG logs
//! - `Ctrl+C` or `Ctrl+Q`: Quit

pub mod app;
pub mod event;
pub mod logging;
pub mod ui;

pub use app::{AppState, Field, LogEntry, MAX_LOG_ENTRIES};
pub use event::{handle_events_async, EventResult};
pub use logging::TuiLayer;
