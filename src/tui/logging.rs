//! Custom tracing Layer for TUI log capture
//!
//! Captures log events and pushes them to AppState for display.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use super::app::{AppState, LogEntry};

/// Tracks whether DEBUG logs are shown, readable without the AppState lock
static SHOW_DEBUG: AtomicBool = AtomicBool::new(false);

/// Logs dropped due to lock contention, synced into
/// `AppState.dropped_logs_count` when the lock is next acquired.
static DROPPED_LOGS: AtomicU64 = AtomicU64::new(0);

/// Structured fields appended to the displayed message
const DISPLAY_FIELDS: [&str; 5] = ["event_type", "pair", "direction", "order_id", "error"];

/// Update the global DEBUG filter flag (called when toggling from the keyboard).
pub fn set_show_debug(enabled: bool) {
    SHOW_DEBUG.store(enabled, Ordering::Relaxed);
}

/// Layer that captures logs for TUI display.
///
/// `on_event()` MUST use `try_lock()`, never `lock()`: events can fire
/// while the render loop holds the AppState lock, and blocking there
/// would deadlock. Contended logs are counted and dropped.
pub struct TuiLayer {
    app_state: Arc<Mutex<AppState>>,
}

impl TuiLayer {
    pub fn new(app_state: Arc<Mutex<AppState>>) -> Self {
        Self { app_state }
    }
}

impl<S: Subscriber> Layer<S> for TuiLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = event.metadata().level();

        if *level == tracing::Level::DEBUG && !SHOW_DEBUG.load(Ordering::Relaxed) {
            return;
        }

        let mut message = String::new();
        let mut extra_fields = Vec::new();
        let mut visitor = MessageVisitor {
            message: &mut message,
            extra_fields: &mut extra_fields,
        };
        event.record(&mut visitor);

        if !extra_fields.is_empty() {
            message.push_str(" [");
            message.push_str(&extra_fields.join(", "));
            message.push(']');
        }

        let entry = LogEntry {
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            level: level.to_string(),
            message,
        };

        match self.app_state.try_lock() {
            Ok(mut state) => {
                let dropped = DROPPED_LOGS.swap(0, Ordering::Relaxed);
                if dropped > 0 {
                    state.dropped_logs_count += dropped;
                }
                state.push_log(entry);
            }
            Err(_) => {
                DROPPED_LOGS.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Visitor to extract message and key structured fields from tracing events
struct MessageVisitor<'a> {
    message: &'a mut String,
    extra_fields: &'a mut Vec<String>,
}

impl<'a> tracing::field::Visit for MessageVisitor<'a> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = format!("{:?}", value).trim_matches('"').to_string();
        } else if DISPLAY_FIELDS.contains(&field.name()) {
            self.extra_fields.push(format!("{}={:?}", field.name(), value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            *self.message = value.to_string();
        } else if DISPLAY_FIELDS.contains(&field.name()) {
            self.extra_fields.push(format!("{}={}", field.name(), value));
        }
    }
}
