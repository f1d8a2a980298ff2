//! Async keyboard event handling for TUI
//!
//! Uses crossterm's EventStream for non-blocking, async-compatible input.
//! Start/Stop are returned to the caller, which owns the controller.

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use std::sync::{Arc, Mutex};
use tracing::warn;

use super::app::AppState;

/// Result of processing a single event poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Continue the TUI loop
    Continue,
    /// User requested quit
    Quit,
    /// Start pressed while idle
    Start,
    /// Stop pressed while running
    Stop,
}

/// Poll for keyboard events asynchronously with a timeout.
///
/// I/O errors are logged as warnings rather than silently swallowed.
pub async fn handle_events_async(
    app_state: &Arc<Mutex<AppState>>,
    event_stream: &mut EventStream,
) -> EventResult {
    let maybe_event =
        tokio::time::timeout(std::time::Duration::from_millis(50), event_stream.next()).await;

    match maybe_event {
        // Timeout elapsed — no input
        Err(_) => EventResult::Continue,
        // Stream ended (terminal closed)
        Ok(None) => EventResult::Quit,
        Ok(Some(Err(e))) => {
            warn!(
                event_type = "TERMINAL_IO_ERROR",
                error = %e,
                "Terminal I/O error during event polling"
            );
            EventResult::Continue
        }
        // Windows reports releases too
        Ok(Some(Ok(Event::Key(key)))) if key.kind == KeyEventKind::Press => {
            process_key_event(key.code, key.modifiers, app_state)
        }
        Ok(Some(Ok(_))) => EventResult::Continue,
    }
}

/// Process a single key event and update state accordingly
pub fn process_key_event(
    code: KeyCode,
    modifiers: KeyModifiers,
    app_state: &Arc<Mutex<AppState>>,
) -> EventResult {
    let Ok(mut state) = app_state.lock() else {
        return EventResult::Continue;
    };

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') | KeyCode::Char('q') => EventResult::Quit,
            KeyCode::Char('l') => {
                state.show_debug_logs = !state.show_debug_logs;
                super::logging::set_show_debug(state.show_debug_logs);
                EventResult::Continue
            }
            _ => EventResult::Continue,
        };
    }

    match code {
        KeyCode::Tab => state.focus_next(),
        KeyCode::BackTab => state.focus_prev(),
        KeyCode::Left => state.cycle_selector(false),
        KeyCode::Right => state.cycle_selector(true),
        KeyCode::Backspace => state.backspace(),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::ALT) => state.insert_char(c),

        KeyCode::Enter if state.can_start() => return EventResult::Start,
        KeyCode::Esc if state.can_stop() => return EventResult::Stop,

        // Scroll logs
        KeyCode::PageDown => {
            state.log_scroll_offset = state.log_scroll_offset.saturating_sub(1);
        }
        KeyCode::PageUp => {
            let max_offset = state.recent_logs.len().saturating_sub(1);
            if state.log_scroll_offset < max_offset {
                state.log_scroll_offset += 1;
            }
        }
        _ => {}
    }
    EventResult::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultsConfig;
    use crate::tui::app::{Field, LogEntry};

    fn state() -> Arc<Mutex<AppState>> {
        Arc::new(Mutex::new(AppState::new(&DefaultsConfig::default())))
    }

    fn press(state: &Arc<Mutex<AppState>>, code: KeyCode) -> EventResult {
        process_key_event(code, KeyModifiers::empty(), state)
    }

    #[test]
    fn test_process_quit_ctrl_c_and_ctrl_q() {
        for key in ['c', 'q'] {
            let state = state();
            let result = process_key_event(KeyCode::Char(key), KeyModifiers::CONTROL, &state);
            assert_eq!(result, EventResult::Quit);
            assert!(state.lock().unwrap().api_key.is_empty());
        }
    }

    #[test]
    fn test_plain_q_is_text_input() {
        let state = state();
        assert_eq!(press(&state, KeyCode::Char('q')), EventResult::Continue);
        assert_eq!(state.lock().unwrap().api_key, "q");
    }

    #[test]
    fn test_shifted_chars_are_typed() {
        let state = state();
        process_key_event(KeyCode::Char('K'), KeyModifiers::SHIFT, &state);
        assert_eq!(state.lock().unwrap().api_key, "K");
    }

    #[test]
    fn test_tab_cycles_focus() {
        let state = state();
        press(&state, KeyCode::Tab);
        press(&state, KeyCode::Tab);
        assert_eq!(state.lock().unwrap().focus, Field::Symbol);
        press(&state, KeyCode::BackTab);
        assert_eq!(state.lock().unwrap().focus, Field::ApiSecret);
    }

    #[test]
    fn test_arrows_cycle_selector() {
        let state = state();
        state.lock().unwrap().focus = Field::Network;
        press(&state, KeyCode::Right);
        assert!(!state.lock().unwrap().network().is_testnet());
        press(&state, KeyCode::Left);
        assert!(state.lock().unwrap().network().is_testnet());
    }

    #[test]
    fn test_enter_starts_only_when_idle() {
        let state = state();
        assert_eq!(press(&state, KeyCode::Enter), EventResult::Start);

        state.lock().unwrap().running = true;
        assert_eq!(press(&state, KeyCode::Enter), EventResult::Continue);
    }

    #[test]
    fn test_esc_stops_only_when_running() {
        let state = state();
        assert_eq!(press(&state, KeyCode::Esc), EventResult::Continue);

        state.lock().unwrap().running = true;
        assert_eq!(press(&state, KeyCode::Esc), EventResult::Stop);
    }

    #[test]
    fn test_process_scroll() {
        let state = state();
        {
            let mut s = state.lock().unwrap();
            for i in 0..5 {
                s.push_log(LogEntry {
                    timestamp: "12:00:00".into(),
                    level: "INFO".into(),
                    message: format!("{}", i),
                });
            }
            s.log_scroll_offset = 3;
        }

        press(&state, KeyCode::PageDown);
        assert_eq!(state.lock().unwrap().log_scroll_offset, 2);
        press(&state, KeyCode::PageUp);
        press(&state, KeyCode::PageUp);
        press(&state, KeyCode::PageUp);
        assert_eq!(state.lock().unwrap().log_scroll_offset, 4);
    }

    #[test]
    fn test_debug_toggle() {
        let state = state();
        process_key_event(KeyCode::Char('l'), KeyModifiers::CONTROL, &state);
        assert!(state.lock().unwrap().show_debug_logs);
        assert!(state.lock().unwrap().api_key.is_empty());
        process_key_event(KeyCode::Char('l'), KeyModifiers::CONTROL, &state);
        assert!(!state.lock().unwrap().show_debug_logs);
    }
}
