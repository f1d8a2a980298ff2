//! TUI UI Rendering
//!
//! Renders the terminal UI using ratatui with 5 zones:
//! - Header: symbol, network, run state
//! - Form: credentials, symbol, position size, network
//! - Controls: Start / Stop
//! - Status: latest worker status line and run stats
//! - Logs: scrollable log entries

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::app::{AppState, Field};

/// Main draw function - renders the entire UI
pub fn draw(frame: &mut Frame, state: &AppState) {
    // Minimum terminal height: 3+7+3+4+6 = 23 rows
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(7), // Form
            Constraint::Length(3), // Controls
            Constraint::Length(4), // Status
            Constraint::Min(6),    // Logs
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);
    draw_form(frame, chunks[1], state);
    draw_controls(frame, chunks[2], state);
    draw_status(frame, chunks[3], state);
    draw_logs(frame, chunks[4], state);
}

fn draw_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let (run_text, run_color) = if state.running {
        ("● RUNNING", Color::Green)
    } else {
        ("○ IDLE", Color::DarkGray)
    };
    let network_color = if state.network().is_testnet() {
        Color::Yellow
    } else {
        Color::Red
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            state.symbol().as_str(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  │  Network: "),
        Span::styled(state.network().to_string(), Style::default().fg(network_color)),
        Span::raw("  │  "),
        Span::styled(
            run_text,
            Style::default().fg(run_color).add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL).title("EMA Bot"));

    frame.render_widget(header, area);
}

fn form_line<'a>(state: &AppState, field: Field, value: String, selector: bool) -> Line<'a> {
    let focused = state.focus == field;
    let label_style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let marker = if focused { "▶ " } else { "  " };

    let value = if selector {
        format!("◀ {} ▶", value)
    } else if focused {
        format!("{}▏", value)
    } else {
        value
    };

    Line::from(vec![
        Span::styled(marker, label_style),
        Span::styled(format!("{:<14}", field.label()), label_style),
        Span::styled(value, Style::default().fg(Color::Yellow)),
    ])
}

fn draw_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let lines = vec![
        form_line(state, Field::ApiKey, state.api_key.clone(), false),
        form_line(state, Field::ApiSecret, state.masked_secret(), false),
        form_line(state, Field::Symbol, state.symbol().to_string(), true),
        form_line(state, Field::Quantity, state.quantity.clone(), false),
        form_line(state, Field::Network, state.network().to_string(), true),
    ];

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Settings (Tab/Shift+Tab move, ←/→ select)"),
    );
    frame.render_widget(form, area);
}

fn button(label: &str, enabled: bool, color: Color) -> Span<'_> {
    let style = if enabled {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(label, style)
}

fn draw_controls(frame: &mut Frame, area: Rect, state: &AppState) {
    let controls = Paragraph::new(Line::from(vec![
        button("[ Start (Enter) ]", state.can_start(), Color::Green),
        Span::raw("   "),
        button("[ Stop (Esc) ]", state.can_stop(), Color::Red),
        Span::styled("   Ctrl+Q quit", Style::default().fg(Color::DarkGray)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}

fn draw_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let fmt = |v: Option<f64>| {
        v.map(|p| format!("{:.4}", p))
            .unwrap_or_else(|| "-".to_string())
    };
    let error_color = if state.error_count > 0 {
        Color::Red
    } else {
        Color::White
    };

    let line1 = Line::from(Span::styled(
        state.status_line.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    let line2 = Line::from(vec![
        Span::raw("Price: "),
        Span::styled(fmt(state.last_price), Style::default().fg(Color::Yellow)),
        Span::raw("  │  EMA: "),
        Span::styled(fmt(state.last_ema), Style::default().fg(Color::Cyan)),
        Span::raw("  │  Orders: "),
        Span::styled(
            state.orders_placed.to_string(),
            Style::default().fg(Color::White),
        ),
        Span::raw("  │  Errors: "),
        Span::styled(state.error_count.to_string(), Style::default().fg(error_color)),
        Span::raw("  │  Uptime: "),
        Span::styled(state.uptime_str(), Style::default().fg(Color::Cyan)),
    ]);

    let status = Paragraph::new(vec![line1, line2])
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, area);
}

/// Draw scrollable log panel
fn draw_logs(frame: &mut Frame, area: Rect, state: &AppState) {
    let log_items: Vec<ListItem> = state
        .recent_logs
        .iter()
        .rev() // Most recent first
        .skip(state.log_scroll_offset)
        .take(area.height.saturating_sub(2) as usize)
        .map(|entry| {
            let level_color = match entry.level.as_str() {
                "ERROR" => Color::Red,
                "WARN" => Color::Yellow,
                "INFO" => Color::Cyan,
                "DEBUG" => Color::DarkGray,
                _ => Color::White,
            };

            ListItem::new(Line::from(vec![
                Span::styled(&entry.timestamp, Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::styled(
                    format!("{:5}", entry.level),
                    Style::default().fg(level_color),
                ),
                Span::raw(" "),
                Span::raw(&entry.message),
            ]))
        })
        .collect();

    let debug_indicator = if state.show_debug_logs {
        " [DEBUG ON]"
    } else {
        ""
    };
    let dropped = if state.dropped_logs_count > 0 {
        format!(" [{} dropped]", state.dropped_logs_count)
    } else {
        String::new()
    };
    let title = format!(
        "Logs (PgUp/PgDn scroll, Ctrl+L=debug){}{}",
        debug_indicator, dropped
    );

    let logs = List::new(log_items).block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(logs, area);
}
