//! EMA Bot — Entry Point
//!
//! Orchestrates:
//! 1. Config + environment loading
//! 2. Logging (TUI layer or headless fmt)
//! 3. Trading controller + status forwarding
//! 4. TUI loop, or headless run until Ctrl+C
//! 5. Graceful shutdown (worker joined before exit)

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use crossterm::event::EventStream;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use ema_bot::adapters::{BybitAdapter, BybitConfig};
use ema_bot::config::logging::env_filter;
use ema_bot::config::{
    init_logging, is_tui_mode, load_config_or_default, AppConfig, Network, Symbol,
};
use ema_bot::core::{RunParams, StatusEvent, TradingController, WorkerSettings};
use ema_bot::tui::{self, AppState, EventResult, TuiLayer};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // =========================================================================
    // 1. Config + environment
    // =========================================================================
    dotenvy::dotenv().ok();

    let config_path = std::env::var("CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = load_config_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    if is_tui_mode() {
        run_tui(config).await
    } else {
        run_headless(config).await
    }
}

fn build_adapter(
    config: &AppConfig,
    api_key: &str,
    api_secret: &str,
    params: &RunParams,
) -> BybitAdapter {
    let bybit = BybitConfig::new(api_key, api_secret, params.network)
        .with_exchange_config(&config.exchange);
    BybitAdapter::new(bybit, config.exchange.http_timeout())
}

fn apply_status(app_state: &Mutex<AppState>, event: &StatusEvent) {
    if let Ok(mut state) = app_state.lock() {
        state.apply_status(event);
    }
}

/// Mirror worker status events into the TUI state until the channel closes
async fn forward_status(
    mut rx: broadcast::Receiver<StatusEvent>,
    app_state: Arc<Mutex<AppState>>,
) {
    loop {
        match rx.recv().await {
            Ok(event) => apply_status(&app_state, &event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Status forwarder lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

// =============================================================================
// TUI mode
// =============================================================================

async fn run_tui(config: AppConfig) -> anyhow::Result<()> {
    let app_state = Arc::new(Mutex::new(AppState::new(&config.defaults)));

    // Prefill the form from the environment
    if let Ok(mut state) = app_state.lock() {
        state.api_key = std::env::var("BYBIT_API_KEY").unwrap_or_default();
        state.api_secret = std::env::var("BYBIT_API_SECRET").unwrap_or_default();
        if std::env::var("BYBIT_TESTNET").is_ok() {
            let network = ema_bot::adapters::bybit::config::network_from_env();
            state.network_index = Network::ALL
                .iter()
                .position(|n| *n == network)
                .unwrap_or(0);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter())
        .with(TuiLayer::new(Arc::clone(&app_state)))
        .init();

    info!(config = %config_path_label(), "=== EMA Bot ===");

    let settings = WorkerSettings::from_config(&config);
    let mut controller = TradingController::new();
    let forwarder = tokio::spawn(forward_status(controller.subscribe(), Arc::clone(&app_state)));

    let mut terminal = ratatui::init();
    let mut events = EventStream::new();

    let loop_result: anyhow::Result<()> = async {
        loop {
            {
                let state = app_state
                    .lock()
                    .map_err(|_| anyhow::anyhow!("TUI state lock poisoned"))?;
                terminal.draw(|frame| tui::ui::draw(frame, &state))?;
            }

            match tui::handle_events_async(&app_state, &mut events).await {
                EventResult::Continue => {}
                EventResult::Quit => break,
                EventResult::Start => {
                    let snapshot = app_state.lock().ok().map(|mut state| state.begin_run());
                    let Some((api_key, api_secret, params)) = snapshot else {
                        continue;
                    };
                    let adapter = build_adapter(&config, &api_key, &api_secret, &params);
                    if let Err(e) = controller.start(adapter, params, settings.clone()) {
                        error!(error = %e, "Could not start trading");
                        if let Ok(mut state) = app_state.lock() {
                            state.abort_run(&e.to_string());
                        }
                    }
                }
                EventResult::Stop => {
                    controller.request_stop();
                    if let Ok(mut state) = app_state.lock() {
                        state.end_run();
                    }
                }
            }
        }
        Ok(())
    }
    .await;

    // =========================================================================
    // Shutdown: restore the terminal before anything else can fail
    // =========================================================================
    ratatui::restore();

    if let Some(summary) = controller.stop().await {
        info!(
            iterations = summary.iterations,
            orders = summary.orders,
            errors = summary.errors,
            "Final run summary"
        );
    }
    drop(controller);
    forwarder.abort();

    loop_result
}

fn config_path_label() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

// =============================================================================
// Headless mode
// =============================================================================

async fn run_headless(config: AppConfig) -> anyhow::Result<()> {
    init_logging();
    info!(config = %config_path_label(), "=== EMA Bot (headless) ===");

    let bybit = BybitConfig::from_env()
        .context("headless mode needs BYBIT_API_KEY and BYBIT_API_SECRET")?;

    let symbol = match std::env::var("BYBIT_SYMBOL") {
        Ok(raw) => Symbol::parse(&raw)
            .ok_or_else(|| anyhow::anyhow!("unsupported BYBIT_SYMBOL: {}", raw))?,
        Err(_) => config.defaults.symbol,
    };
    let quantity = std::env::var("BYBIT_QTY").context("headless mode needs BYBIT_QTY")?;

    let params = RunParams {
        symbol,
        quantity,
        network: bybit.network,
    };
    let adapter = build_adapter(&config, &bybit.api_key, &bybit.api_secret, &params);

    let mut controller = TradingController::new();
    controller.start(adapter, params, WorkerSettings::from_config(&config))?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    if let Some(summary) = controller.stop().await {
        info!(
            iterations = summary.iterations,
            orders = summary.orders,
            errors = summary.errors,
            "Final run summary"
        );
    }
    Ok(())
}
