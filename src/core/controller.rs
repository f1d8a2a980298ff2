//! Start/Stop command interface around the trading worker
//!
//! The controller owns the worker's join handle and cancellation token.
//! A new Start always joins the previous worker before trading, so two
//! workers never trade at the same time.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::adapters::ExchangeClient;
use crate::core::events::StatusEvent;
use crate::core::worker::{RunParams, TradingWorker, WorkerSettings, WorkerSummary};
use crate::error::{AppError, Result};

/// Broadcast channel capacity for status events
pub const STATUS_CHANNEL_CAPACITY: usize = 256;

struct ActiveRun {
    cancel: CancellationToken,
    handle: JoinHandle<WorkerSummary>,
}

pub struct TradingController {
    status_tx: broadcast::Sender<StatusEvent>,
    active: Option<ActiveRun>,
}

impl TradingController {
    pub fn new() -> Self {
        let (status_tx, _) = broadcast::channel(STATUS_CHANNEL_CAPACITY);
        Self {
            status_tx,
            active: None,
        }
    }

    /// Observable status stream
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.status_tx.subscribe()
    }

    /// True while a worker exists that has neither finished nor been told to stop
    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .map(|run| !run.handle.is_finished() && !run.cancel.is_cancelled())
            .unwrap_or(false)
    }

    /// Spawn a worker for `exchange`
    ///
    /// Fails with `AlreadyRunning` if a live run exists. A previous run
    /// that was asked to stop is joined inside the new task before the new
    /// worker makes its first call, so this returns without waiting.
    pub fn start<E>(
        &mut self,
        exchange: E,
        params: RunParams,
        settings: WorkerSettings,
    ) -> Result<()>
    where
        E: ExchangeClient + 'static,
    {
        if self.is_running() {
            return Err(AppError::AlreadyRunning);
        }
        let previous = self.active.take();
        if let Some(run) = &previous {
            run.cancel.cancel();
        }

        info!(
            event_type = "RUN_REQUESTED",
            pair = %params.symbol,
            network = %params.network,
            exchange = exchange.exchange_name(),
            joins_previous = previous.is_some(),
            "Starting trading worker"
        );

        let cancel = CancellationToken::new();
        let worker = TradingWorker::new(exchange, params, settings, self.status_tx.clone());
        let worker_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            if let Some(run) = previous {
                join_run(run).await;
            }
            worker.run(worker_cancel).await
        });
        self.active = Some(ActiveRun { cancel, handle });
        Ok(())
    }

    /// Signal the worker to stop without waiting for it
    pub fn request_stop(&self) {
        if let Some(run) = &self.active {
            run.cancel.cancel();
        }
    }

    /// Signal the worker and wait for it to exit
    pub async fn stop(&mut self) -> Option<WorkerSummary> {
        let run = self.active.take()?;
        join_run(run).await
    }
}

async fn join_run(run: ActiveRun) -> Option<WorkerSummary> {
    run.cancel.cancel();
    match run.handle.await {
        Ok(summary) => {
            info!(
                event_type = "RUN_JOINED",
                iterations = summary.iterations,
                orders = summary.orders,
                errors = summary.errors,
                "Trading worker joined"
            );
            Some(summary)
        }
        Err(e) => {
            warn!(error = %e, "Trading worker task failed");
            None
        }
    }
}

impl Default for TradingController {
    fn default() -> Self {
        Self::new()
    }
}
