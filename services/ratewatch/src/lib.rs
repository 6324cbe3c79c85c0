//! Ratewatch - exchange rate polling and change notification
//!
//! Polls a rate endpoint, compares each rate against the last one reported,
//! and hands threshold-crossing changes to a [`NotificationSink`].

pub mod config;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod io;
pub mod notifier;
pub mod parser;
pub mod sinks;
pub mod state;

pub use config::{load_config, Config};
pub use engine::{LoopOutcome, StopReason};
pub use error::{RateWatchError, Result};
pub use notifier::{Direction, NotificationEvent, NotificationSink, RateSample};
pub use state::LoopPhase;

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::engine::{Engine, EngineSettings};
use crate::fetcher::{HttpRateFetcher, RateFetcher};
use crate::io::ReqwestHttpClient;

struct ActiveRun {
    cancel: CancellationToken,
    task: JoinHandle<LoopOutcome>,
}

/// Start/stop surface for the monitor loop.
///
/// Each `start` after a stop begins a fresh run with a reset attempt counter
/// and no baseline.
pub struct RateWatch {
    config: Config,
    fetcher: Arc<dyn RateFetcher>,
    sink: Arc<dyn NotificationSink>,
    phase: Arc<watch::Sender<LoopPhase>>,
    run: Option<ActiveRun>,
}

impl std::fmt::Debug for RateWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateWatch")
            .field("config", &self.config)
            .field("sink", &self.sink)
            .field("phase", &*self.phase.borrow())
            .finish_non_exhaustive()
    }
}

impl RateWatch {
    /// Build a monitor. Fails if `config` does not pass [`Config::validate`].
    pub fn new(
        config: Config,
        fetcher: Arc<dyn RateFetcher>,
        sink: Arc<dyn NotificationSink>,
    ) -> crate::Result<Self> {
        config.validate()?;
        let (phase, _) = watch::channel(LoopPhase::Idle);
        Ok(Self {
            config,
            fetcher,
            sink,
            phase: Arc::new(phase),
            run: None,
        })
    }

    /// Monitor backed by the production reqwest client
    pub fn with_http(config: Config, sink: Arc<dyn NotificationSink>) -> crate::Result<Self> {
        let fetcher = Arc::new(HttpRateFetcher::new(Arc::new(ReqwestHttpClient::new())));
        Self::new(config, fetcher, sink)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Begin polling. No-op while a run is active.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        if self.is_running() {
            tracing::debug!("Start requested but monitor is already running");
            return;
        }

        let cancel = CancellationToken::new();
        let engine = Engine::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.sink),
            EngineSettings::from(&self.config),
            Arc::clone(&self.phase),
            cancel.clone(),
        );

        self.phase.send_replace(LoopPhase::Running);
        let task = tokio::spawn(engine.run());
        self.run = Some(ActiveRun { cancel, task });
        tracing::info!("Rate monitor started for {}", self.config.endpoint.url);
    }

    /// Stop polling. No-op if nothing is running.
    pub fn stop(&mut self) {
        let Some(run) = &self.run else {
            tracing::debug!("Stop requested but monitor is not running");
            return;
        };
        if run.cancel.is_cancelled() {
            tracing::debug!("Stop requested but monitor is already stopped");
            return;
        }

        run.cancel.cancel();
        self.phase.send_replace(LoopPhase::Stopped);
        tracing::info!("Rate monitor stopped");
    }

    /// True while a run is cycling or waiting for its next cycle
    pub fn is_running(&self) -> bool {
        match &self.run {
            Some(run) => {
                !run.cancel.is_cancelled() && !run.task.is_finished() && self.phase().is_active()
            }
            None => false,
        }
    }

    pub fn phase(&self) -> LoopPhase {
        *self.phase.borrow()
    }

    /// Observe phase changes, e.g. to keep a UI toggle in sync
    pub fn subscribe(&self) -> watch::Receiver<LoopPhase> {
        self.phase.subscribe()
    }

    /// Wait for the current run to finish. Returns `None` if there was no run
    /// or the run task panicked.
    pub async fn wait(&mut self) -> Option<LoopOutcome> {
        let run = self.run.as_mut()?;
        let result = (&mut run.task).await;
        self.run = None;
        match result {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::error!("Monitor task failed: {}", e);
                None
            }
        }
    }

    /// Fetch and parse once without touching the running loop
    pub async fn check_now(&self) -> crate::Result<RateSample> {
        engine::fetch_sample(
            self.fetcher.as_ref(),
            &self.config.endpoint.url,
            &self.config.endpoint.rate_field,
        )
        .await
    }
}

impl Drop for RateWatch {
    fn drop(&mut self) {
        if let Some(run) = &self.run {
            run.cancel.cancel();
        }
    }
}
