//! Engine: drives the fetch, parse, compare, notify cycle

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::fetcher::RateFetcher;
use crate::notifier::{NotificationEvent, NotificationSink, RateSample};
use crate::parser;
use crate::state::{LoopPhase, MonitorState};

/// Why a monitor run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    AttemptsExhausted,
    Cancelled,
}

/// Summary of a finished monitor run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopOutcome {
    pub attempts: u32,
    pub last_notified_rate: Option<f64>,
    pub reason: StopReason,
}

/// Result of a single cycle
#[derive(Debug)]
pub enum CycleOutcome {
    Notified(NotificationEvent),
    BelowThreshold(RateSample),
    Failed(crate::RateWatchError),
    Cancelled,
}

/// Loop settings taken from [`Config`]
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub url: String,
    pub rate_field: String,
    pub interval: Duration,
    pub max_attempts: u32,
    pub threshold_delta: f64,
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            url: config.endpoint.url.clone(),
            rate_field: config.endpoint.rate_field.clone(),
            interval: config.monitor.interval,
            max_attempts: config.monitor.max_attempts,
            threshold_delta: config.monitor.threshold_delta,
        }
    }
}

/// One monitor run. Consumed by [`Engine::run`].
pub struct Engine {
    fetcher: Arc<dyn RateFetcher>,
    sink: Arc<dyn NotificationSink>,
    settings: EngineSettings,
    phase: Arc<watch::Sender<LoopPhase>>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("settings", &self.settings)
            .field("fetcher", &self.fetcher)
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(
        fetcher: Arc<dyn RateFetcher>,
        sink: Arc<dyn NotificationSink>,
        settings: EngineSettings,
        phase: Arc<watch::Sender<LoopPhase>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            fetcher,
            sink,
            settings,
            phase,
            cancel,
        }
    }

    /// Run cycles until the attempt budget is spent or the token is cancelled
    pub async fn run(self) -> LoopOutcome {
        let mut state = MonitorState::new();
        tracing::debug!(
            "Monitor run started: url={}, interval={:?}, max_attempts={}, threshold={}",
            self.settings.url,
            self.settings.interval,
            self.settings.max_attempts,
            self.settings.threshold_delta
        );

        let reason = loop {
            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }
            if state.attempts_exhausted(self.settings.max_attempts) {
                tracing::info!(
                    "Max attempts ({}) reached, stopping monitor",
                    self.settings.max_attempts
                );
                break StopReason::AttemptsExhausted;
            }

            self.publish(LoopPhase::Running);
            match self.run_cycle(&mut state).await {
                CycleOutcome::Notified(event) => {
                    tracing::debug!(
                        "Attempt {}: notified {} (rate={}, delta={})",
                        state.attempt_count,
                        event.direction,
                        event.current_rate,
                        event.delta
                    );
                }
                CycleOutcome::BelowThreshold(sample) => {
                    tracing::debug!(
                        "Attempt {}: rate {} within threshold of {:?}",
                        state.attempt_count,
                        sample.value,
                        state.last_notified_rate
                    );
                }
                CycleOutcome::Failed(e) => {
                    tracing::warn!("Attempt {} failed: {}", state.attempt_count, e);
                }
                CycleOutcome::Cancelled => {
                    tracing::debug!("Attempt {} abandoned by stop", state.attempt_count);
                    break StopReason::Cancelled;
                }
            }

            self.publish(LoopPhase::Scheduled);
            tokio::select! {
                _ = tokio::time::sleep(self.settings.interval) => {}
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Monitor loop cancelled while waiting");
                    break StopReason::Cancelled;
                }
            }
        };

        self.publish(LoopPhase::Stopped);
        tracing::debug!(
            "Monitor run ended after {} attempts ({:?})",
            state.attempt_count,
            reason
        );

        LoopOutcome {
            attempts: state.attempt_count,
            last_notified_rate: state.last_notified_rate,
            reason,
        }
    }

    /// Execute one cycle against `state`.
    ///
    /// Fetch and parse failures are returned as [`CycleOutcome::Failed`] and
    /// leave the baseline untouched.
    pub async fn run_cycle(&self, state: &mut MonitorState) -> CycleOutcome {
        state.record_attempt();

        let fetched = tokio::select! {
            result = self.fetcher.fetch(&self.settings.url) => result,
            _ = self.cancel.cancelled() => return CycleOutcome::Cancelled,
        };

        let raw = match fetched {
            Ok(raw) => raw,
            Err(e) => return CycleOutcome::Failed(e),
        };
        tracing::debug!("Received payload: {}", raw);

        let rate = match parser::parse_from_payload(&raw, &self.settings.rate_field) {
            Ok(rate) => rate,
            Err(e) => return CycleOutcome::Failed(e),
        };
        let sample = RateSample::now(rate);

        let Some(event) = state.evaluate(&sample, self.settings.threshold_delta) else {
            return CycleOutcome::BelowThreshold(sample);
        };

        if self.cancel.is_cancelled() {
            return CycleOutcome::Cancelled;
        }

        if let Err(e) = self.sink.on_notification(&event).await {
            tracing::warn!("Notification sink failed for rate {}: {}", event.current_rate, e);
        }
        state.commit(event.current_rate);

        CycleOutcome::Notified(event)
    }

    /// Set the phase unless this run has been stopped; the controller owns
    /// the phase once the token is cancelled.
    fn publish(&self, phase: LoopPhase) {
        let cancel = &self.cancel;
        self.phase.send_if_modified(|current| {
            if cancel.is_cancelled() || *current == phase {
                return false;
            }
            *current = phase;
            true
        });
    }
}

/// Fetch and parse once, outside of any run
pub async fn fetch_sample(
    fetcher: &dyn RateFetcher,
    url: &str,
    rate_field: &str,
) -> crate::Result<RateSample> {
    let raw = fetcher.fetch(url).await?;
    let rate = parser::parse_from_payload(&raw, rate_field)?;
    Ok(RateSample::now(rate))
}
