//! Monitor loop state: attempt counter, baseline and lifecycle phase

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::notifier::{Direction, NotificationEvent, RateSample};

/// Lifecycle phase of the monitor loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopPhase {
    Idle,
    /// A cycle is executing
    Running,
    /// Waiting for the next cycle
    Scheduled,
    Stopped,
}

impl LoopPhase {
    pub fn is_active(self) -> bool {
        matches!(self, LoopPhase::Running | LoopPhase::Scheduled)
    }
}

impl fmt::Display for LoopPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopPhase::Idle => write!(f, "Idle"),
            LoopPhase::Running => write!(f, "Running"),
            LoopPhase::Scheduled => write!(f, "Scheduled"),
            LoopPhase::Stopped => write!(f, "Stopped"),
        }
    }
}

/// State owned by a single monitor run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorState {
    pub attempt_count: u32,
    pub last_notified_rate: Option<f64>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts_exhausted(&self, max_attempts: u32) -> bool {
        self.attempt_count >= max_attempts
    }

    pub fn record_attempt(&mut self) {
        self.attempt_count += 1;
    }

    /// Decide whether `sample` warrants a notification against the baseline.
    ///
    /// Does not move the baseline; call [`MonitorState::commit`] once the
    /// event has been emitted.
    pub fn evaluate(&self, sample: &RateSample, threshold_delta: f64) -> Option<NotificationEvent> {
        let current = sample.value;
        let (direction, delta) = match self.last_notified_rate {
            None => (Direction::FirstObservation, 0.0),
            Some(last) => {
                let delta = (current - last).abs();
                if delta < threshold_delta {
                    return None;
                }
                let direction = if current > last {
                    Direction::Increased
                } else if current < last {
                    Direction::Decreased
                } else {
                    Direction::Unchanged
                };
                (direction, delta)
            }
        };

        Some(NotificationEvent {
            direction,
            delta,
            current_rate: current,
            previous_rate: self.last_notified_rate,
            observed_at_epoch_ms: sample.observed_at_epoch_ms,
        })
    }

    /// Make `rate` the new baseline
    pub fn commit(&mut self, rate: f64) {
        self.last_notified_rate = Some(rate);
    }
}
