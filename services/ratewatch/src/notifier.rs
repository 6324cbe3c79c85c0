//! Notification events and the sink trait the host implements

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// How the current rate relates to the last notified one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increased,
    Decreased,
    Unchanged,
    FirstObservation,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Increased => write!(f, "Increased"),
            Direction::Decreased => write!(f, "Decreased"),
            Direction::Unchanged => write!(f, "Unchanged"),
            Direction::FirstObservation => write!(f, "FirstObservation"),
        }
    }
}

/// A rate observed by one successful fetch and parse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSample {
    pub value: f64,
    pub observed_at_epoch_ms: u64,
}

impl RateSample {
    /// Sample stamped with the current wall-clock time
    pub fn now(value: f64) -> Self {
        Self {
            value,
            observed_at_epoch_ms: current_epoch_ms(),
        }
    }
}

/// A rate change worth telling the user about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub direction: Direction,
    /// Absolute change from the previous notified rate, 0 on first observation
    pub delta: f64,
    pub current_rate: f64,
    pub previous_rate: Option<f64>,
    pub observed_at_epoch_ms: u64,
}

/// Receives notification events from the monitor loop.
///
/// Presentation (push notification, toast, log line) is up to the host.
#[async_trait]
pub trait NotificationSink: Send + Sync + std::fmt::Debug {
    async fn on_notification(&self, event: &NotificationEvent) -> crate::Result<()>;
}

pub(crate) fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
