//! Host-side notification sinks

use std::sync::OnceLock;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::notifier::{Direction, NotificationEvent, NotificationSink};

const CHANNEL_NAME: &str = "Rate Change Notifications";

/// Human-readable text for an event
pub fn describe(event: &NotificationEvent, label: &str) -> String {
    match event.direction {
        Direction::FirstObservation => {
            format!("Received {} rate: {}", label, event.current_rate)
        }
        Direction::Increased => format!(
            "{} rate increased by {} to {}",
            label, event.delta, event.current_rate
        ),
        Direction::Decreased => format!(
            "{} rate decreased by {} to {}",
            label, event.delta, event.current_rate
        ),
        Direction::Unchanged => format!("{} rate unchanged at {}", label, event.current_rate),
    }
}

/// Writes each event to the log
#[derive(Debug)]
pub struct TracingSink {
    label: String,
    channel_ready: OnceLock<()>,
}

impl TracingSink {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            channel_ready: OnceLock::new(),
        }
    }

    /// Register the notification channel on first use. Returns true only for
    /// the call that performed the registration.
    fn ensure_channel(&self) -> bool {
        let mut registered = false;
        self.channel_ready.get_or_init(|| {
            tracing::info!("Notification channel '{}' registered", CHANNEL_NAME);
            registered = true;
        });
        registered
    }
}

#[async_trait]
impl NotificationSink for TracingSink {
    async fn on_notification(&self, event: &NotificationEvent) -> crate::Result<()> {
        self.ensure_channel();
        tracing::info!("[{}] {}", CHANNEL_NAME, describe(event, &self.label));
        Ok(())
    }
}

/// Forwards events to a channel the host reads from
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<NotificationEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<NotificationEvent>) -> Self {
        Self { tx }
    }

    /// Sink plus the receiving half
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<NotificationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl NotificationSink for ChannelSink {
    async fn on_notification(&self, event: &NotificationEvent) -> crate::Result<()> {
        self.tx
            .send(event.clone())
            .map_err(|_| crate::RateWatchError::Sink("notification receiver dropped".to_string()))
    }
}
