//! Configuration types for the ratewatch service

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Where the rate comes from and which field carries it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_url")]
    pub url: String,
    /// Field holding the rate. Dotted paths address nested objects.
    #[serde(default = "default_rate_field")]
    pub rate_field: String,
    /// Label used by the `"<LABEL>: <number>"` display format
    #[serde(default = "default_label")]
    pub label: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            rate_field: default_rate_field(),
            label: default_label(),
        }
    }
}

/// Polling loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_threshold_delta")]
    pub threshold_delta: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            max_attempts: default_max_attempts(),
            threshold_delta: default_threshold_delta(),
        }
    }
}

impl Config {
    /// Reject settings the monitor loop cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.endpoint.url.trim().is_empty() {
            return Err(crate::RateWatchError::Config(
                "endpoint.url must not be empty".to_string(),
            ));
        }
        if self.endpoint.rate_field.trim().is_empty() {
            return Err(crate::RateWatchError::Config(
                "endpoint.rate_field must not be empty".to_string(),
            ));
        }
        if self.monitor.interval.is_zero() {
            return Err(crate::RateWatchError::Config(
                "monitor.interval must be greater than zero".to_string(),
            ));
        }
        let threshold = self.monitor.threshold_delta;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(crate::RateWatchError::Config(format!(
                "monitor.threshold_delta must be a non-negative number, got {}",
                threshold
            )));
        }
        Ok(())
    }
}

fn default_url() -> String {
    "https://min-api.cryptocompare.com/data/price?fsym=BTC&tsyms=USD,EUR".to_string()
}

fn default_rate_field() -> String {
    "EUR".to_string()
}

fn default_label() -> String {
    "EUR".to_string()
}

fn default_interval() -> Duration {
    Duration::from_millis(5000)
}

fn default_max_attempts() -> u32 {
    100
}

fn default_threshold_delta() -> f64 {
    1.0
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::RateWatchError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
