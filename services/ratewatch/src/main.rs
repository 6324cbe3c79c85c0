//! Ratewatch CLI
//!
//! Runs the rate monitor in the foreground and logs every notification.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratewatch::sinks::TracingSink;
use ratewatch::{load_config, Config, RateWatch};
use tracing::Level;

#[derive(Parser)]
#[command(name = "ratewatch")]
#[command(about = "Exchange rate polling and change notification service")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Delay between polls, e.g. "5s" (overrides config file)
    #[arg(long, value_parser = humantime::parse_duration)]
    interval: Option<Duration>,

    /// Maximum number of polls before stopping (overrides config file)
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Minimum rate change that triggers a notification (overrides config file)
    #[arg(long)]
    threshold: Option<f64>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, interval={:?}, max_attempts={:?}, threshold={:?}, log_level={:?}",
        args.config,
        args.interval,
        args.max_attempts,
        args.threshold,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(interval) = args.interval {
        config.monitor.interval = interval;
    }
    if let Some(max_attempts) = args.max_attempts {
        config.monitor.max_attempts = max_attempts;
    }
    if let Some(threshold) = args.threshold {
        config.monitor.threshold_delta = threshold;
    }

    tracing::info!("Starting ratewatch");
    tracing::debug!(
        "Endpoint: {}, field: {}, interval: {:?}, max attempts: {}, threshold: {}",
        config.endpoint.url,
        config.endpoint.rate_field,
        config.monitor.interval,
        config.monitor.max_attempts,
        config.monitor.threshold_delta
    );

    let sink = Arc::new(TracingSink::new(config.endpoint.label.clone()));
    let mut watch = RateWatch::with_http(config, sink)?;
    watch.start();

    tokio::select! {
        outcome = watch.wait() => {
            if let Some(outcome) = outcome {
                tracing::info!(
                    "Monitor finished after {} attempts ({:?})",
                    outcome.attempts,
                    outcome.reason
                );
            }
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("Shutdown signal received");
            watch.stop();
            watch.wait().await;
        }
    }

    tracing::info!("Ratewatch stopped");
    Ok(())
}
