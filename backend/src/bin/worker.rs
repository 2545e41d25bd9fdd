//! Social Ops background worker.
//!
//! Placeholder loop: no job types are defined yet, so each tick only reports
//! that it is alive.
//!
//! # Environment Variables
//!
//! - `REDIS_URL`: Queue URL (default: redis://redis:6379/0)
//! - `WORKER_POLL_SECS`: Poll interval in seconds (default: 30)
//! - `RUST_LOG`: Log filter (default: info)

use std::env;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_REDIS_URL: &str = "redis://redis:6379/0";
const DEFAULT_POLL_SECS: u64 = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let queue_url = env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());
    let poll_secs = env::var("WORKER_POLL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_POLL_SECS);

    info!(queue = %queue_url, poll_secs, "Worker started");

    let mut ticker = tokio::time::interval(Duration::from_secs(poll_secs));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                info!("No jobs to process");
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Shutdown requested, worker exiting");
                break;
            }
        }
    }

    Ok(())
}
