//! Sweep command implementation
//!
//! Removes sessions idle longer than `session.ttl_seconds`, either once or
//! every `session.sweep_interval_seconds` until a shutdown signal arrives.

use super::{load_or_report, EXIT_CONFIG, EXIT_FATAL};
use crate::core::session::{run_sweeper, SessionLayout, SessionStore};
use clap::Args;
use std::time::Duration;
use tokio::sync::watch;

/// Arguments for the sweep command
#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Keep sweeping periodically until Ctrl+C or SIGTERM
    #[arg(short, long)]
    pub watch: bool,
}

impl SweepArgs {
    /// Execute the sweep command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let Some(config) = load_or_report(config_path) else {
            return Ok(EXIT_CONFIG);
        };
        let store = SessionStore::new(SessionLayout::from_config(&config.storage));
        let ttl = Duration::from_secs(config.session.ttl_seconds);

        if self.watch {
            let interval = Duration::from_secs(config.session.sweep_interval_seconds);
            println!(
                "🧹 Sweeping every {}s (TTL {}s), press Ctrl+C to stop",
                interval.as_secs(),
                ttl.as_secs()
            );
            return match run_sweeper(store, interval, ttl, shutdown_signal).await {
                Ok(()) => Ok(0),
                Err(e) => {
                    println!("❌ Sweeper stopped: {e}");
                    Ok(EXIT_FATAL)
                }
            };
        }

        let result = tokio::task::spawn_blocking(move || store.sweep_expired(ttl)).await?;
        match result {
            Ok(stats) => {
                println!(
                    "🧹 Swept {} session(s), removed {}",
                    stats.sessions_seen,
                    stats.removed.len()
                );
                for session in &stats.removed {
                    println!("  - {session}");
                }
                if stats.failed > 0 {
                    println!("⚠️  Skipped {} session(s) that could not be swept", stats.failed);
                }
                Ok(0)
            }
            Err(e) => {
                println!("❌ Sweep failed");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}
