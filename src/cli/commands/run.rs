//! Run command implementation
//!
//! This module implements the `run` command, which pseudonymizes one
//! session's uploads and packages the result.

use super::{load_or_report, parse_session, EXIT_CONFIG, EXIT_PIPELINE};
use crate::core::pipeline::{PipelineCoordinator, RunSummary};
use crate::domain::{PalosaError, Settings};
use crate::log_error_with_context;
use clap::Args;
use std::path::Path;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Session identifier (as printed by `session create`)
    #[arg(short, long)]
    pub session: String,

    /// JSON file with the user's settings (logSettings, jsonSettings, ...)
    #[arg(long)]
    pub settings: String,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(session_id = %self.session, "Starting run command");

        let Some(session) = parse_session(&self.session) else {
            return Ok(EXIT_CONFIG);
        };

        let settings = match read_settings(Path::new(&self.settings)).await {
            Ok(s) => s,
            Err(e) => {
                log_error_with_context!(&e, "Failed to read settings");
                println!("❌ Failed to read settings file {}", self.settings);
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let Some(config) = load_or_report(config_path) else {
            return Ok(EXIT_CONFIG);
        };

        let coordinator = match PipelineCoordinator::from_config(&config) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to create pipeline coordinator");
                println!("❌ Failed to initialize pipeline: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("🚀 Pseudonymizing session {session}...");
        println!();

        match coordinator.run(&session, &settings).await {
            Ok(summary) => {
                print_summary(&summary);
                println!("✅ Pseudonymization completed successfully!");
                Ok(0)
            }
            Err(e) => {
                println!("❌ Pseudonymization failed ({})", e.category());
                println!("   Error: {e}");
                Ok(EXIT_PIPELINE)
            }
        }
    }
}

/// Reads and parses a settings JSON file
async fn read_settings(path: &Path) -> Result<Settings, PalosaError> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        PalosaError::Configuration(format!("Failed to read {}: {e}", path.display()))
    })?;
    Ok(serde_json::from_str(&text)?)
}

fn print_summary(summary: &RunSummary) {
    println!("📊 Run Summary:");
    println!("  Session: {}", summary.session_id);
    println!("  Started: {}", summary.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Files Copied: {}", summary.files_copied);
    println!("  Log Files: {}", summary.log_files);
    println!("  JSON Files: {}", summary.json_files);
    println!("  XML Files: {}", summary.xml_files);
    println!("  Definitions Imported: {}", summary.definitions_imported);
    println!("  Archive Entries: {}", summary.archive_entries);
    if let Some(path) = &summary.archive_path {
        println!("  Archive: {}", path.display());
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();
}
