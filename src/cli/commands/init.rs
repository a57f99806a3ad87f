//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "palosa.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing PALoSA configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your directories", self.output);
                println!("  2. Set PALOSA_PSEUDO_KEY in your environment or a .env file");
                println!("  3. Validate configuration: palosa validate-config");
                println!("  4. Create a session: palosa session create");
                println!("  5. Run: palosa run --session <id> --settings settings.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate the commented configuration template
    fn generate_config() -> String {
        r#"# PALoSA Configuration File
# Pseudonymization of log, JSON and XML uploads

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Storage
# ============================================================================
# Every session gets a sub-directory below each root:
#   <uploads_dir>/<session>/{other,json,xml}
#   <output_dir>/<session>/*-pseudo.*
#   <download_dir>/<session>/pseudo-files.zip
[storage]
uploads_dir = "uploads"
output_dir = "output"
download_dir = "download"

# ============================================================================
# Pseudonymization
# ============================================================================
[pseudonymization]
# Shared secret for HMAC pseudonyms and Crypto-PAn IP addresses.
# Keep it out of this file; PALOSA_PSEUDO_KEY overrides this value.
key = "${PALOSA_PSEUDO_KEY}"

# ============================================================================
# Sessions
# ============================================================================
[session]
# Sessions idle longer than this are removed by `palosa sweep`
ttl_seconds = 3600

# Interval between sweeps in `palosa sweep --watch`
sweep_interval_seconds = 300

# ============================================================================
# Logging
# ============================================================================
[logging]
# Enable JSON log files
local_enabled = true

# Log directory
local_path = "logs"

# Log rotation (daily, hourly or never)
local_rotation = "daily"
"#
        .to_string()
    }
}
