//! Validation commands
//!
//! `validate-config` checks the TOML configuration, `validate-definition`
//! checks an uploaded config definition file.

use super::{load_or_report, EXIT_CONFIG};
use crate::core::settings::parse_config_definition;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let Some(config) = load_or_report(config_path) else {
            return Ok(EXIT_CONFIG);
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Uploads: {}", config.storage.uploads_dir);
        println!("  Output: {}", config.storage.output_dir);
        println!("  Download: {}", config.storage.download_dir);
        println!("  Session TTL: {}s", config.session.ttl_seconds);
        println!(
            "  Sweep Interval: {}s",
            config.session.sweep_interval_seconds
        );
        if config.logging.local_enabled {
            println!(
                "  Log Files: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(0)
    }
}

/// Arguments for the validate-definition command
#[derive(Args, Debug)]
pub struct ValidateDefinitionArgs {
    /// Config definition JSON file
    pub file: String,
}

impl ValidateDefinitionArgs {
    /// Execute the validate-definition command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        println!("🔍 Validating config definition: {}", self.file);
        println!();

        let text = match tokio::fs::read_to_string(&self.file).await {
            Ok(t) => t,
            Err(e) => {
                println!("❌ Failed to read {}", self.file);
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(e) => {
                println!("❌ Not valid JSON");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        match parse_config_definition(&value) {
            Ok(definition) => {
                println!("✅ Config definition is valid");
                println!("  Source Fields: {}", definition.sources.len());
                println!("  Derived Fields: {}", definition.derived.len());
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Config definition is invalid");
                println!("   Error: {e}");
                println!();
                Ok(EXIT_CONFIG)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn validate_file(contents: &str) -> i32 {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("definition.json");
        std::fs::write(&path, contents).unwrap();
        ValidateDefinitionArgs {
            file: path.to_string_lossy().to_string(),
        }
        .execute()
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_valid_definition() {
        let code = validate_file(
            r#"{"sources": ["mail"], "derived": {"full": {"sources": ["a", "b"], "separator": " "}}}"#,
        )
        .await;
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_definition_with_extra_key() {
        let code = validate_file(r#"{"sources": [], "derived": {}, "extra": 1}"#).await;
        assert_eq!(code, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_definition_not_json() {
        assert_eq!(validate_file("{sources").await, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_validate_config_missing_file() {
        let code = ValidateArgs {}.execute("no-such-palosa.toml").await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}
