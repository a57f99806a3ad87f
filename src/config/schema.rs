//! Configuration schema types
//!
//! This module defines the configuration structure for PALoSA.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Main PALoSA configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Only `[pseudonymization]` is required, every other section has defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct PalosaConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Upload, output and download roots
    #[serde(default)]
    pub storage: StorageConfig,

    /// Pseudonymization key material
    pub pseudonymization: PseudonymizationConfig,

    /// Session expiry
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PalosaConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.storage.validate()?;
        self.pseudonymization.validate()?;
        self.session.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Root directories shared by all sessions
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root of the per-session upload folders
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,

    /// Root of the per-session pseudonymized output
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Root of the per-session ZIP archives
    #[serde(default = "default_download_dir")]
    pub download_dir: String,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("uploads_dir", &self.uploads_dir),
            ("output_dir", &self.output_dir),
            ("download_dir", &self.download_dir),
        ] {
            if value.trim().is_empty() {
                return Err(format!("storage.{name} cannot be empty"));
            }
        }

        if self.uploads_dir == self.output_dir
            || self.uploads_dir == self.download_dir
            || self.output_dir == self.download_dir
        {
            return Err(
                "storage.uploads_dir, storage.output_dir and storage.download_dir must differ"
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
            output_dir: default_output_dir(),
            download_dir: default_download_dir(),
        }
    }
}

/// Pseudonymization secret
///
/// The key feeds both the HMAC generator and Crypto-PAn. It is zeroized on
/// drop and redacted in `Debug` output.
#[derive(Debug, Clone, Deserialize)]
pub struct PseudonymizationConfig {
    /// Shared secret
    pub key: SecretString,
}

impl PseudonymizationConfig {
    fn validate(&self) -> Result<(), String> {
        if self.key.expose_secret().is_empty() {
            return Err("pseudonymization.key cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Session expiry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Idle time after which a session is swept
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Interval between sweeps in watch mode
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,
}

impl SessionConfig {
    fn validate(&self) -> Result<(), String> {
        if self.ttl_seconds == 0 {
            return Err("session.ttl_seconds must be > 0".to_string());
        }
        if self.sweep_interval_seconds == 0 {
            return Err("session.sweep_interval_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            sweep_interval_seconds: default_sweep_interval_seconds(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_uploads_dir() -> String {
    "uploads".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_download_dir() -> String {
    "download".to_string()
}

fn default_ttl_seconds() -> u64 {
    3600
}

fn default_sweep_interval_seconds() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
