//! Configuration management for PALoSA.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! PALoSA uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PALOSA_<SECTION>_<KEY>` overrides, and `PALOSA_PSEUDO_KEY` for the secret
//! - Default values for everything except the pseudonymization key
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use palosa::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("palosa.toml")?;
//!
//! println!("Uploads: {}", config.storage.uploads_dir);
//! println!("Session TTL: {}s", config.session.ttl_seconds);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`StorageConfig`] - Upload, output and download roots
//! - [`PseudonymizationConfig`] - The shared secret
//! - [`SessionConfig`] - Idle expiry and sweep interval
//! - [`LoggingConfig`] - Rolling JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [storage]
//! uploads_dir = "uploads"
//! output_dir = "output"
//! download_dir = "download"
//!
//! [pseudonymization]
//! key = "${PALOSA_SECRET}"
//!
//! [session]
//! ttl_seconds = 3600
//! sweep_interval_seconds = 300
//!
//! [logging]
//! local_enabled = true
//! local_path = "logs"
//! local_rotation = "daily"
//! ```
//!
//! The key is held as a [`secrecy::SecretString`] and never appears in
//! `Debug` output or logs.

pub mod loader;
pub mod schema;

pub use loader::{load_config, PSEUDO_KEY_ENV};
pub use schema::{
    ApplicationConfig, LoggingConfig, PalosaConfig, PseudonymizationConfig, SessionConfig,
    StorageConfig,
};
