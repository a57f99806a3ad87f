// PALoSA - Pseudonymization of Log, JSON and XML Uploads
// Copyright (c) 2025 PALoSA Contributors
// Licensed under the MIT License

//! # PALoSA - Pseudonymization Pipeline
//!
//! PALoSA takes a session's uploaded log, JSON and XML files, replaces
//! personal data with keyed pseudonyms and packages the result as a ZIP
//! archive.
//!
//! ## Overview
//!
//! - **Generic values** become the first 8 bytes of HMAC-SHA256, hex encoded
//! - **Email addresses** keep their shape: local part and domain label are
//!   pseudonymized, the top-level domain is kept
//! - **IPv4 addresses** are mapped with prefix-preserving Crypto-PAn
//! - **JSON/XML fields** named in the per-session config are pseudonymized
//!   wherever they occur, and derived fields are joined from dot paths
//! - **Free text** is rewritten by ordered regex passes
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Pipeline, session lifecycle, config merging, tree transforms
//! - [`pseudonymization`] - Pseudonym generators and regex anonymizer
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use palosa::config::load_config;
//! use palosa::core::pipeline::PipelineCoordinator;
//! use palosa::domain::{SessionId, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("palosa.toml")?;
//!     let coordinator = PipelineCoordinator::from_config(&config)?;
//!
//!     let session = SessionId::new("3f2b6c1e")?;
//!     let summary = coordinator.run(&session, &Settings::default()).await?;
//!
//!     println!("Processed {} files", summary.files_processed());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::PalosaError`] through [`domain::Result`].
//! Every error carries a stable category label used in logs:
//!
//! ```rust
//! use palosa::domain::PalosaError;
//!
//! let err: PalosaError = "yaml".parse::<palosa::domain::ConfigType>().unwrap_err();
//! assert_eq!(err.category(), "unknown_config_type");
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod pseudonymization;
