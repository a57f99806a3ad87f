//! Domain models and types for PALoSA.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Session identifiers** ([`SessionId`]) that are safe to use as directory names
//! - **Settings** ([`Settings`], [`CategorySettings`]) chosen by the user for a run
//! - **Config types and file categories** ([`ConfigType`], [`FileCategory`])
//! - **Per-type configs** ([`ConfigDefinition`], [`DerivedField`])
//! - **Error types** ([`PalosaError`]) and the [`Result`] alias
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, PalosaError>`]:
//!
//! ```rust
//! use palosa::domain::{ConfigType, Result};
//!
//! fn example() -> Result<ConfigType> {
//!     let config_type: ConfigType = "json".parse()?;
//!     Ok(config_type)
//! }
//! ```

pub mod category;
pub mod definition;
pub mod errors;
pub mod ids;
pub mod result;
pub mod settings;

pub use category::{ConfigType, FileCategory};
pub use definition::{ConfigDefinition, DerivedField};
pub use errors::PalosaError;
pub use ids::SessionId;
pub use result::Result;
pub use settings::{CategorySettings, Settings};
