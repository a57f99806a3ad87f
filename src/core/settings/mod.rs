//! Per-session pseudonymization configs
//!
//! - [`merge`]: [`ConfigStore`] reads, merges and persists `<type>-config.json`
//! - [`definition`]: shape validation for uploaded config definitions

pub mod definition;
pub mod merge;

pub use definition::{parse_config_definition, validate_config_definition};
pub use merge::ConfigStore;
