//! CLI command implementations
//!
//! Every command returns the process exit code: 0 success, 2 configuration
//! or validation error, 3 pipeline failure, 5 fatal error.

pub mod init;
pub mod run;
pub mod session;
pub mod sweep;
pub mod validate;

use crate::config::{load_config, PalosaConfig};
use crate::domain::{PalosaError, SessionId};
use crate::log_error_with_context;

/// Configuration or validation error exit code
pub const EXIT_CONFIG: i32 = 2;

/// Pipeline failure exit code
pub const EXIT_PIPELINE: i32 = 3;

/// Fatal error exit code
pub const EXIT_FATAL: i32 = 5;

/// Loads the configuration, printing the error on failure
fn load_or_report(config_path: &str) -> Option<PalosaConfig> {
    match load_config(config_path) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::error!(config_path = %config_path, error = %e, "Failed to load configuration");
            println!("❌ Failed to load configuration file");
            println!("   Error: {e}");
            None
        }
    }
}

/// Parses a session id from the command line, printing the error on failure
fn parse_session(id: &str) -> Option<SessionId> {
    match SessionId::new(id).map_err(PalosaError::InvalidSession) {
        Ok(session) => Some(session),
        Err(e) => {
            log_error_with_context!(&e, "Rejected session id");
            println!("❌ {e}");
            None
        }
    }
}
