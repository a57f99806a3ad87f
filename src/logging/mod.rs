//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output filtered by `RUST_LOG` or the configured level
//! - JSON-formatted rolling log files
//!
//! Original and pseudonymized values are never logged above `trace`.
//!
//! # Example
//!
//! ```no_run
//! use palosa::logging::init_logging;
//! use palosa::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(session_id = "abc", "Pseudonymization started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log an error with its category and context
///
/// # Example
///
/// ```no_run
/// use palosa::log_error_with_context;
/// use palosa::domain::PalosaError;
///
/// let error = PalosaError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            category = $error.category(),
            context = $context,
            "Error occurred"
        );
    };
}
