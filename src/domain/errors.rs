//! Domain error types
//!
//! This module defines the error hierarchy for PALoSA. Every failure a pipeline run
//! can produce maps to one variant, and each variant carries a stable category label
//! used in structured logs. Third-party error types are converted at the boundary.

use thiserror::Error;

/// Main PALoSA error type
#[derive(Debug, Error)]
pub enum PalosaError {
    /// A configuration type string outside json/xml/log/regex
    #[error("Unknown config type: {0}")]
    UnknownConfigType(String),

    /// An existing per-type config file could not be read or parsed
    #[error("Failed to read config file {path}: {message}")]
    ConfigRead { path: String, message: String },

    /// A user-supplied or built-in regex failed to compile
    #[error("Invalid pattern '{pattern}': {message}")]
    PatternCompile { pattern: String, message: String },

    /// Text replacement failed while matching or decoding content
    #[error("Content transform failed: {0}")]
    ContentTransform(String),

    /// A JSON or XML upload could not be parsed
    #[error("Failed to parse {file}: {message}")]
    DocumentParse { file: String, message: String },

    /// An uploaded config definition does not match the expected shape
    #[error("Invalid config definition: {0}")]
    InvalidConfigDefinition(String),

    /// A session identifier that is not a safe path component
    #[error("Invalid session: {0}")]
    InvalidSession(String),

    /// Application configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// ZIP packaging errors
    #[error("Archive error: {0}")]
    Archive(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl PalosaError {
    /// Stable label used as the `category` field in logs
    pub fn category(&self) -> &'static str {
        match self {
            PalosaError::UnknownConfigType(_) => "unknown_config_type",
            PalosaError::ConfigRead { .. } => "config_read",
            PalosaError::PatternCompile { .. } => "pattern_compile",
            PalosaError::ContentTransform(_) => "content_transform",
            PalosaError::DocumentParse { .. } => "document_parse",
            PalosaError::InvalidConfigDefinition(_) => "invalid_config_definition",
            PalosaError::InvalidSession(_) => "invalid_session",
            PalosaError::Configuration(_) => "configuration",
            PalosaError::Archive(_) => "archive",
            PalosaError::Serialization(_) => "serialization",
            PalosaError::Io(_) => "io",
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for PalosaError {
    fn from(err: std::io::Error) -> Self {
        PalosaError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PalosaError {
    fn from(err: serde_json::Error) -> Self {
        PalosaError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PalosaError {
    fn from(err: toml::de::Error) -> Self {
        PalosaError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<zip::result::ZipError> for PalosaError {
    fn from(err: zip::result::ZipError) -> Self {
        PalosaError::Archive(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palosa_error_display() {
        let err = PalosaError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_pattern_compile_names_pattern() {
        let err = PalosaError::PatternCompile {
            pattern: "([a-z".to_string(),
            message: "unclosed group".to_string(),
        };
        assert!(err.to_string().contains("([a-z"));
        assert_eq!(err.category(), "pattern_compile");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: PalosaError = io_err.into();
        assert!(matches!(err, PalosaError::Io(_)));
        assert_eq!(err.category(), "io");
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: PalosaError = json_err.into();
        assert!(matches!(err, PalosaError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: PalosaError = toml_err.into();
        assert!(matches!(err, PalosaError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_palosa_error_implements_std_error() {
        let err = PalosaError::UnknownConfigType("yaml".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
