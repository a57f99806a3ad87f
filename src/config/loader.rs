//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PalosaConfig;
use crate::domain::errors::PalosaError;
use crate::domain::result::Result;
use regex::Regex;
use secrecy::SecretString;
use std::fs;
use std::path::Path;

/// Environment variable that overrides `[pseudonymization] key`
pub const PSEUDO_KEY_ENV: &str = "PALOSA_PSEUDO_KEY";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PalosaConfig
/// 4. Applies environment variable overrides (PALOSA_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use palosa::config::loader::load_config;
///
/// let config = load_config("palosa.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PalosaConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PalosaError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PalosaError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: PalosaConfig = toml::from_str(&contents)
        .map_err(|e| PalosaError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        PalosaError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error listing every referenced environment variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PalosaError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PalosaError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using PALOSA_* prefix
///
/// Environment variables follow the pattern: PALOSA_<SECTION>_<KEY>, for
/// example PALOSA_STORAGE_UPLOADS_DIR. The key is read from PALOSA_PSEUDO_KEY.
fn apply_env_overrides(config: &mut PalosaConfig) {
    if let Ok(val) = std::env::var("PALOSA_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("PALOSA_STORAGE_UPLOADS_DIR") {
        config.storage.uploads_dir = val;
    }
    if let Ok(val) = std::env::var("PALOSA_STORAGE_OUTPUT_DIR") {
        config.storage.output_dir = val;
    }
    if let Ok(val) = std::env::var("PALOSA_STORAGE_DOWNLOAD_DIR") {
        config.storage.download_dir = val;
    }

    if let Ok(val) = std::env::var(PSEUDO_KEY_ENV) {
        config.pseudonymization.key = SecretString::new(val);
    }

    if let Ok(val) = std::env::var("PALOSA_SESSION_TTL_SECONDS") {
        if let Ok(ttl) = val.parse() {
            config.session.ttl_seconds = ttl;
        }
    }
    if let Ok(val) = std::env::var("PALOSA_SESSION_SWEEP_INTERVAL_SECONDS") {
        if let Ok(interval) = val.parse() {
            config.session.sweep_interval_seconds = interval;
        }
    }

    if let Ok(val) = std::env::var("PALOSA_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("PALOSA_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("PALOSA_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("PALOSA_LOADER_TEST_VAR", "test_value");
        let input = "key = \"${PALOSA_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "key = \"test_value\"\n");
        std::env::remove_var("PALOSA_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("PALOSA_LOADER_MISSING_A");
        std::env::remove_var("PALOSA_LOADER_MISSING_B");
        let input = "a = \"${PALOSA_LOADER_MISSING_A}\"\nb = \"${PALOSA_LOADER_MISSING_B}\"\n";
        let err = substitute_env_vars(input).unwrap_err().to_string();
        assert!(err.contains("PALOSA_LOADER_MISSING_A"));
        assert!(err.contains("PALOSA_LOADER_MISSING_B"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("PALOSA_LOADER_COMMENTED");
        let input = "# key = \"${PALOSA_LOADER_COMMENTED}\"\nname = \"x\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${PALOSA_LOADER_COMMENTED}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-palosa.toml");
        assert!(matches!(result, Err(PalosaError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[storage]
uploads_dir = "/srv/palosa/uploads"
output_dir = "/srv/palosa/output"
download_dir = "/srv/palosa/download"

[pseudonymization]
key = "loader-test-key"

[session]
ttl_seconds = 600
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.storage.uploads_dir, "/srv/palosa/uploads");
        assert_eq!(config.session.ttl_seconds, 600);
        assert_eq!(config.session.sweep_interval_seconds, 300);
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[pseudonymization\nkey = ").unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }
}
