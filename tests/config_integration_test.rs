//! Integration tests for configuration loading and validation
//!
//! Tests that touch environment variables hold `ENV_MUTEX`.

use palosa::config::{load_config, PSEUDO_KEY_ENV};
use palosa::core::pipeline::PipelineCoordinator;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    std::env::remove_var(PSEUDO_KEY_ENV);
    std::env::remove_var("PALOSA_APPLICATION_LOG_LEVEL");
    std::env::remove_var("PALOSA_STORAGE_UPLOADS_DIR");
    std::env::remove_var("PALOSA_SESSION_TTL_SECONDS");
    std::env::remove_var("TEST_PALOSA_SECRET");
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = config_file(
        r#"
[application]
log_level = "debug"

[storage]
uploads_dir = "/data/uploads"
output_dir = "/data/output"
download_dir = "/data/download"

[pseudonymization]
key = "complete-config-key"

[session]
ttl_seconds = 7200
sweep_interval_seconds = 60

[logging]
local_enabled = false
local_path = "/tmp/palosa"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.storage.output_dir, "/data/output");
    assert_eq!(config.pseudonymization.key.expose_secret(), "complete-config-key");
    assert_eq!(config.session.ttl_seconds, 7200);
    assert_eq!(config.session.sweep_interval_seconds, 60);
    assert!(!config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");

    assert!(PipelineCoordinator::from_config(&config).is_ok());
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_PALOSA_SECRET", "from-environment");

    let file = config_file(
        r#"
[pseudonymization]
key = "${TEST_PALOSA_SECRET}"
"#,
    );
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.pseudonymization.key.expose_secret(), "from-environment");

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_var() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = config_file(
        r#"
[pseudonymization]
key = "${TEST_PALOSA_SECRET}"
"#,
    );
    let err = load_config(file.path()).unwrap_err();
    assert_eq!(err.category(), "configuration");
    assert!(err.to_string().contains("TEST_PALOSA_SECRET"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var(PSEUDO_KEY_ENV, "override-key");
    std::env::set_var("PALOSA_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("PALOSA_STORAGE_UPLOADS_DIR", "/override/uploads");
    std::env::set_var("PALOSA_SESSION_TTL_SECONDS", "120");

    let file = config_file(
        r#"
[pseudonymization]
key = "file-key"
"#,
    );
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.pseudonymization.key.expose_secret(), "override-key");
    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.storage.uploads_dir, "/override/uploads");
    assert_eq!(config.session.ttl_seconds, 120);

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        "[pseudonymization]\nkey = \"\"\n",
        "[application]\nlog_level = \"chatty\"\n[pseudonymization]\nkey = \"k\"\n",
        "[session]\nttl_seconds = 0\n[pseudonymization]\nkey = \"k\"\n",
        "[logging]\nlocal_rotation = \"size\"\n[pseudonymization]\nkey = \"k\"\n",
        "[storage]\nuploads_dir = \"same\"\noutput_dir = \"same\"\n[pseudonymization]\nkey = \"k\"\n",
    ];
    for contents in cases {
        let file = config_file(contents);
        let err = load_config(file.path()).unwrap_err();
        assert!(
            err.to_string().contains("Configuration validation failed"),
            "expected validation failure for {contents:?}, got {err}"
        );
    }
}

#[test]
fn test_missing_pseudonymization_section() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = config_file("[application]\nlog_level = \"info\"\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML"));
}
