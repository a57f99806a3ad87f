//! Shape validation for uploaded config definitions
//!
//! A definition must be exactly:
//!
//! ```json
//! { "sources": ["..."], "derived": { "<target>": { "sources": ["..."], "separator": "..." } } }
//! ```
//!
//! Both top-level keys are required and no other keys are allowed at either level.

use serde_json::{Map, Value};

use crate::domain::{ConfigDefinition, PalosaError, Result};

/// Returns `true` if `value` has the config definition shape
pub fn validate_config_definition(value: &Value) -> bool {
    check_definition(value).is_ok()
}

/// Validates the shape and converts it into a [`ConfigDefinition`]
///
/// # Errors
///
/// Returns [`PalosaError::InvalidConfigDefinition`] describing the first
/// violation found.
pub fn parse_config_definition(value: &Value) -> Result<ConfigDefinition> {
    check_definition(value).map_err(PalosaError::InvalidConfigDefinition)?;
    serde_json::from_value(value.clone())
        .map_err(|e| PalosaError::InvalidConfigDefinition(e.to_string()))
}

fn check_definition(value: &Value) -> std::result::Result<(), String> {
    let root = value
        .as_object()
        .ok_or_else(|| "definition must be an object".to_string())?;
    check_keys(root, &["sources", "derived"], "definition")?;
    check_string_array(&root["sources"], "sources")?;

    let derived = root["derived"]
        .as_object()
        .ok_or_else(|| "derived must be an object".to_string())?;
    for (target, entry) in derived {
        let context = format!("derived.{target}");
        let entry = entry
            .as_object()
            .ok_or_else(|| format!("{context} must be an object"))?;
        check_keys(entry, &["sources", "separator"], &context)?;
        check_string_array(&entry["sources"], &format!("{context}.sources"))?;
        if !entry["separator"].is_string() {
            return Err(format!("{context}.separator must be a string"));
        }
    }
    Ok(())
}

fn check_keys(map: &Map<String, Value>, required: &[&str], context: &str) -> std::result::Result<(), String> {
    for key in required {
        if !map.contains_key(*key) {
            return Err(format!("{context} is missing required key '{key}'"));
        }
    }
    if let Some(extra) = map.keys().find(|k| !required.contains(&k.as_str())) {
        return Err(format!("{context} has unexpected key '{extra}'"));
    }
    Ok(())
}

fn check_string_array(value: &Value, context: &str) -> std::result::Result<(), String> {
    match value.as_array() {
        Some(items) if items.iter().all(Value::is_string) => Ok(()),
        Some(_) => Err(format!("{context} must only contain strings")),
        None => Err(format!("{context} must be an array")),
    }
}
