//! User-selected pseudonymization settings
//!
//! Settings arrive as the JSON object the upload form produces:
//!
//! ```json
//! {
//!   "logSettings":   { "checkedOptions": ["E-Mail", "IP-Adressen"] },
//!   "jsonSettings":  { "checkedOptions": ["mailField"], "patterns": [] },
//!   "xmlSettings":   { "checkedOptions": [] },
//!   "regexSettings": { "patterns": ["\\d{4}-\\d{4}"] }
//! }
//! ```
//!
//! Whether a sub-object is present matters for pattern resolution, so each one is
//! an `Option`. List fields are forgiving: a missing or non-array field reads as
//! empty and non-string items are dropped.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::category::ConfigType;

/// Field names and regex patterns chosen for one settings category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySettings {
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub checked_options: Vec<String>,

    #[serde(default, deserialize_with = "lenient_string_list")]
    pub patterns: Vec<String>,
}

impl CategorySettings {
    /// Builds a category from checked options only
    pub fn with_options<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            checked_options: options.into_iter().map(Into::into).collect(),
            patterns: Vec::new(),
        }
    }

    /// Builds a category from patterns only
    pub fn with_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            checked_options: Vec::new(),
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Complete settings object for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_settings: Option<CategorySettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_settings: Option<CategorySettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xml_settings: Option<CategorySettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_settings: Option<CategorySettings>,
}

impl Settings {
    /// Returns the sub-object that feeds the given config type
    pub fn for_type(&self, config_type: ConfigType) -> Option<&CategorySettings> {
        match config_type {
            ConfigType::Json => self.json_settings.as_ref(),
            ConfigType::Xml => self.xml_settings.as_ref(),
            ConfigType::Log => self.log_settings.as_ref(),
            ConfigType::Regex => self.regex_settings.as_ref(),
        }
    }
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_settings() {
        let settings: Settings = serde_json::from_value(json!({
            "logSettings": { "checkedOptions": ["E-Mail"] },
            "jsonSettings": { "checkedOptions": ["mailField"], "patterns": ["abc"] },
            "regexSettings": { "patterns": ["\\d+"] }
        }))
        .unwrap();

        assert_eq!(settings.log_settings.unwrap().checked_options, vec!["E-Mail"]);
        let json_settings = settings.json_settings.unwrap();
        assert_eq!(json_settings.checked_options, vec!["mailField"]);
        assert_eq!(json_settings.patterns, vec!["abc"]);
        assert!(settings.xml_settings.is_none());
        assert_eq!(settings.regex_settings.unwrap().patterns, vec!["\\d+"]);
    }

    #[test]
    fn test_empty_object_has_no_categories() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_malformed_lists_read_as_empty() {
        let settings: Settings = serde_json::from_value(json!({
            "jsonSettings": { "checkedOptions": "mailField", "patterns": [1, "keep", null] }
        }))
        .unwrap();

        let json_settings = settings.json_settings.unwrap();
        assert!(json_settings.checked_options.is_empty());
        assert_eq!(json_settings.patterns, vec!["keep"]);
    }

    #[test]
    fn test_present_but_empty_category_is_kept() {
        let settings: Settings = serde_json::from_str(r#"{"logSettings": {}}"#).unwrap();
        assert_eq!(settings.log_settings, Some(CategorySettings::default()));
    }

    #[test]
    fn test_for_type() {
        let settings = Settings {
            xml_settings: Some(CategorySettings::with_options(["name"])),
            ..Default::default()
        };
        assert!(settings.for_type(ConfigType::Xml).is_some());
        assert!(settings.for_type(ConfigType::Json).is_none());
    }
}
