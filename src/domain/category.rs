//! Config types and file categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::errors::PalosaError;

/// The four settings categories a per-type config can be merged for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigType {
    Json,
    Xml,
    Log,
    Regex,
}

impl ConfigType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigType::Json => "json",
            ConfigType::Xml => "xml",
            ConfigType::Log => "log",
            ConfigType::Regex => "regex",
        }
    }

    /// File name of the generated config, e.g. `json-config.json`
    pub fn config_file_name(&self) -> String {
        format!("{}-config.json", self.as_str())
    }
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigType {
    type Err = PalosaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ConfigType::Json),
            "xml" => Ok(ConfigType::Xml),
            "log" => Ok(ConfigType::Log),
            "regex" => Ok(ConfigType::Regex),
            other => Err(PalosaError::UnknownConfigType(other.to_string())),
        }
    }
}

/// Category used when resolving regex patterns for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Log,
    Json,
    Xml,
    Other,
}

impl FileCategory {
    /// Classifies an output file by extension, case-insensitively
    ///
    /// Anything that is not `.json` or `.xml` is processed as a log.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => FileCategory::Json,
            Some("xml") => FileCategory::Xml,
            _ => FileCategory::Log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("json", ConfigType::Json)]
    #[test_case("xml", ConfigType::Xml)]
    #[test_case("log", ConfigType::Log)]
    #[test_case("regex", ConfigType::Regex)]
    fn test_config_type_parse(input: &str, expected: ConfigType) {
        assert_eq!(input.parse::<ConfigType>().unwrap(), expected);
        assert_eq!(expected.to_string(), input);
    }

    #[test]
    fn test_unknown_config_type() {
        let err = "yaml".parse::<ConfigType>().unwrap_err();
        assert!(matches!(err, PalosaError::UnknownConfigType(ref t) if t == "yaml"));
    }

    #[test]
    fn test_config_file_name() {
        assert_eq!(ConfigType::Json.config_file_name(), "json-config.json");
        assert_eq!(ConfigType::Xml.config_file_name(), "xml-config.json");
    }

    #[test_case("data-pseudo.json", FileCategory::Json)]
    #[test_case("DATA-pseudo.JSON", FileCategory::Json)]
    #[test_case("feed-pseudo.Xml", FileCategory::Xml)]
    #[test_case("server-pseudo.log", FileCategory::Log)]
    #[test_case("readme-pseudo", FileCategory::Log)]
    fn test_file_category_from_path(name: &str, expected: FileCategory) {
        assert_eq!(FileCategory::from_path(Path::new(name)), expected);
    }
}
