//! Per-session config persistence and merging
//!
//! Configs only grow: a merge unions new field names into `sources` and never
//! removes anything. Merging the same settings twice leaves the file unchanged.

use std::path::{Path, PathBuf};

use super::definition::parse_config_definition;
use crate::core::session::SessionLayout;
use crate::domain::{ConfigDefinition, ConfigType, PalosaError, Result, SessionId, Settings};

/// Reads, merges and writes `<type>-config.json` files
#[derive(Debug, Clone)]
pub struct ConfigStore {
    layout: SessionLayout,
}

impl ConfigStore {
    pub fn new(layout: SessionLayout) -> Self {
        Self { layout }
    }

    /// Merges settings into the config named by a type string
    ///
    /// # Errors
    ///
    /// Returns [`PalosaError::UnknownConfigType`] for anything other than
    /// `json`, `xml`, `log` or `regex`.
    pub async fn merge_config(
        &self,
        session: &SessionId,
        settings: &Settings,
        config_type: &str,
    ) -> Result<ConfigDefinition> {
        let config_type: ConfigType = config_type.parse()?;
        self.merge(session, settings, config_type).await
    }

    /// Merges the type's options and patterns, then the regex options and
    /// patterns, into the stored config
    pub async fn merge(
        &self,
        session: &SessionId,
        settings: &Settings,
        config_type: ConfigType,
    ) -> Result<ConfigDefinition> {
        let mut config = self.load_or_create(session, config_type).await?;

        let mut candidates: Vec<&String> = Vec::new();
        for category in [settings.for_type(config_type), settings.regex_settings.as_ref()]
            .into_iter()
            .flatten()
        {
            candidates.extend(category.checked_options.iter());
            candidates.extend(category.patterns.iter());
        }

        let added = config.union_sources(candidates);
        self.save(session, config_type, &config).await?;

        tracing::debug!(
            session_id = %session,
            config_type = %config_type,
            added,
            total = config.sources.len(),
            "Merged settings into config"
        );
        Ok(config)
    }

    /// Folds uploaded definition files into the stored config
    ///
    /// Every `*.json` file in the type's upload directory other than the
    /// generated config is treated as a definition. Files are read in name
    /// order. Returns the number of files imported.
    ///
    /// # Errors
    ///
    /// Returns [`PalosaError::InvalidConfigDefinition`] for a file that is not
    /// valid JSON or does not have the definition shape.
    pub async fn import_definitions(
        &self,
        session: &SessionId,
        config_type: ConfigType,
    ) -> Result<usize> {
        let dir = self.layout.type_upload_dir(session, config_type);
        let candidates = definition_files(&dir, &config_type.config_file_name()).await?;
        if candidates.is_empty() {
            return Ok(0);
        }

        let mut config = self.load_or_create(session, config_type).await?;
        for path in &candidates {
            let text = tokio::fs::read_to_string(path).await?;
            let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
                PalosaError::InvalidConfigDefinition(format!("{}: {e}", path.display()))
            })?;
            let definition = parse_config_definition(&value).map_err(|e| match e {
                PalosaError::InvalidConfigDefinition(msg) => {
                    PalosaError::InvalidConfigDefinition(format!("{}: {msg}", path.display()))
                }
                other => other,
            })?;

            config.union_sources(&definition.sources);
            config.union_derived(&definition.derived);
            tracing::info!(
                session_id = %session,
                file = %path.display(),
                "Imported config definition"
            );
        }

        self.save(session, config_type, &config).await?;
        Ok(candidates.len())
    }

    /// Loads the stored config, creating an empty one on first use
    ///
    /// # Errors
    ///
    /// Returns [`PalosaError::ConfigRead`] if an existing file cannot be read
    /// or parsed.
    pub async fn load_or_create(
        &self,
        session: &SessionId,
        config_type: ConfigType,
    ) -> Result<ConfigDefinition> {
        let path = self.layout.config_path(session, config_type);
        let read_error = |message: String| PalosaError::ConfigRead {
            path: path.display().to_string(),
            message,
        };

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| read_error(e.to_string()))?;
        if !exists {
            let config = ConfigDefinition::default();
            self.save(session, config_type, &config).await?;
            tracing::debug!(path = %path.display(), "Created empty config");
            return Ok(config);
        }

        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| read_error(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| read_error(e.to_string()))
    }

    /// Writes the config as pretty-printed JSON
    pub async fn save(
        &self,
        session: &SessionId,
        config_type: ConfigType,
        config: &ConfigDefinition,
    ) -> Result<()> {
        let path = self.layout.config_path(session, config_type);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(config)?;
        tokio::fs::write(&path, json).await?;
        Ok(())
    }
}

async fn definition_files(dir: &Path, generated_name: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(files),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let is_generated = path.file_name().and_then(|n| n.to_str()) == Some(generated_name);
        if is_json && !is_generated {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
