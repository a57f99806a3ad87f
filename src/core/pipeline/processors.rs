//! Per-format file processors
//!
//! Each processor rewrites one output file in place. Logs and other text files
//! only get regex passes; JSON and XML documents get source/derived fields
//! applied to their tree first, then a regex pass over the serialized text.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::core::transform::{apply_config, apply_xml_config, XmlDocument};
use crate::domain::{ConfigDefinition, FileCategory, PalosaError, Result};
use crate::pseudonymization::{ContentAnonymizer, Pseudonymizer};

/// A processor for one file category
#[async_trait]
pub trait FileProcessor: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether this processor handles the file
    fn accepts(&self, path: &Path) -> bool;

    /// Rewrites the file in place
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, transformed or
    /// written back.
    async fn process_file(&self, path: &Path) -> Result<()>;
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn read_text(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    String::from_utf8(bytes).map_err(|e| {
        PalosaError::ContentTransform(format!("{} is not valid UTF-8: {e}", display_name(path)))
    })
}

/// Regex passes over log and plain text files
pub struct LogProcessor {
    pseudonymizer: Arc<Pseudonymizer>,
    anonymizer: ContentAnonymizer,
}

impl LogProcessor {
    pub fn new(pseudonymizer: Arc<Pseudonymizer>, anonymizer: ContentAnonymizer) -> Self {
        Self {
            pseudonymizer,
            anonymizer,
        }
    }
}

#[async_trait]
impl FileProcessor for LogProcessor {
    fn name(&self) -> &'static str {
        "log"
    }

    fn accepts(&self, path: &Path) -> bool {
        FileCategory::from_path(path) == FileCategory::Log
    }

    async fn process_file(&self, path: &Path) -> Result<()> {
        let text = read_text(path).await?;
        let output = self.anonymizer.apply(&self.pseudonymizer, &text)?;
        tokio::fs::write(path, output).await?;
        Ok(())
    }
}

/// Field-level and regex pseudonymization of JSON documents
pub struct JsonProcessor {
    pseudonymizer: Arc<Pseudonymizer>,
    config: ConfigDefinition,
    anonymizer: ContentAnonymizer,
}

impl JsonProcessor {
    pub fn new(
        pseudonymizer: Arc<Pseudonymizer>,
        config: ConfigDefinition,
        anonymizer: ContentAnonymizer,
    ) -> Self {
        Self {
            pseudonymizer,
            config,
            anonymizer,
        }
    }
}

#[async_trait]
impl FileProcessor for JsonProcessor {
    fn name(&self) -> &'static str {
        "json"
    }

    fn accepts(&self, path: &Path) -> bool {
        FileCategory::from_path(path) == FileCategory::Json
    }

    async fn process_file(&self, path: &Path) -> Result<()> {
        let text = read_text(path).await?;
        let mut doc: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| PalosaError::DocumentParse {
                file: display_name(path),
                message: e.to_string(),
            })?;

        let replaced = apply_config(&mut doc, &self.config, &self.pseudonymizer)?;
        let serialized = serde_json::to_string(&doc)?;
        let output = self.anonymizer.apply(&self.pseudonymizer, &serialized)?;

        tokio::fs::write(path, output).await?;
        tracing::debug!(file = %display_name(path), replaced, "JSON document pseudonymized");
        Ok(())
    }
}

/// Field-level and regex pseudonymization of XML documents
pub struct XmlProcessor {
    pseudonymizer: Arc<Pseudonymizer>,
    config: ConfigDefinition,
    anonymizer: ContentAnonymizer,
}

impl XmlProcessor {
    pub fn new(
        pseudonymizer: Arc<Pseudonymizer>,
        config: ConfigDefinition,
        anonymizer: ContentAnonymizer,
    ) -> Self {
        Self {
            pseudonymizer,
            config,
            anonymizer,
        }
    }
}

#[async_trait]
impl FileProcessor for XmlProcessor {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn accepts(&self, path: &Path) -> bool {
        FileCategory::from_path(path) == FileCategory::Xml
    }

    async fn process_file(&self, path: &Path) -> Result<()> {
        let text = read_text(path).await?;
        let mut doc = XmlDocument::parse(&display_name(path), &text)?;

        let replaced = apply_xml_config(&mut doc, &self.config, &self.pseudonymizer)?;
        let serialized = doc.to_xml_string()?;
        let output = self.anonymizer.apply(&self.pseudonymizer, &serialized)?;

        tokio::fs::write(path, output).await?;
        tracing::debug!(file = %display_name(path), replaced, "XML document pseudonymized");
        Ok(())
    }
}
