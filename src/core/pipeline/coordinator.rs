//! Pipeline coordination
//!
//! [`PipelineCoordinator::run`] takes one session from raw uploads to a ZIP
//! archive. Stages run strictly in order:
//!
//! 1. create the output and download directories
//! 2. import uploaded config definitions and merge settings into the json/xml configs
//! 3. copy `other` uploads to the output directory under `-pseudo` names
//! 4. regex-process every log/text file
//! 5. pseudonymize every JSON document
//! 6. pseudonymize every XML document
//! 7. package the output directory as `pseudo-files.zip`
//!
//! Any failure aborts the run. Files written by earlier stages are left in place.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use super::archive::build_archive;
use super::files::{copy_to_output, list_regular_files};
use super::processors::{FileProcessor, JsonProcessor, LogProcessor, XmlProcessor};
use super::summary::RunSummary;
use crate::config::PalosaConfig;
use crate::core::session::SessionLayout;
use crate::core::settings::ConfigStore;
use crate::domain::{ConfigType, FileCategory, Result, SessionId, Settings};
use crate::pseudonymization::{resolve_patterns, ContentAnonymizer, Pseudonymizer};

/// Progress marker of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    Init,
    DirsCreated,
    SettingsMerged,
    FilesCopied,
    LogsProcessed,
    JsonProcessed,
    XmlProcessed,
    Archived,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Init => "init",
            PipelineStage::DirsCreated => "dirs_created",
            PipelineStage::SettingsMerged => "settings_merged",
            PipelineStage::FilesCopied => "files_copied",
            PipelineStage::LogsProcessed => "logs_processed",
            PipelineStage::JsonProcessed => "json_processed",
            PipelineStage::XmlProcessed => "xml_processed",
            PipelineStage::Archived => "archived",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Orchestrates a pseudonymization run for one session
pub struct PipelineCoordinator {
    layout: SessionLayout,
    config_store: ConfigStore,
    pseudonymizer: Arc<Pseudonymizer>,
}

impl PipelineCoordinator {
    pub fn new(layout: SessionLayout, pseudonymizer: Pseudonymizer) -> Self {
        Self {
            config_store: ConfigStore::new(layout.clone()),
            layout,
            pseudonymizer: Arc::new(pseudonymizer),
        }
    }

    /// Builds a coordinator from application configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the pseudonymization key is empty.
    pub fn from_config(config: &PalosaConfig) -> Result<Self> {
        let pseudonymizer = Pseudonymizer::new(&config.pseudonymization.key)?;
        Ok(Self::new(
            SessionLayout::from_config(&config.storage),
            pseudonymizer,
        ))
    }

    pub fn layout(&self) -> &SessionLayout {
        &self.layout
    }

    /// Runs every stage for the session
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any stage. The failure is logged with
    /// its category and the stage reached.
    pub async fn run(&self, session: &SessionId, settings: &Settings) -> Result<RunSummary> {
        let start_time = Instant::now();
        let mut stage = PipelineStage::Init;

        tracing::info!(session_id = %session, "Starting pseudonymization run");

        match self.run_stages(session, settings, &mut stage).await {
            Ok(summary) => {
                let summary = summary.with_duration(start_time.elapsed());
                summary.log_summary();
                Ok(summary)
            }
            Err(e) => {
                tracing::error!(
                    session_id = %session,
                    stage = %stage,
                    category = e.category(),
                    error = %e,
                    "Pseudonymization run failed"
                );
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        session: &SessionId,
        settings: &Settings,
        stage: &mut PipelineStage,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::new(session.clone());

        // Compile everything up front so a bad pattern fails before any file is written
        let log_anonymizer = ContentAnonymizer::new(&resolve_patterns(settings, FileCategory::Log))?;
        let document_anonymizer =
            ContentAnonymizer::new(&resolve_patterns(settings, FileCategory::Other))?;

        let output_dir = self.layout.output_dir(session);
        tokio::fs::create_dir_all(&output_dir).await?;
        tokio::fs::create_dir_all(self.layout.download_dir(session)).await?;
        advance(stage, PipelineStage::DirsCreated, session);

        for config_type in [ConfigType::Json, ConfigType::Xml] {
            summary.definitions_imported += self
                .config_store
                .import_definitions(session, config_type)
                .await?;
        }
        let json_config = self
            .config_store
            .merge(session, settings, ConfigType::Json)
            .await?;
        let xml_config = self
            .config_store
            .merge(session, settings, ConfigType::Xml)
            .await?;
        advance(stage, PipelineStage::SettingsMerged, session);

        let copied = copy_to_output(&self.layout.other_upload_dir(session), &output_dir).await?;
        summary.files_copied = copied.len();
        advance(stage, PipelineStage::FilesCopied, session);

        let log_processor = LogProcessor::new(self.pseudonymizer.clone(), log_anonymizer);
        summary.log_files = process_all(&output_dir, &log_processor).await?;
        advance(stage, PipelineStage::LogsProcessed, session);

        let json_processor = JsonProcessor::new(
            self.pseudonymizer.clone(),
            json_config,
            document_anonymizer.clone(),
        );
        summary.json_files = process_all(&output_dir, &json_processor).await?;
        advance(stage, PipelineStage::JsonProcessed, session);

        let xml_processor =
            XmlProcessor::new(self.pseudonymizer.clone(), xml_config, document_anonymizer);
        summary.xml_files = process_all(&output_dir, &xml_processor).await?;
        advance(stage, PipelineStage::XmlProcessed, session);

        let archive_path = self.layout.archive_path(session);
        summary.archive_entries = build_archive(&output_dir, &archive_path).await?;
        summary.archive_path = Some(archive_path);
        advance(stage, PipelineStage::Archived, session);

        advance(stage, PipelineStage::Done, session);
        Ok(summary)
    }
}

fn advance(stage: &mut PipelineStage, next: PipelineStage, session: &SessionId) {
    *stage = next;
    tracing::info!(session_id = %session, stage = %next, "Pipeline stage reached");
}

async fn process_all(dir: &Path, processor: &dyn FileProcessor) -> Result<usize> {
    let mut processed = 0;
    for path in list_regular_files(dir).await? {
        if !processor.accepts(&path) {
            continue;
        }
        tracing::debug!(
            processor = processor.name(),
            file = %path.display(),
            "Processing file"
        );
        processor.process_file(&path).await?;
        processed += 1;
    }
    Ok(processed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategorySettings, PalosaError};
    use tempfile::TempDir;

    fn coordinator(dir: &TempDir) -> PipelineCoordinator {
        PipelineCoordinator::new(
            SessionLayout::new(
                dir.path().join("uploads"),
                dir.path().join("output"),
                dir.path().join("download"),
            ),
            Pseudonymizer::from_key_str("coordinator-key").unwrap(),
        )
    }

    #[test]
    fn test_stage_order() {
        assert!(PipelineStage::Init < PipelineStage::DirsCreated);
        assert!(PipelineStage::XmlProcessed < PipelineStage::Archived);
        assert_eq!(PipelineStage::SettingsMerged.to_string(), "settings_merged");
    }

    #[tokio::test]
    async fn test_run_without_uploads_creates_empty_archive() {
        let dir = TempDir::new().unwrap();
        let coordinator = coordinator(&dir);
        let session = SessionId::new("empty").unwrap();

        let summary = coordinator.run(&session, &Settings::default()).await.unwrap();

        assert_eq!(summary.files_copied, 0);
        assert_eq!(summary.archive_entries, 0);
        assert!(coordinator.layout().archive_path(&session).is_file());
        assert!(coordinator
            .layout()
            .config_path(&session, ConfigType::Json)
            .is_file());
        assert!(coordinator
            .layout()
            .config_path(&session, ConfigType::Xml)
            .is_file());
    }

    #[tokio::test]
    async fn test_bad_pattern_fails_before_any_output() {
        let dir = TempDir::new().unwrap();
        let coordinator = coordinator(&dir);
        let session = SessionId::new("bad").unwrap();
        let settings = Settings {
            regex_settings: Some(CategorySettings::with_patterns(["(unclosed"])),
            ..Default::default()
        };

        let err = coordinator.run(&session, &settings).await.unwrap_err();
        assert!(matches!(err, PalosaError::PatternCompile { .. }));
        assert!(!coordinator.layout().output_dir(&session).exists());
    }

    #[tokio::test]
    async fn test_log_upload_processed() {
        let dir = TempDir::new().unwrap();
        let coordinator = coordinator(&dir);
        let session = SessionId::new("logs").unwrap();
        let other = coordinator.layout().other_upload_dir(&session);
        std::fs::create_dir_all(&other).unwrap();
        std::fs::write(other.join("access.log"), "GET / from 10.0.0.5\n").unwrap();

        let settings = Settings {
            log_settings: Some(CategorySettings::with_options(["IP-Adressen"])),
            ..Default::default()
        };
        let summary = coordinator.run(&session, &settings).await.unwrap();

        assert_eq!(summary.files_copied, 1);
        assert_eq!(summary.log_files, 1);
        let out = std::fs::read_to_string(
            coordinator.layout().output_dir(&session).join("access-pseudo.log"),
        )
        .unwrap();
        assert!(!out.contains("10.0.0.5"));
        assert!(out.starts_with("GET / from "));
    }
}
