//! Run summary and reporting

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::SessionId;

/// Summary of one pipeline run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Session the run belonged to
    pub session_id: SessionId,

    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,

    /// Files copied from the `other` upload folder
    pub files_copied: usize,

    /// Log and text files processed
    pub log_files: usize,

    /// JSON documents processed
    pub json_files: usize,

    /// XML documents processed
    pub xml_files: usize,

    /// Config definition files imported
    pub definitions_imported: usize,

    /// Entries written to the archive
    pub archive_entries: usize,

    /// Location of the ZIP archive
    pub archive_path: Option<PathBuf>,

    /// Duration of the run
    pub duration: Duration,
}

impl RunSummary {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            started_at: Utc::now(),
            files_copied: 0,
            log_files: 0,
            json_files: 0,
            xml_files: 0,
            definitions_imported: 0,
            archive_entries: 0,
            archive_path: None,
            duration: Duration::ZERO,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Total number of processed files
    pub fn files_processed(&self) -> usize {
        self.log_files + self.json_files + self.xml_files
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            session_id = %self.session_id,
            started_at = %self.started_at.to_rfc3339(),
            files_copied = self.files_copied,
            log_files = self.log_files,
            json_files = self.json_files,
            xml_files = self.xml_files,
            definitions_imported = self.definitions_imported,
            archive_entries = self.archive_entries,
            duration_ms = self.duration.as_millis() as u64,
            "Pseudonymization completed"
        );
    }
}
