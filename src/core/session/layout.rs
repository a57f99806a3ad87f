//! Per-session directory layout
//!
//! ```text
//! <uploads>/<session>/other/       raw log and text uploads
//! <uploads>/<session>/json/        JSON uploads, json-config.json
//! <uploads>/<session>/xml/         XML uploads, xml-config.json
//! <output>/<session>/              pseudonymized files
//! <download>/<session>/pseudo-files.zip
//! ```

use std::path::{Path, PathBuf};

use crate::config::StorageConfig;
use crate::domain::{ConfigType, SessionId};

/// File name of the packaged result
pub const ARCHIVE_FILE_NAME: &str = "pseudo-files.zip";

/// Upload sub-directory for files that are copied and regex-processed
pub const OTHER_DIR: &str = "other";

/// Upload sub-directories created for every new session
pub const UPLOAD_SUBDIRS: [&str; 3] = [OTHER_DIR, "json", "xml"];

/// Root directories shared by all sessions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLayout {
    uploads_root: PathBuf,
    output_root: PathBuf,
    download_root: PathBuf,
}

impl SessionLayout {
    pub fn new(
        uploads_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        download_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            uploads_root: uploads_root.into(),
            output_root: output_root.into(),
            download_root: download_root.into(),
        }
    }

    pub fn from_config(storage: &StorageConfig) -> Self {
        Self::new(
            &storage.uploads_dir,
            &storage.output_dir,
            &storage.download_dir,
        )
    }

    /// All three roots, in uploads/output/download order
    pub fn roots(&self) -> [&Path; 3] {
        [&self.uploads_root, &self.output_root, &self.download_root]
    }

    pub fn upload_dir(&self, session: &SessionId) -> PathBuf {
        self.uploads_root.join(session.as_str())
    }

    pub fn other_upload_dir(&self, session: &SessionId) -> PathBuf {
        self.upload_dir(session).join(OTHER_DIR)
    }

    /// Upload directory holding a config type's documents and generated config
    pub fn type_upload_dir(&self, session: &SessionId, config_type: ConfigType) -> PathBuf {
        self.upload_dir(session).join(config_type.as_str())
    }

    pub fn config_path(&self, session: &SessionId, config_type: ConfigType) -> PathBuf {
        self.type_upload_dir(session, config_type)
            .join(config_type.config_file_name())
    }

    pub fn output_dir(&self, session: &SessionId) -> PathBuf {
        self.output_root.join(session.as_str())
    }

    pub fn download_dir(&self, session: &SessionId) -> PathBuf {
        self.download_root.join(session.as_str())
    }

    pub fn archive_path(&self, session: &SessionId) -> PathBuf {
        self.download_dir(session).join(ARCHIVE_FILE_NAME)
    }

    /// Every directory owned by the session
    pub fn session_dirs(&self, session: &SessionId) -> [PathBuf; 3] {
        [
            self.upload_dir(session),
            self.output_dir(session),
            self.download_dir(session),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let layout = SessionLayout::new("/u", "/o", "/d");
        let session = SessionId::new("s1").unwrap();

        assert_eq!(layout.other_upload_dir(&session), PathBuf::from("/u/s1/other"));
        assert_eq!(
            layout.config_path(&session, ConfigType::Json),
            PathBuf::from("/u/s1/json/json-config.json")
        );
        assert_eq!(
            layout.config_path(&session, ConfigType::Xml),
            PathBuf::from("/u/s1/xml/xml-config.json")
        );
        assert_eq!(layout.output_dir(&session), PathBuf::from("/o/s1"));
        assert_eq!(
            layout.archive_path(&session),
            PathBuf::from("/d/s1/pseudo-files.zip")
        );
    }
}
