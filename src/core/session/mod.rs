//! Session directories and their lifecycle

pub mod cleanup;
pub mod layout;

pub use cleanup::{run_sweeper, SessionStore, SweepStats};
pub use layout::{SessionLayout, ARCHIVE_FILE_NAME, OTHER_DIR, UPLOAD_SUBDIRS};
