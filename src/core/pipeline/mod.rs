//! Per-session pseudonymization pipeline
//!
//! - [`coordinator`]: [`PipelineCoordinator`] runs the stages in order
//! - [`processors`]: log, JSON and XML file processors
//! - [`files`]: output naming and copying
//! - [`archive`]: deterministic ZIP packaging
//! - [`summary`]: per-run counts and timing

pub mod archive;
pub mod coordinator;
pub mod files;
pub mod processors;
pub mod summary;

pub use archive::build_archive;
pub use coordinator::{PipelineCoordinator, PipelineStage};
pub use files::{copy_to_output, generate_file_name};
pub use processors::{FileProcessor, JsonProcessor, LogProcessor, XmlProcessor};
pub use summary::RunSummary;
