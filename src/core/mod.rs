//! Core business logic for PALoSA
//!
//! - [`pipeline`]: per-session orchestration from uploads to ZIP archive
//! - [`settings`]: per-type config merging and definition validation
//! - [`transform`]: JSON/XML tree traversal and dot-path access
//! - [`session`]: session directories, cleanup and idle expiry

pub mod pipeline;
pub mod session;
pub mod settings;
pub mod transform;
