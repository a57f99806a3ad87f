//! ZIP packaging of the output directory
//!
//! Entries are written flat, in name order, with a fixed timestamp so the same
//! output files always produce the same archive bytes.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::domain::{PalosaError, Result};

/// Writes every regular file of `source_dir` into a new archive at `archive_path`
///
/// Runs on the blocking pool. Returns the number of entries written.
pub async fn build_archive(source_dir: &Path, archive_path: &Path) -> Result<usize> {
    let source_dir = source_dir.to_path_buf();
    let archive_path = archive_path.to_path_buf();

    tokio::task::spawn_blocking(move || write_archive(&source_dir, &archive_path))
        .await
        .map_err(|e| PalosaError::Archive(format!("Archive task failed: {e}")))?
}

fn archive_entries(source_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(source_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().into_string().map_err(|name| {
            PalosaError::Archive(format!("Output file name is not UTF-8: {name:?}"))
        })?;
        entries.push((name, entry.path()));
    }
    entries.sort();
    Ok(entries)
}

fn write_archive(source_dir: &Path, archive_path: &Path) -> Result<usize> {
    let entries = archive_entries(source_dir)?;

    if let Some(parent) = archive_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut zip = ZipWriter::new(File::create(archive_path)?);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut buffer = Vec::new();
    for (name, path) in &entries {
        buffer.clear();
        File::open(path)?.read_to_end(&mut buffer)?;
        zip.start_file(name.as_str(), options)?;
        zip.write_all(&buffer)?;
    }

    let mut file = zip.finish()?;
    file.flush()?;

    tracing::debug!(
        archive = %archive_path.display(),
        entries = entries.len(),
        "Archive written"
    );
    Ok(entries.len())
}
