//! Output file naming and directory listing helpers

use std::path::{Path, PathBuf};

use crate::domain::Result;

/// Suffix inserted before the extension of every output file
pub const PSEUDO_SUFFIX: &str = "-pseudo";

/// Inserts `-pseudo` before the last extension, or appends it
///
/// ```
/// use palosa::core::pipeline::files::generate_file_name;
///
/// assert_eq!(generate_file_name("test.json"), "test-pseudo.json");
/// assert_eq!(generate_file_name("archive.tar.gz"), "archive.tar-pseudo.gz");
/// assert_eq!(generate_file_name("readme"), "readme-pseudo");
/// ```
pub fn generate_file_name(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(index) => format!(
            "{}{PSEUDO_SUFFIX}{}",
            &file_name[..index],
            &file_name[index..]
        ),
        None => format!("{file_name}{PSEUDO_SUFFIX}"),
    }
}

/// Regular files directly inside `dir`, sorted by name
///
/// A missing directory yields an empty list.
pub async fn list_regular_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(files),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Copies every regular file of `source` into `target` under its `-pseudo` name
///
/// Returns the written paths. A missing source directory is logged and copies
/// nothing.
pub async fn copy_to_output(source: &Path, target: &Path) -> Result<Vec<PathBuf>> {
    if !tokio::fs::try_exists(source).await? {
        tracing::warn!(dir = %source.display(), "Upload directory does not exist, nothing to copy");
        return Ok(Vec::new());
    }

    let mut copied = Vec::new();
    for path in list_regular_files(source).await? {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::warn!(file = %path.display(), "Skipping file with non UTF-8 name");
            continue;
        };
        let destination = target.join(generate_file_name(name));
        tokio::fs::copy(&path, &destination).await?;
        tracing::debug!(
            from = %path.display(),
            to = %destination.display(),
            "Copied upload to output"
        );
        copied.push(destination);
    }
    Ok(copied)
}
