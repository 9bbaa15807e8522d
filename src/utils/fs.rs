//! File system helpers shared by the installer and the version marker.
//!
//! All functions here are synchronous; async callers run them through
//! `tokio::task::spawn_blocking`.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Ensures a directory exists, creating it and all parents if necessary.
///
/// # Errors
///
/// Fails if the path exists but is not a directory, or if it cannot be created.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            anyhow::bail!("Path exists but is not a directory: {}", path.display());
        }
        return Ok(());
    }

    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// The content is written to a sibling `.tmp` file, synced, and renamed over
/// the target, so readers see either the old content or the new content and
/// never a partial write.
///
/// # Errors
///
/// Fails if the temp file cannot be created, written, synced or renamed.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }

    let temp_path = path.with_extension("tmp");

    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Result of [`remove_dir_contents`].
#[derive(Debug, Default)]
pub struct RemovalSummary {
    /// Number of entries removed, counting a removed directory once.
    pub removed: usize,
    /// Entries that could not be enumerated or removed.
    pub failures: Vec<(PathBuf, io::Error)>,
}

/// Removes every top-level entry of `dir`, recursing into directories.
///
/// Entries listed in `keep` are left in place. A directory holding a kept
/// path survives too; only its other contents are removed. Removal continues past
/// individual failures, which are collected in the returned summary. A missing
/// `dir` has nothing to remove and is not a failure.
pub fn remove_dir_contents(dir: &Path, keep: &[PathBuf]) -> RemovalSummary {
    let mut summary = RemovalSummary::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return summary,
        Err(e) => {
            summary.failures.push((dir.to_path_buf(), e));
            return summary;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                summary.failures.push((dir.to_path_buf(), e));
                continue;
            }
        };

        let path = entry.path();
        if keep.iter().any(|k| k == &path) {
            continue;
        }

        // file_type() does not follow symlinks, so a link to a directory is
        // removed as a file rather than recursed into.
        let result = match entry.file_type() {
            Ok(ft) if ft.is_dir() && keep.iter().any(|k| k.starts_with(&path)) => {
                let nested = remove_dir_contents(&path, keep);
                summary.removed += nested.removed;
                summary.failures.extend(nested.failures);
                continue;
            }
            Ok(ft) if ft.is_dir() => fs::remove_dir_all(&path),
            Ok(_) => fs::remove_file(&path),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => summary.removed += 1,
            Err(e) => summary.failures.push((path, e)),
        }
    }

    summary
}
