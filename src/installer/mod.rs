//! Extraction of downloaded release archives into the install directory.
//!
//! Installation is best effort rather than transactional:
//!
//! 1. **Open**: the archive is opened before anything on disk is touched. An
//!    unreadable archive fails the whole call with
//!    [`LauncherError::ArchiveError`] and leaves the target as it was.
//! 2. **Wipe** (optional): every top-level entry of the target directory is
//!    removed. Failures are logged and recorded, and extraction goes ahead over
//!    whatever is left.
//! 3. **Extract**: each entry is written to `target/<entry path>`, creating
//!    parent directories and overwriting existing files. A failing entry is
//!    recorded as [`EntryOutcome::Failed`] and the next entry is processed.
//! 4. **Clean up**: the archive is closed and deleted, whatever the entries'
//!    outcomes.
//!
//! # Path Containment
//!
//! Entry names are only used if they stay inside the target directory.
//! Absolute names and names that climb out with `..` are rejected as failed
//! entries and nothing is written for them.
//!
//! # Blocking
//!
//! [`PackageInstaller::install`] is synchronous. Async callers run it through
//! `tokio::task::spawn_blocking`.

use std::fs;
use std::io::{self, BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::core::LauncherError;
use crate::utils::fs::remove_dir_contents;

/// Result of extracting a single archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// The entry was written (or, for directory entries, created).
    Extracted {
        /// Entry name as stored in the archive.
        name: String,
        /// Destination on disk.
        path: PathBuf,
    },
    /// The entry was skipped.
    Failed {
        /// Entry name as stored in the archive.
        name: String,
        /// What went wrong.
        error: String,
    },
}

impl EntryOutcome {
    /// Entry name as stored in the archive.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Extracted {
                name,
                ..
            }
            | Self::Failed {
                name,
                ..
            } => name,
        }
    }

    /// Whether the entry was written.
    #[must_use]
    pub const fn is_extracted(&self) -> bool {
        matches!(self, Self::Extracted { .. })
    }
}

/// Result of the optional pre-install wipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WipeOutcome {
    /// No wipe was requested.
    Skipped,
    /// Every top-level entry was removed.
    Completed {
        /// Number of top-level entries removed.
        removed: usize,
    },
    /// Some entries could not be removed.
    Failed {
        /// Number of top-level entries removed.
        removed: usize,
        /// Paths that could not be removed, with the error message.
        failures: Vec<(PathBuf, String)>,
    },
}

/// Everything that happened during one install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Outcome of the wipe step.
    pub wipe: WipeOutcome,
    /// One outcome per archive entry, in archive order.
    pub entries: Vec<EntryOutcome>,
}

impl InstallReport {
    /// Number of entries written.
    #[must_use]
    pub fn extracted_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_extracted()).count()
    }

    /// Entries that were skipped.
    pub fn failures(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.entries.iter().filter(|e| !e.is_extracted())
    }

    /// Whether the wipe (if any) and every entry succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !matches!(self.wipe, WipeOutcome::Failed { .. }) && self.failures().next().is_none()
    }
}

/// Installs a downloaded package into a directory.
///
/// [`ArchiveInstaller`] is the production implementation. The trait lets the
/// update pipeline be driven with other installers, for instance ones that
/// observe the install directory while installation is in progress.
pub trait PackageInstaller: Send + Sync {
    /// Installs `archive` into `target`, wiping `target` first if `wipe_first`.
    ///
    /// Individual entry failures never fail the call; they are reported in the
    /// returned [`InstallReport`]. The archive file is deleted afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::ArchiveError`] if the archive cannot be read at
    /// all. The target directory is untouched in that case.
    fn install(
        &self,
        archive: &Path,
        target: &Path,
        wipe_first: bool,
    ) -> Result<InstallReport, LauncherError>;
}

/// Zip archive installer.
#[derive(Debug, Clone, Default)]
pub struct ArchiveInstaller {
    preserve: Vec<PathBuf>,
}

impl ArchiveInstaller {
    /// Creates an installer with no preserved paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps `path` in place when wiping.
    ///
    /// Only top-level entries of the target directory are compared. The
    /// archive being installed is always preserved until extraction is done.
    #[must_use]
    pub fn preserving(mut self, path: impl Into<PathBuf>) -> Self {
        self.preserve.push(path.into());
        self
    }

    fn install_from(
        &self,
        archive_path: &Path,
        target: &Path,
        wipe_first: bool,
    ) -> Result<InstallReport, LauncherError> {
        let archive_error = |reason: String| LauncherError::ArchiveError {
            path: archive_path.display().to_string(),
            reason,
        };

        let file = fs::File::open(archive_path).map_err(|e| archive_error(e.to_string()))?;
        let mut archive =
            ZipArchive::new(BufReader::new(file)).map_err(|e| archive_error(e.to_string()))?;
        debug!("Opened {} with {} entries", archive_path.display(), archive.len());

        let wipe = if wipe_first {
            let mut keep = self.preserve.clone();
            keep.push(archive_path.to_path_buf());
            wipe_directory(target, &keep)
        } else {
            WipeOutcome::Skipped
        };

        let entries = (0..archive.len()).map(|i| extract_entry(&mut archive, i, target)).collect();

        Ok(InstallReport {
            wipe,
            entries,
        })
    }
}

impl PackageInstaller for ArchiveInstaller {
    fn install(
        &self,
        archive: &Path,
        target: &Path,
        wipe_first: bool,
    ) -> Result<InstallReport, LauncherError> {
        info!("Installing {} into {}", archive.display(), target.display());

        // The archive handle is dropped inside install_from, before deletion.
        let result = self.install_from(archive, target, wipe_first);

        match fs::remove_file(archive) {
            Ok(()) => debug!("Removed {}", archive.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {}: {e}", archive.display()),
        }

        if let Ok(report) = &result {
            info!(
                "Extracted {} of {} entries into {}",
                report.extracted_count(),
                report.entries.len(),
                target.display()
            );
        }
        result
    }
}

fn wipe_directory(target: &Path, keep: &[PathBuf]) -> WipeOutcome {
    info!("Removing existing files in {}", target.display());

    let summary = remove_dir_contents(target, keep);
    if summary.failures.is_empty() {
        return WipeOutcome::Completed {
            removed: summary.removed,
        };
    }

    let failures = summary
        .failures
        .into_iter()
        .map(|(path, e)| {
            warn!("Failed to remove {}: {e}", path.display());
            (path, e.to_string())
        })
        .collect();

    WipeOutcome::Failed {
        removed: summary.removed,
        failures,
    }
}

fn extract_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
    target: &Path,
) -> EntryOutcome {
    let mut entry = match archive.by_index(index) {
        Ok(entry) => entry,
        Err(e) => return failed(format!("#{index}"), e.to_string()),
    };
    let name = entry.name().to_string();

    let Some(relative) = entry.enclosed_name() else {
        return failed(name, "entry path is outside the install directory".to_string());
    };
    let dest = target.join(relative);

    let result = if entry.is_dir() {
        fs::create_dir_all(&dest)
    } else {
        write_file(&mut entry, &dest)
    };

    match result {
        Ok(()) => {
            debug!("Extracted {name} to {}", dest.display());
            EntryOutcome::Extracted {
                name,
                path: dest,
            }
        }
        Err(e) => failed(name, e.to_string()),
    }
}

fn write_file(reader: &mut impl Read, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = fs::File::create(dest)?;
    io::copy(reader, &mut out)?;
    Ok(())
}

fn failed(name: String, error: String) -> EntryOutcome {
    warn!("Failed to extract: {name}. Skipping...");
    debug!("Extraction error for {name}: {error}");
    EntryOutcome::Failed {
        name,
        error,
    }
}
