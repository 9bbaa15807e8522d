//! The installed-version marker file.
//!
//! A plain text file holding exactly the tag of the last installed release.
//! Its absence means nothing has been installed yet.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::LauncherError;
use crate::utils::fs::atomic_write;

/// Contents of the marker file, kept as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledVersion(Vec<u8>);

impl InstalledVersion {
    /// Byte-for-byte comparison with a release tag.
    #[must_use]
    pub fn matches(&self, tag: &str) -> bool {
        self.0 == tag.as_bytes()
    }
}

impl fmt::Display for InstalledVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Handle to the marker file at a fixed path.
#[derive(Debug, Clone)]
pub struct VersionMarker {
    path: PathBuf,
}

impl VersionMarker {
    /// Marker stored at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Location of the marker file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the installed version.
    ///
    /// Returns `None` when the marker does not exist. A marker that exists but
    /// cannot be read is logged and also treated as absent, which forces a
    /// reinstall.
    pub async fn read(&self) -> Option<InstalledVersion> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Some(InstalledVersion(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read {}: {e}", self.path.display());
                None
            }
        }
    }

    /// Records `tag` as installed, replacing the file atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker cannot be written.
    pub async fn commit(&self, tag: &str) -> Result<(), LauncherError> {
        let path = self.path.clone();
        let content = tag.as_bytes().to_vec();

        tokio::task::spawn_blocking(move || atomic_write(&path, &content))
            .await
            .map_err(|e| LauncherError::Other {
                message: format!("Task join error while writing version marker: {e}"),
            })?
            .map_err(|e| LauncherError::Other {
                message: format!("{e:#}"),
            })?;

        debug!("Recorded installed version '{tag}' in {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_marker_reads_as_none() {
        let temp = tempdir().unwrap();
        let marker = VersionMarker::new(temp.path().join("Version.txt"));
        assert_eq!(marker.read().await, None);
    }

    #[tokio::test]
    async fn test_commit_then_read() {
        let temp = tempdir().unwrap();
        let marker = VersionMarker::new(temp.path().join("Version.txt"));

        marker.commit("v2.0").await.unwrap();
        assert_eq!(std::fs::read_to_string(marker.path()).unwrap(), "v2.0");

        let installed = marker.read().await.unwrap();
        assert!(installed.matches("v2.0"));
        assert_eq!(installed.to_string(), "v2.0");

        marker.commit("v1.9").await.unwrap();
        assert!(marker.read().await.unwrap().matches("v1.9"));
    }

    #[tokio::test]
    async fn test_comparison_is_exact() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("Version.txt");
        std::fs::write(&path, "v2.0\n").unwrap();

        let installed = VersionMarker::new(&path).read().await.unwrap();
        assert!(!installed.matches("v2.0"));
        assert!(!installed.matches("V2.0\n"));
        assert!(installed.matches("v2.0\n"));
    }
}
