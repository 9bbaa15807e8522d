//! Launcher settings loaded from `launcher.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::constants::DEFAULT_MATCH_THRESHOLD;
use crate::core::LauncherError;

/// Settings that drive one launcher run.
///
/// The value is loaded once at startup and handed to every component by
/// reference; nothing in the pipeline looks configuration up on its own.
///
/// # TOML Example
///
/// ```toml
/// release_endpoint = "https://api.github.com/repos/owner/app/releases/latest"
/// base_path = "app"
/// executable_name = "MyApp.exe"
/// auto_launch = true
/// wipe_before_install = false
/// asset_index = 0
/// match_threshold = 8
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Release index URL queried on every run.
    #[serde(default)]
    pub release_endpoint: String,

    /// Directory the release is installed into and the executable is searched in.
    ///
    /// Relative paths are resolved against the working directory. When empty,
    /// the working directory itself is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<PathBuf>,

    /// Name of the file to start after updating.
    #[serde(default)]
    pub executable_name: String,

    /// Start the program without waiting for the user to press Enter.
    #[serde(default)]
    pub auto_launch: bool,

    /// Remove everything under `base_path` before extracting a new release.
    #[serde(default)]
    pub wipe_before_install: bool,

    /// Index of the release asset to download.
    #[serde(default)]
    pub asset_index: usize,

    /// Maximum edit distance accepted when locating the executable.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: usize,
}

fn default_match_threshold() -> usize {
    DEFAULT_MATCH_THRESHOLD
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            release_endpoint: String::new(),
            base_path: None,
            executable_name: String::new(),
            auto_launch: false,
            wipe_before_install: false,
            asset_index: 0,
            match_threshold: default_match_threshold(),
        }
    }
}

impl LauncherConfig {
    /// Load settings from `path`, writing a default file first if none exists.
    ///
    /// The freshly written defaults have no executable name, so the following
    /// [`finalize`](Self::finalize) call reports what the user has to fill in.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written, or contains
    /// invalid TOML.
    pub async fn load_or_create(path: &Path) -> Result<Self> {
        if fs::try_exists(path).await.unwrap_or(false) {
            return Self::load_from(path).await;
        }

        warn!("Couldn't load settings from {}, creating new", path.display());
        let config = Self::default();
        config.save_to(path).await?;
        Ok(config)
    }

    /// Load settings from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .map_err(LauncherError::from)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;
        debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Save settings as pretty-formatted TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings and resolve `base_path` against `working_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::ConfigError`] when `executable_name` or
    /// `release_endpoint` is empty.
    pub fn finalize(mut self, working_dir: &Path) -> Result<Self, LauncherError> {
        let base_path = match self.base_path.take() {
            Some(path) if !path.as_os_str().is_empty() => working_dir.join(path),
            _ => {
                info!("Missing base path, setting to default.");
                working_dir.to_path_buf()
            }
        };
        self.base_path = Some(base_path);

        if self.executable_name.trim().is_empty() {
            return Err(LauncherError::ConfigError {
                message: "Missing executable name".to_string(),
            });
        }

        if self.release_endpoint.trim().is_empty() {
            return Err(LauncherError::ConfigError {
                message: "Missing release endpoint".to_string(),
            });
        }

        Ok(self)
    }

    /// The install directory.
    ///
    /// Before [`finalize`](Self::finalize) this falls back to the current
    /// directory (`.`).
    #[must_use]
    pub fn install_dir(&self) -> &Path {
        self.base_path.as_deref().unwrap_or_else(|| Path::new("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> LauncherConfig {
        LauncherConfig {
            release_endpoint: "https://api.github.com/repos/o/r/releases/latest".to_string(),
            base_path: Some(PathBuf::from("app")),
            executable_name: "MyApp.exe".to_string(),
            auto_launch: true,
            wipe_before_install: true,
            asset_index: 1,
            match_threshold: 2,
        }
    }

    #[tokio::test]
    async fn test_load_or_create_writes_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("launcher.toml");

        let config = LauncherConfig::load_or_create(&path).await.unwrap();
        assert_eq!(config, LauncherConfig::default());
        assert!(path.exists());

        let reloaded = LauncherConfig::load_from(&path).await.unwrap();
        assert_eq!(reloaded.match_threshold, DEFAULT_MATCH_THRESHOLD);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/launcher.toml");

        sample().save_to(&path).await.unwrap();
        let loaded = LauncherConfig::load_from(&path).await.unwrap();
        assert_eq!(loaded, sample());
    }

    #[tokio::test]
    async fn test_load_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("launcher.toml");
        tokio::fs::write(&path, "executable_name = [").await.unwrap();

        let err = LauncherConfig::load_from(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: LauncherConfig = toml::from_str(
            r#"
release_endpoint = "http://localhost/latest"
executable_name = "app"
"#,
        )
        .unwrap();
        assert!(!config.auto_launch);
        assert!(!config.wipe_before_install);
        assert_eq!(config.asset_index, 0);
        assert_eq!(config.match_threshold, DEFAULT_MATCH_THRESHOLD);
        assert!(config.base_path.is_none());
    }

    #[test]
    fn test_finalize_resolves_base_path() {
        let working = Path::new("/work");

        let config = sample().finalize(working).unwrap();
        assert_eq!(config.install_dir(), Path::new("/work/app"));

        let mut no_base = sample();
        no_base.base_path = None;
        let config = no_base.finalize(working).unwrap();
        assert_eq!(config.install_dir(), working);
    }

    #[test]
    fn test_finalize_requires_executable_name() {
        let mut config = sample();
        config.executable_name = "  ".to_string();

        let err = config.finalize(Path::new("/work")).unwrap_err();
        assert!(matches!(err, LauncherError::ConfigError { .. }));
        assert!(err.to_string().contains("Missing executable name"));
    }
}
