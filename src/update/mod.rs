//! The update pipeline.
//!
//! [`Updater::run`] performs one linear pass:
//!
//! ```text
//! fetch release ──> read marker ──> compare ──> download ──> install ──> commit marker
//!        │                             │            │            │
//!        └─ fatal                      └─ equal:    └─ abandon   └─ abandon (unreadable archive)
//!                                         up to date                fatal (install task died)
//! ```
//!
//! The run never exits the process. It hands back an [`UpdateOutcome`] when
//! the caller should go on to launch, or a [`LauncherError`] when it should
//! not.
//!
//! # Marker Ordering
//!
//! The version marker is written only after the installer has returned,
//! whatever its per-entry results. If installation is interrupted the marker
//! keeps its previous value and the next run retries.
//!
//! # State Files
//!
//! The marker (`Version.txt`) and the temporary archive (`update.zip`) live in
//! the state directory, normally the working directory.

mod marker;

pub use marker::{InstalledVersion, VersionMarker};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::LauncherConfig;
use crate::constants::{UPDATE_ARCHIVE_FILE, VERSION_MARKER_FILE};
use crate::core::LauncherError;
use crate::download::{DownloadProgress, Downloader};
use crate::http::build_client;
use crate::installer::{ArchiveInstaller, InstallReport, PackageInstaller};
use crate::release::{ReleaseClient, ReleaseDescriptor, ReleaseLookup};
use crate::utils::progress::ProgressBar;

/// Where the pipeline currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    /// Fetching the latest release.
    Checking,
    /// Release fetched; no version marker on disk.
    NoMarker,
    /// Release fetched; a version marker was found.
    MarkerPresent,
    /// The installed version differs from the release, or nothing is installed.
    UpdateNeeded,
    /// Downloading and installing.
    Updating,
    /// Nothing (more) to do; ready to launch.
    UpToDate,
    /// The run failed and nothing should be launched.
    Failed,
}

/// How a completed run ended.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// The installed version already matched the release.
    UpToDate {
        /// Release tag.
        tag: String,
    },
    /// The release was installed and the marker updated.
    Installed {
        /// Release tag now recorded in the marker.
        tag: String,
        /// Per-entry results of the install.
        report: InstallReport,
    },
    /// An update was needed but could not be completed. The existing
    /// installation is left for launching.
    Abandoned {
        /// Release tag that was not installed.
        tag: String,
        /// Why the update was given up.
        reason: LauncherError,
    },
}

impl UpdateOutcome {
    /// Release tag the run was about.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::UpToDate {
                tag,
            }
            | Self::Installed {
                tag,
                ..
            }
            | Self::Abandoned {
                tag,
                ..
            } => tag,
        }
    }
}

/// Checks for, downloads and installs new releases.
///
/// # Examples
///
/// ```rust,no_run
/// use autoupdater_cli::config::LauncherConfig;
/// use autoupdater_cli::update::Updater;
///
/// # async fn example(config: LauncherConfig) -> anyhow::Result<()> {
/// let mut updater = Updater::new(config, std::env::current_dir()?)?;
/// let outcome = updater.run().await?;
/// println!("Ready to launch {}", outcome.tag());
/// # Ok(())
/// # }
/// ```
pub struct Updater {
    config: LauncherConfig,
    releases: ReleaseClient,
    downloader: Downloader,
    installer: Arc<dyn PackageInstaller>,
    state_dir: PathBuf,
    show_progress: bool,
    state: UpdateState,
}

impl Updater {
    /// Creates an updater keeping its marker and archive in `state_dir`.
    ///
    /// The release index and the asset download share one HTTP client.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(config: LauncherConfig, state_dir: impl Into<PathBuf>) -> Result<Self, LauncherError> {
        let client = build_client()?;
        Ok(Self {
            config,
            releases: ReleaseClient::with_client(client.clone()),
            downloader: Downloader::with_client(client),
            installer: Arc::new(ArchiveInstaller::new()),
            state_dir: state_dir.into(),
            show_progress: false,
            state: UpdateState::Checking,
        })
    }

    /// Replaces the installer.
    #[must_use]
    pub fn with_installer(mut self, installer: Arc<dyn PackageInstaller>) -> Self {
        self.installer = installer;
        self
    }

    /// Shows a progress bar while downloading.
    #[must_use]
    pub const fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Current pipeline state.
    #[must_use]
    pub const fn state(&self) -> UpdateState {
        self.state
    }

    /// The version marker this updater reads and writes.
    #[must_use]
    pub fn marker(&self) -> VersionMarker {
        VersionMarker::new(self.state_dir.join(VERSION_MARKER_FILE))
    }

    /// Where the downloaded archive is stored until it is installed.
    #[must_use]
    pub fn archive_path(&self) -> PathBuf {
        self.state_dir.join(UPDATE_ARCHIVE_FILE)
    }

    /// Runs the pipeline once.
    ///
    /// # Errors
    ///
    /// Fails, and nothing should be launched, when:
    /// - the release index cannot be reached ([`LauncherError::NetworkError`])
    /// - it answers with an error status ([`LauncherError::ReleaseUnavailable`])
    /// - its answer is not release metadata ([`LauncherError::ReleaseParseError`])
    /// - the install task dies before returning ([`LauncherError::InstallAborted`])
    ///
    /// Download and archive problems do not fail the run; they produce
    /// [`UpdateOutcome::Abandoned`].
    pub async fn run(&mut self) -> Result<UpdateOutcome, LauncherError> {
        let release = match self.fetch_release().await {
            Ok(release) => release,
            Err(e) => {
                self.transition(UpdateState::Failed);
                return Err(e);
            }
        };

        let marker = self.marker();
        match marker.read().await {
            None => {
                self.transition(UpdateState::NoMarker);
                info!("No installed version found");
                self.transition(UpdateState::UpdateNeeded);
            }
            Some(installed) => {
                self.transition(UpdateState::MarkerPresent);
                if installed.matches(&release.tag) {
                    self.transition(UpdateState::UpToDate);
                    info!("No update needed, opening file..");
                    return Ok(UpdateOutcome::UpToDate {
                        tag: release.tag,
                    });
                }
                info!("Installed version '{installed}' differs from '{}'", release.tag);
                self.transition(UpdateState::UpdateNeeded);
            }
        }

        self.transition(UpdateState::Updating);
        let result = self.update_to(&release, &marker).await;

        match result {
            Ok(report) => {
                self.transition(UpdateState::UpToDate);
                info!("Installation Complete. Launching program..");
                Ok(UpdateOutcome::Installed {
                    tag: release.tag,
                    report,
                })
            }
            Err(e) if e.abandons_update() => {
                warn!("Update to '{}' abandoned: {e}", release.tag);
                self.transition(UpdateState::UpToDate);
                Ok(UpdateOutcome::Abandoned {
                    tag: release.tag,
                    reason: e,
                })
            }
            Err(e) => {
                self.transition(UpdateState::Failed);
                Err(e)
            }
        }
    }

    async fn fetch_release(&self) -> Result<ReleaseDescriptor, LauncherError> {
        let endpoint = &self.config.release_endpoint;
        match self.releases.fetch_latest_release(endpoint).await? {
            ReleaseLookup::Found(release) => Ok(release),
            ReleaseLookup::Unavailable {
                status,
            } => Err(LauncherError::ReleaseUnavailable {
                endpoint: endpoint.clone(),
                status,
            }),
        }
    }

    async fn update_to(
        &self,
        release: &ReleaseDescriptor,
        marker: &VersionMarker,
    ) -> Result<InstallReport, LauncherError> {
        let index = self.config.asset_index;
        let Some(url) = release.download_url(index) else {
            error!("Failed to get download url");
            return Err(LauncherError::AssetNotFound {
                tag: release.tag.clone(),
                index,
            });
        };

        let archive = self.archive_path();
        self.download(url, &archive, &release.tag).await?;

        let installer = Arc::clone(&self.installer);
        let target = self.config.install_dir().to_path_buf();
        let wipe = self.config.wipe_before_install;
        let archive_for_task = archive.clone();

        let report = tokio::task::spawn_blocking(move || {
            installer.install(&archive_for_task, &target, wipe)
        })
        .await
        .map_err(|e| LauncherError::InstallAborted {
            tag: release.tag.clone(),
            reason: e.to_string(),
        })??;

        for failure in report.failures() {
            debug!("Skipped entry {}", failure.name());
        }

        // Entry failures do not block the commit; see the module docs.
        match marker.commit(&release.tag).await {
            Ok(()) => info!("Update likely needed, updated to version tag '{}'", release.tag),
            Err(e) => error!("Failed to record installed version '{}': {e}", release.tag),
        }

        Ok(report)
    }

    async fn download(&self, url: &str, archive: &Path, tag: &str) -> Result<(), LauncherError> {
        info!("Downloading {url}");

        let show_progress = self.show_progress;
        let mut bar: Option<ProgressBar> = None;

        let result = self
            .downloader
            .download(url, archive, |progress: DownloadProgress| {
                let bar = bar.get_or_insert_with(|| {
                    let bar = if show_progress {
                        ProgressBar::for_download(progress.total)
                    } else {
                        ProgressBar::hidden()
                    };
                    bar.set_message(format!("Downloading {tag}"));
                    bar
                });
                bar.set_position(progress.bytes_read);
            })
            .await;

        if let Some(bar) = bar {
            if result.is_ok() {
                bar.finish_with_message(format!("Downloaded {tag}"));
            } else {
                bar.finish_and_clear();
            }
        }

        result.map(|_| ())
    }

    fn transition(&mut self, next: UpdateState) {
        debug!("Update state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
