//! Streaming download of release assets.
//!
//! The response body is written to disk as it arrives, in slices of at most
//! [`DOWNLOAD_BUFFER_SIZE`] bytes, so memory use stays flat regardless of the
//! asset size. A progress callback fires after every slice.
//!
//! Only the connection step is retried. Once a response has been received its
//! status is final, and a stream that breaks mid-way is reported as-is; the
//! next run starts the download again from scratch.

use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_retry::RetryIf;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::{debug, warn};

use crate::constants::{
    DOWNLOAD_BUFFER_SIZE, DOWNLOAD_RETRY_ATTEMPTS, MAX_BACKOFF_DELAY, STARTING_BACKOFF_DELAY_MS,
};
use crate::core::LauncherError;
use crate::http::build_client;

/// Snapshot of a running download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    /// Bytes written to the destination so far.
    pub bytes_read: u64,
    /// Total length announced by the server, if any.
    pub total: Option<u64>,
}

impl DownloadProgress {
    /// Completed percentage, or `None` when the total length is unknown or zero.
    #[must_use]
    pub fn percentage(&self) -> Option<u8> {
        match self.total {
            Some(total) if total > 0 => {
                let pct = self.bytes_read.min(total).saturating_mul(100) / total;
                u8::try_from(pct).ok()
            }
            _ => None,
        }
    }
}

/// Downloads a single HTTP resource to a local file.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
}

impl Downloader {
    /// Create a downloader with the launcher's user agent.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new() -> Result<Self, LauncherError> {
        Ok(Self {
            client: build_client()?,
        })
    }

    /// Create a downloader around an existing [`reqwest::Client`].
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
        }
    }

    /// Download `url` into `destination`, overwriting any existing file.
    ///
    /// `on_progress` is called after every slice written.
    ///
    /// # Errors
    ///
    /// - [`LauncherError::DownloadFailed`] if the server answers with a
    ///   non-success status. The destination is not created in that case.
    /// - [`LauncherError::NetworkError`] if the connection cannot be opened
    ///   after retries or the body stream breaks.
    /// - [`LauncherError::IoError`] if the destination cannot be written.
    ///
    /// On a mid-stream failure the partially written file is left on disk.
    pub async fn download<F>(
        &self,
        url: &str,
        destination: &Path,
        mut on_progress: F,
    ) -> Result<PathBuf, LauncherError>
    where
        F: FnMut(DownloadProgress),
    {
        debug!("Downloading {url} to {}", destination.display());

        let mut response = self.open(url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let total = response.content_length();
        let mut file = File::create(destination).await?;
        let mut bytes_read = 0u64;

        while let Some(chunk) = response.chunk().await.map_err(|e| LauncherError::NetworkError {
            operation: format!("read download body from {url}"),
            reason: e.to_string(),
        })? {
            for slice in chunk.chunks(DOWNLOAD_BUFFER_SIZE) {
                file.write_all(slice).await?;
                bytes_read += slice.len() as u64;
                on_progress(DownloadProgress {
                    bytes_read,
                    total,
                });
            }
        }

        file.flush().await?;
        debug!("Downloaded {bytes_read} bytes to {}", destination.display());
        Ok(destination.to_path_buf())
    }

    /// Send the GET, retrying connection-level failures with backoff.
    async fn open(&self, url: &str) -> Result<reqwest::Response, LauncherError> {
        let strategy = ExponentialBackoff::from_millis(STARTING_BACKOFF_DELAY_MS)
            .max_delay(MAX_BACKOFF_DELAY)
            .take(DOWNLOAD_RETRY_ATTEMPTS);

        RetryIf::spawn(
            strategy,
            || self.client.get(url).send(),
            |e: &reqwest::Error| {
                let retry = e.is_connect() || e.is_timeout();
                if retry {
                    warn!("Connection to {url} failed, retrying: {e}");
                }
                retry
            },
        )
        .await
        .map_err(|e| LauncherError::NetworkError {
            operation: format!("download {url}"),
            reason: e.to_string(),
        })
    }
}
