//! Release metadata from the upstream release index.
//!
//! The launcher only needs three things from a GitHub-style "latest release"
//! response: the tag name and each asset's download URL. Everything else in
//! the document is ignored.
//!
//! ```json
//! {
//!   "tag_name": "v2.0",
//!   "assets": [
//!     { "browser_download_url": "https://github.com/o/r/releases/download/v2.0/app.zip" }
//!   ]
//! }
//! ```
//!
//! The descriptor is fetched fresh on every run and never cached.

use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::core::LauncherError;
use crate::http::build_client;

/// A downloadable file attached to a release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssetDescriptor {
    /// Direct download URL, if the index provided one.
    #[serde(rename = "browser_download_url", default)]
    pub download_url: Option<String>,
}

/// The latest release as reported by the release index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseDescriptor {
    /// Opaque version identifier, compared by equality only.
    #[serde(rename = "tag_name")]
    pub tag: String,

    /// Assets in the order the index lists them. Absent or `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub assets: Vec<AssetDescriptor>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<AssetDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<AssetDescriptor>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ReleaseDescriptor {
    /// Parses release metadata from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::ReleaseParseError`] for malformed JSON or a
    /// missing `tag_name`.
    pub fn from_json(endpoint: &str, body: &str) -> Result<Self, LauncherError> {
        serde_json::from_str(body).map_err(|e| LauncherError::ReleaseParseError {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }

    /// The download URL of the asset at `index`.
    ///
    /// `None` when the index is out of range or the asset has no (or an
    /// empty) URL. This is a normal outcome, not an error.
    #[must_use]
    pub fn download_url(&self, index: usize) -> Option<&str> {
        self.assets
            .get(index)
            .and_then(|asset| asset.download_url.as_deref())
            .filter(|url| !url.trim().is_empty())
    }
}

/// Answer from the release index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseLookup {
    /// The index returned release metadata.
    Found(ReleaseDescriptor),
    /// The index answered with a non-success status, so whether an update is
    /// needed cannot be determined.
    Unavailable {
        /// HTTP status code returned.
        status: u16,
    },
}

/// Client for the release index.
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    client: reqwest::Client,
}

impl ReleaseClient {
    /// Create a client with the launcher's user agent.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new() -> Result<Self, LauncherError> {
        Ok(Self {
            client: build_client()?,
        })
    }

    /// Create a client around an existing [`reqwest::Client`].
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
        }
    }

    /// Fetch the latest release from `endpoint`.
    ///
    /// Issues a single GET requesting JSON.
    ///
    /// A non-success status is not an error; it is reported as
    /// [`ReleaseLookup::Unavailable`] and left to the caller.
    ///
    /// # Errors
    ///
    /// - [`LauncherError::NetworkError`] if the request or body read fails
    /// - [`LauncherError::ReleaseParseError`] if the body is not release metadata
    pub async fn fetch_latest_release(
        &self,
        endpoint: &str,
    ) -> Result<ReleaseLookup, LauncherError> {
        debug!("Fetching latest release from {endpoint}");

        let response = self
            .client
            .get(endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| LauncherError::NetworkError {
                operation: format!("fetch release from {endpoint}"),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Release index returned {status} for {endpoint}");
            return Ok(ReleaseLookup::Unavailable {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| LauncherError::NetworkError {
            operation: format!("read release from {endpoint}"),
            reason: e.to_string(),
        })?;

        let release = ReleaseDescriptor::from_json(endpoint, &body)?;
        debug!("Latest release is '{}' with {} asset(s)", release.tag, release.assets.len());
        Ok(ReleaseLookup::Found(release))
    }
}
