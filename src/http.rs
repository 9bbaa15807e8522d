//! Shared HTTP client construction.

use crate::constants::{CONNECT_TIMEOUT, USER_AGENT};
use crate::core::LauncherError;

/// Builds the HTTP client used for the release index and asset downloads.
///
/// Every request carries the fixed [`USER_AGENT`]; GitHub rejects anonymous
/// clients without one.
///
/// # Errors
///
/// Returns [`LauncherError::NetworkError`] if the TLS backend cannot be
/// initialised.
pub fn build_client() -> Result<reqwest::Client, LauncherError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|e| LauncherError::NetworkError {
            operation: "build HTTP client".to_string(),
            reason: e.to_string(),
        })
}
