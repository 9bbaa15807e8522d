//! Global constants used throughout the autoupdater codebase.
//!
//! This module contains file names, network parameters, and other numeric
//! constants that are shared by the update pipeline and the CLI. Defining
//! them centrally makes the on-disk layout and retry behavior discoverable.

use std::time::Duration;

/// User agent sent with every HTTP request.
///
/// The GitHub releases API rejects requests that do not identify themselves.
pub const USER_AGENT: &str = "GithubAutoUpdater";

/// File name of the installed-version marker, relative to the working directory.
pub const VERSION_MARKER_FILE: &str = "Version.txt";

/// File name of the temporary downloaded archive, relative to the working directory.
pub const UPDATE_ARCHIVE_FILE: &str = "update.zip";

/// Default configuration file name, relative to the working directory.
pub const CONFIG_FILE: &str = "launcher.toml";

/// Size of the slices the download body is written in (8 KiB).
///
/// Keeps memory bounded for arbitrarily large release assets.
pub const DOWNLOAD_BUFFER_SIZE: usize = 8 * 1024;

/// Default maximum edit distance for executable discovery.
pub const DEFAULT_MATCH_THRESHOLD: usize = 8;

/// Starting delay for exponential backoff when opening a download (100ms).
pub const STARTING_BACKOFF_DELAY_MS: u64 = 100;

/// Maximum backoff delay between download connection attempts (2s).
pub const MAX_BACKOFF_DELAY: Duration = Duration::from_secs(2);

/// Number of retries after the first failed connection attempt.
pub const DOWNLOAD_RETRY_ATTEMPTS: usize = 2;

/// Timeout for establishing an HTTP connection (30 seconds).
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable that disables progress indicators when set.
pub const NO_PROGRESS_ENV: &str = "AUTOUPDATER_NO_PROGRESS";
