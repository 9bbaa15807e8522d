//! Error handling for the autoupdater
//!
//! This module provides the error type shared by every stage of the update
//! pipeline and the user-facing error reporting used by the CLI. The error
//! system follows two principles:
//! 1. **Strongly-typed errors** so the orchestrator can branch on the failing
//!    stage (fatal vs. "abandon the update and launch anyway")
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`LauncherError`] - Enumerated error types for all failure cases
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Error Categories
//!
//! - **Release index**: [`LauncherError::ReleaseUnavailable`], [`LauncherError::ReleaseParseError`]
//! - **Download**: [`LauncherError::DownloadFailed`], [`LauncherError::AssetNotFound`]
//! - **Install**: [`LauncherError::ArchiveError`], [`LauncherError::InstallAborted`]
//! - **Launch**: [`LauncherError::ExecutableNotFound`], [`LauncherError::LaunchFailed`]
//! - **Configuration**: [`LauncherError::ConfigError`], [`LauncherError::TomlError`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use autoupdater_cli::core::{LauncherError, user_friendly_error};
//!
//! let error = LauncherError::ReleaseUnavailable {
//!     endpoint: "https://api.github.com/repos/o/r/releases/latest".to_string(),
//!     status: 404,
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for autoupdater operations
///
/// Each variant names the stage that failed so callers can decide whether the
/// failure is fatal to the run or only abandons the current update attempt.
///
/// ## Fatal to the run
/// - [`NetworkError`] while fetching the release index
/// - [`ReleaseUnavailable`] - release index answered with a non-success status
/// - [`ReleaseParseError`] - release metadata is not valid JSON
/// - [`InstallAborted`] - the install task died before returning
/// - [`ExecutableNotFound`] - nothing to launch
/// - [`ConfigError`] - invalid configuration at startup
///
/// ## Abandon the update, launch anyway
/// - [`AssetNotFound`] - no usable download URL at the configured index
/// - [`DownloadFailed`] - asset download answered with a non-success status
/// - [`ArchiveError`] - downloaded file is not a readable archive
///
/// [`NetworkError`]: LauncherError::NetworkError
/// [`ReleaseUnavailable`]: LauncherError::ReleaseUnavailable
/// [`ReleaseParseError`]: LauncherError::ReleaseParseError
/// [`InstallAborted`]: LauncherError::InstallAborted
/// [`ExecutableNotFound`]: LauncherError::ExecutableNotFound
/// [`ConfigError`]: LauncherError::ConfigError
/// [`AssetNotFound`]: LauncherError::AssetNotFound
/// [`DownloadFailed`]: LauncherError::DownloadFailed
/// [`ArchiveError`]: LauncherError::ArchiveError
#[derive(Error, Debug)]
pub enum LauncherError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Network error
    #[error("Network error: {operation}")]
    NetworkError {
        /// The network operation that failed
        operation: String,
        /// Reason for the network failure
        reason: String,
    },

    /// The release index answered with a non-success status
    #[error("No release available from {endpoint} (HTTP {status})")]
    ReleaseUnavailable {
        /// Release index URL
        endpoint: String,
        /// HTTP status code returned
        status: u16,
    },

    /// The release index returned a body that is not valid release metadata
    #[error("Invalid release metadata from {endpoint}")]
    ReleaseParseError {
        /// Release index URL
        endpoint: String,
        /// Parser error message
        reason: String,
    },

    /// The configured asset index does not resolve to a download URL
    #[error("No download URL for asset #{index} of release '{tag}'")]
    AssetNotFound {
        /// Release tag
        tag: String,
        /// Configured asset index
        index: usize,
    },

    /// The asset download answered with a non-success status
    #[error("Download failed with status {status}: {reason}")]
    DownloadFailed {
        /// HTTP status code returned
        status: u16,
        /// Canonical reason phrase for the status
        reason: String,
    },

    /// The downloaded file could not be opened as an archive
    #[error("Cannot read archive {path}")]
    ArchiveError {
        /// Archive path
        path: String,
        /// Reason reported by the archive reader
        reason: String,
    },

    /// The install task terminated before reporting back
    #[error("Installation of '{tag}' was interrupted")]
    InstallAborted {
        /// Release tag being installed
        tag: String,
        /// Reason the task terminated
        reason: String,
    },

    /// No file close enough to the executable name was found
    #[error("Failed to find launch file '{name}' under {path}")]
    ExecutableNotFound {
        /// Configured executable name
        name: String,
        /// Directory that was searched
        path: String,
    },

    /// The executable was found but could not be started
    #[error("Failed to launch {path}")]
    LaunchFailed {
        /// Path to the executable
        path: String,
        /// OS error message
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Generic error with a message
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl LauncherError {
    /// Whether this failure only abandons the current update attempt.
    ///
    /// Recoverable failures leave the existing installation untouched, so the
    /// run can still launch whatever is installed.
    #[must_use]
    pub const fn abandons_update(&self) -> bool {
        matches!(
            self,
            Self::AssetNotFound { .. }
                | Self::DownloadFailed { .. }
                | Self::ArchiveError { .. }
                | Self::NetworkError { .. }
                | Self::IoError(_)
        )
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// Combines a [`LauncherError`] with optional details and a suggestion. It is
/// what `main` prints before exiting with a failure status.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: LauncherError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: LauncherError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    ///
    /// Suggestions are displayed in green in the terminal.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    ///
    /// Details are displayed in yellow in the terminal.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`LauncherError`] (anywhere in the chain), [`std::io::Error`],
/// and [`toml::de::Error`]; anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(launcher_error) = cause.downcast_ref::<LauncherError>() {
            return create_error_context(launcher_error);
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(LauncherError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check ownership of the install directory or run with elevated permissions")
                .with_details("The launcher must be able to write to its working directory and base path");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(LauncherError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the configured paths exist");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(LauncherError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of launcher.toml. Verify quotes and key names");
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(LauncherError::Other {
        message,
    })
}

/// Map each [`LauncherError`] to an [`ErrorContext`] naming the failing stage.
fn create_error_context(error: &LauncherError) -> ErrorContext {
    match error {
        LauncherError::ConfigError { message } => ErrorContext::new(LauncherError::ConfigError {
            message: message.clone(),
        })
        .with_suggestion("Edit launcher.toml and set 'executable_name' to the program to start")
        .with_details("A default launcher.toml is created in the working directory on first run"),

        LauncherError::NetworkError { operation, reason } => {
            ErrorContext::new(LauncherError::NetworkError {
                operation: operation.clone(),
                reason: reason.clone(),
            })
            .with_suggestion("Check your internet connection and the configured 'release_endpoint'")
            .with_details(reason.clone())
        }

        LauncherError::ReleaseUnavailable { endpoint, status } => {
            ErrorContext::new(LauncherError::ReleaseUnavailable {
                endpoint: endpoint.clone(),
                status: *status,
            })
            .with_suggestion("Verify the repository exists and has a published release")
            .with_details("The launcher cannot decide whether an update is needed without release information")
        }

        LauncherError::ReleaseParseError { endpoint, reason } => {
            ErrorContext::new(LauncherError::ReleaseParseError {
                endpoint: endpoint.clone(),
                reason: reason.clone(),
            })
            .with_suggestion("Point 'release_endpoint' at a GitHub 'releases/latest' API URL")
            .with_details(reason.clone())
        }

        LauncherError::ExecutableNotFound { name, path } => {
            ErrorContext::new(LauncherError::ExecutableNotFound {
                name: name.clone(),
                path: path.clone(),
            })
            .with_suggestion("Check 'executable_name' and 'base_path' in launcher.toml, or delete Version.txt to force a reinstall")
            .with_details("No file name under the base path was within the configured match threshold")
        }

        LauncherError::LaunchFailed { path, reason } => ErrorContext::new(LauncherError::LaunchFailed {
            path: path.clone(),
            reason: reason.clone(),
        })
        .with_suggestion("Make sure the file is executable on this platform")
        .with_details(reason.clone()),

        LauncherError::InstallAborted { tag, reason } => {
            ErrorContext::new(LauncherError::InstallAborted {
                tag: tag.clone(),
                reason: reason.clone(),
            })
            .with_suggestion("Run the launcher again; the update is retried because Version.txt was not changed")
            .with_details(reason.clone())
        }

        other => ErrorContext::new(LauncherError::Other {
            message: other.to_string(),
        }),
    }
}
