//! Core types for the autoupdater
//!
//! This module holds the error type shared by every pipeline stage and the
//! conversion into user-facing diagnostics.
//!
//! # Modules
//!
//! ## `error` - Error Handling
//!
//! - [`LauncherError`] - Enumerated error types covering every failure mode
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to user-friendly format
//!
//! # Error Propagation
//!
//! Components return `Result<T, LauncherError>` so the orchestrator can tell a
//! fatal failure (release index unreachable) from one that only abandons the
//! current update (download returned 404). The CLI layer works with
//! [`anyhow::Result`] and converts at the very end:
//!
//! ```rust,no_run
//! use autoupdater_cli::core::user_friendly_error;
//!
//! fn report(result: anyhow::Result<()>) {
//!     if let Err(e) = result {
//!         user_friendly_error(e).display();
//!     }
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, LauncherError, user_friendly_error};
