//! Autoupdater - a self-updating application launcher
//!
//! On every run the launcher asks a GitHub-style release index for the latest
//! release, installs it when the locally recorded version differs, and then
//! starts the program's executable.
//!
//! # Architecture Overview
//!
//! One run is a single linear pipeline:
//!
//! ```text
//! ReleaseClient ──> Updater ──> Downloader ──> ArchiveInstaller ──> Version.txt
//!                      │
//!                      └──> Launcher ──> find_file ──> spawn
//! ```
//!
//! - A release whose tag equals the contents of `Version.txt` is skipped.
//! - Downloads stream to `update.zip` in fixed-size slices with progress.
//! - Archive entries are extracted one by one; a bad entry is skipped and
//!   reported, never fatal.
//! - `Version.txt` is rewritten only after extraction has run to completion.
//! - The executable is found by edit distance, so small renames between
//!   releases still launch.
//!
//! # Core Modules
//!
//! ## Pipeline
//! - [`release`] - Release index client and release metadata
//! - [`download`] - Streaming asset download with retry on connect errors
//! - [`installer`] - Zip extraction with optional wipe of the target directory
//! - [`update`] - The update state machine and version marker
//! - [`launcher`] - Executable discovery and process start
//!
//! ## Supporting Modules
//! - [`cli`] - Command-line flags and the run driver
//! - [`config`] - `launcher.toml` settings
//! - [`constants`] - File names, network limits and defaults
//! - [`core`] - Error types and user-facing error formatting
//! - [`utils`] - File system helpers, fuzzy file search, progress bars
//!
//! # Settings (launcher.toml)
//!
//! ```toml
//! release_endpoint = "https://api.github.com/repos/owner/app/releases/latest"
//! base_path = "app"
//! executable_name = "MyApp.exe"
//! auto_launch = false
//! wipe_before_install = false
//! asset_index = 0
//! match_threshold = 8
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! autoupdater                  # update, then ask before launching
//! autoupdater --yes            # update and launch without asking
//! autoupdater --no-launch      # update only
//! RUST_LOG=debug autoupdater   # detailed logs
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod download;
pub mod http;
pub mod installer;
pub mod launcher;
pub mod release;
pub mod update;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
