//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`fs`] - Directory creation, atomic writes, and directory wiping
//! - [`locate`] - Fuzzy file discovery by edit distance
//! - [`progress`] - Progress bars for downloads
//!
//! # Example
//!
//! ```rust,no_run
//! use autoupdater_cli::utils::{atomic_write, find_file};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! atomic_write(Path::new("Version.txt"), b"v2.0")?;
//! let exe = find_file(Path::new("app"), "MyApp.exe", 8);
//! # Ok(())
//! # }
//! ```

pub mod fs;
pub mod locate;
pub mod progress;

pub use fs::{atomic_write, ensure_dir, remove_dir_contents};
pub use locate::{edit_distance, find_file};
pub use progress::{ProgressBar, ProgressStyle};
