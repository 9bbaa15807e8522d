//! Progress indicators for downloads.
//!
//! Wraps `indicatif` with the launcher's styling. A byte-based bar is used
//! when the server announces the content length; otherwise a spinner shows the
//! bytes transferred so far, since no percentage can be computed.
//!
//! # Environment Variables
//!
//! - `AUTOUPDATER_NO_PROGRESS`: Set to any value to disable all progress indicators
//!
//! # Examples
//!
//! ```rust
//! use autoupdater_cli::utils::progress::ProgressBar;
//!
//! let progress = ProgressBar::for_download(Some(1024));
//! progress.set_position(512);
//! progress.finish_and_clear();
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

use crate::constants::NO_PROGRESS_ENV;

/// Checks if progress bars should be disabled.
fn is_progress_disabled() -> bool {
    std::env::var(NO_PROGRESS_ENV).is_ok()
}

/// A progress bar with consistent styling.
///
/// Hidden automatically when `AUTOUPDATER_NO_PROGRESS` is set, in which case
/// every method is a no-op.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a progress indicator for a download of `total` bytes.
    ///
    /// With `None` a spinner is created that reports transferred bytes only.
    pub fn for_download(total: Option<u64>) -> Self {
        if is_progress_disabled() {
            return Self::hidden();
        }

        let bar = match total {
            Some(len) if len > 0 => {
                let bar = IndicatifBar::new(len);
                bar.set_style(ProgressStyle::download());
                bar
            }
            _ => {
                let bar = IndicatifBar::new_spinner();
                bar.set_style(ProgressStyle::download_unknown());
                bar.enable_steady_tick(Duration::from_millis(100));
                bar
            }
        };
        Self { inner: bar }
    }

    /// Creates a progress bar that never draws anything.
    pub fn hidden() -> Self {
        Self {
            inner: IndicatifBar::hidden(),
        }
    }

    /// Sets the message displayed alongside the progress bar.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Sets the current progress position directly.
    pub fn set_position(&self, pos: u64) {
        self.inner.set_position(pos);
    }

    /// Finishes the progress bar and displays a completion message.
    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.inner.finish_with_message(msg.into());
    }

    /// Finishes the progress bar and clears it from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

/// Pre-configured progress styles.
pub struct ProgressStyle;

impl ProgressStyle {
    /// Byte-based bar with percentage and ETA.
    ///
    /// ```text
    /// [━━━━━━━━━━━━━━━━━━━━╸━━━━━━━━━━━━━━━━━━━] 52% 2.1MiB/4.0MiB (00:05)
    /// ```
    pub fn download() -> IndicatifStyle {
        IndicatifStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {percent}% {bytes}/{total_bytes} ({eta})")
            .unwrap_or_else(|_| IndicatifStyle::default_bar())
            .progress_chars("━╸━")
    }

    /// Spinner for downloads of unknown length.
    ///
    /// ```text
    /// ⠋ Downloading 2.1MiB
    /// ```
    pub fn download_unknown() -> IndicatifStyle {
        IndicatifStyle::default_spinner()
            .template("{spinner:.cyan} {msg} {bytes}")
            .unwrap_or_else(|_| IndicatifStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
    }
}
