//! Command-line interface for the launcher.
//!
//! The binary takes no subcommands: every run checks for an update, installs
//! it if needed, and then starts the configured program.
//!
//! ```bash
//! # Normal run: update, then prompt before launching
//! autoupdater
//!
//! # Unattended: no prompt, no progress bar
//! autoupdater --yes --no-progress
//!
//! # Only bring the installation up to date
//! autoupdater --no-launch
//!
//! # Alternative settings file and debug logging
//! autoupdater --config ./staging.toml --verbose
//! ```
//!
//! # Logging
//!
//! Log lines go to stderr. `--verbose` selects `debug`, `--quiet` selects
//! `error`, and the default is `info`. A `RUST_LOG` value overrides all three.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::LauncherConfig;
use crate::constants::{CONFIG_FILE, VERSION_MARKER_FILE};
use crate::installer::ArchiveInstaller;
use crate::launcher::{LaunchOutcome, Launcher};
use crate::update::{UpdateOutcome, Updater};

/// Settings derived from the command line that are not part of
/// `launcher.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: String,

    /// Whether to draw a download progress bar.
    pub show_progress: bool,

    /// Settings file, relative to the working directory unless absolute.
    pub config_path: PathBuf,

    /// Whether to start the program after updating.
    pub launch: bool,

    /// Launch without waiting for Enter, whatever `auto_launch` says.
    pub assume_yes: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_progress: true,
            config_path: PathBuf::from(CONFIG_FILE),
            launch: true,
            assume_yes: false,
        }
    }
}

/// Self-updating launcher.
#[derive(Parser, Debug)]
#[command(
    name = "autoupdater",
    about = "Keep a program up to date from its latest release, then launch it",
    version,
    author,
    long_about = "Checks the configured release index for a new tag, downloads and installs the \
                  release archive when the installed version differs, and starts the program."
)]
pub struct Cli {
    /// Path to the settings file (default: launcher.toml in the working directory).
    ///
    /// A default file is written here when it does not exist yet.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,

    /// Disable the download progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Update only; do not start the program.
    #[arg(long)]
    no_launch: bool,

    /// Start the program without asking for confirmation.
    #[arg(short, long)]
    yes: bool,
}

impl Cli {
    /// Translate the parsed flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: log_level.to_string(),
            show_progress: !self.no_progress,
            config_path: self.config.clone().unwrap_or_else(|| PathBuf::from(CONFIG_FILE)),
            launch: !self.no_launch,
            assume_yes: self.yes,
        }
    }

    /// Run the launcher in the current directory, prompting on the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid, the release cannot be
    /// determined, the install task dies, or the program cannot be started.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        init_logging(&config.log_level);

        let working_dir =
            std::env::current_dir().context("Failed to determine the working directory")?;
        execute_with_config(&config, &working_dir, io::stdin().lock(), io::stdout()).await
    }
}

/// Run the launcher with an explicit configuration and working directory.
///
/// `input` and `output` carry the launch confirmation prompt.
///
/// # Errors
///
/// See [`Cli::execute`].
pub async fn execute_with_config<R: BufRead, W: Write>(
    cli: &CliConfig,
    working_dir: &Path,
    input: R,
    output: W,
) -> Result<()> {
    let config_path = working_dir.join(&cli.config_path);
    let mut settings = LauncherConfig::load_or_create(&config_path)
        .await?
        .finalize(working_dir)
        .with_context(|| format!("Invalid settings in {}", config_path.display()))?;

    if cli.assume_yes {
        settings.auto_launch = true;
    }

    let mut installer = ArchiveInstaller::new()
        .preserving(config_path.clone())
        .preserving(working_dir.join(VERSION_MARKER_FILE));
    if let Ok(exe) = std::env::current_exe() {
        installer = installer.preserving(exe);
    }

    let mut updater = Updater::new(settings.clone(), working_dir)?
        .with_installer(Arc::new(installer))
        .with_progress(cli.show_progress);

    let outcome = updater.run().await?;
    match &outcome {
        UpdateOutcome::UpToDate {
            ..
        } => debug!("Installed version '{}' is current", outcome.tag()),
        UpdateOutcome::Installed {
            report,
            ..
        } => {
            let failed = report.entries.len() - report.extracted_count();
            if failed > 0 {
                warn!("Installed '{}' with {failed} file(s) skipped", outcome.tag());
            }
        }
        UpdateOutcome::Abandoned {
            reason,
            ..
        } => warn!(
            "Continuing with the current installation; '{}' was not installed: {reason}",
            outcome.tag()
        ),
    }

    if !cli.launch {
        info!("Update finished, not launching");
        return Ok(());
    }

    match Launcher::from_config(&settings).launch(input, output)? {
        LaunchOutcome::Launched {
            path,
        } => debug!("Handed over to {}", path.display()),
        LaunchOutcome::Declined => {}
    }
    Ok(())
}

/// Install the global tracing subscriber writing to stderr.
///
/// `RUST_LOG`, when set, takes precedence over `default_level`.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}
