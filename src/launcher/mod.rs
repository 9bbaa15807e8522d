//! Starting the installed program.
//!
//! The executable is located by fuzzy name match under the install directory,
//! so a release that renames `MyApp.exe` to `MyApp2.exe` still launches.
//! Unless auto-launch is enabled the user confirms with Enter first.
//!
//! The program is started detached, with its own directory as working
//! directory, and the launcher does not wait for it.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::config::LauncherConfig;
use crate::core::LauncherError;
use crate::utils::locate::find_file;

/// Result of a launch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The program was started.
    Launched {
        /// Executable that was started.
        path: PathBuf,
    },
    /// The user did not confirm the launch.
    Declined,
}

/// Finds and starts the configured executable.
#[derive(Debug, Clone)]
pub struct Launcher {
    install_dir: PathBuf,
    executable_name: String,
    match_threshold: usize,
    auto_launch: bool,
}

impl Launcher {
    /// Launcher for the executable described by `config`.
    #[must_use]
    pub fn from_config(config: &LauncherConfig) -> Self {
        Self {
            install_dir: config.install_dir().to_path_buf(),
            executable_name: config.executable_name.clone(),
            match_threshold: config.match_threshold,
            auto_launch: config.auto_launch,
        }
    }

    /// Finds the executable under the install directory.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::ExecutableNotFound`] when no file name is
    /// within the match threshold.
    pub fn locate(&self) -> Result<PathBuf, LauncherError> {
        find_file(&self.install_dir, &self.executable_name, self.match_threshold).ok_or_else(|| {
            LauncherError::ExecutableNotFound {
                name: self.executable_name.clone(),
                path: self.install_dir.display().to_string(),
            }
        })
    }

    /// Locates the executable, asks for confirmation if needed, and starts it.
    ///
    /// `input` and `output` are used for the confirmation prompt only.
    ///
    /// # Errors
    ///
    /// - [`LauncherError::ExecutableNotFound`] if there is nothing to run
    /// - [`LauncherError::LaunchFailed`] if the process cannot be started
    pub fn launch<R: BufRead, W: Write>(
        &self,
        input: R,
        output: W,
    ) -> Result<LaunchOutcome, LauncherError> {
        let path = self.locate()?;

        if !self.auto_launch && !confirm_launch(input, output)? {
            info!("Launch cancelled");
            return Ok(LaunchOutcome::Declined);
        }

        start_detached(&path)?;
        info!("Launched {}", path.display());
        Ok(LaunchOutcome::Launched {
            path,
        })
    }
}

/// Prompts on `output` and waits for a line on `input`.
///
/// Confirms only when the line is empty, that is the user pressed Enter and
/// nothing else. End of input declines.
///
/// # Errors
///
/// Returns an error if the prompt cannot be written or input cannot be read.
pub fn confirm_launch<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<bool> {
    writeln!(output, "Press Enter to launch program")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(line.trim_end_matches(['\r', '\n']).is_empty())
}

fn start_detached(path: &Path) -> Result<(), LauncherError> {
    let mut command = Command::new(path);
    if let Some(dir) = path.parent() {
        command.current_dir(dir);
    }

    let child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| LauncherError::LaunchFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    debug!("Started process {} for {}", child.id(), path.display());
    Ok(())
}
