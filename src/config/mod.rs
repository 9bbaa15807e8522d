//! Configuration for the launcher.
//!
//! Settings live in a TOML file in the working directory (`launcher.toml` by
//! default, overridable with `--config`). A default file is written on first
//! run so users have something to edit.
//!
//! # Lifecycle
//!
//! ```text
//! load_or_create(path) -> LauncherConfig -> finalize(working_dir) -> passed to Updater/Launcher
//! ```
//!
//! After [`LauncherConfig::finalize`] the value is read-only for the rest of the
//! run.

mod settings;

pub use settings::LauncherConfig;
