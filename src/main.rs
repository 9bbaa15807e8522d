//! Autoupdater CLI entry point
//!
//! Parses arguments, runs the update-then-launch pipeline, and turns any
//! failure into a readable message and exit status 1.

use anyhow::Result;
use autoupdater_cli::cli;
use autoupdater_cli::core::error::user_friendly_error;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
