//! pagegen CLI entry point
//!
//! Handles command-line argument parsing, error display, and command
//! execution. The commands:
//! - `generate` - batch-generate landing pages from the catalog
//! - `page` - materialize and print a single page by its slug triple
//! - `validate` - check a catalog file for structural problems

use anyhow::Result;
use clap::Parser;
use pagegen_cli::cli;
use pagegen_cli::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            // Convert to user-friendly error with context and suggestions
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
