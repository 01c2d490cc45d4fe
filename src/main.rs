//! gofn CLI entry point
//!
//! Parses arguments, initialises logging, runs the requested lifecycle phase
//! and reports errors with suggestions. Exit codes:
//!
//! - `0` - success (detect passed, or build completed)
//! - `1` - the build failed
//! - `100` - detect did not pass

use anyhow::Result;
use clap::Parser;
use gofn::cli;
use gofn::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.log_level());

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
