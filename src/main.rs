//! Wydra CLI entry point
//!
//! Parses arguments, runs the selected command and turns failures into a
//! readable message with a suggestion where one is known.
//!
//! - `render` - Expand markers in a text file
//! - `list` - List registered markers and their aliases
//! - `resolve` - Show what a marker spelling resolves to
//! - `init` - Create a default wydra.toml

use anyhow::Result;
use clap::Parser;
use wydra::cli;
use wydra::core::error::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
