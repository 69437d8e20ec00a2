//! Command-line interface for Wydra.
//!
//! Every subcommand lives in its own module and exposes an `execute` method
//! taking the loaded [`EngineConfig`]. Global flags are turned into a
//! [`CliConfig`] first so logging is set up before any command runs.
//!
//! # Commands
//!
//! - `render` - expand markers in a text file
//! - `list` - show the registered markers and their aliases
//! - `resolve` - explain what a surface spelling resolves to
//! - `init` - write a default `wydra.toml`
//!
//! # Global Options
//!
//! - `--verbose` / `-v`: debug logging for the whole crate
//! - `--quiet` / `-q`: no logging at all
//! - `--config` / `-c`: configuration file to use instead of `wydra.toml`
//!
//! `RUST_LOG` takes precedence over both flags when set.

mod init;
mod list;
mod render;
mod resolve;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;

/// Runtime settings derived from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Filter directive for `tracing-subscriber`, `None` disables logging
    pub log_level: Option<String>,

    /// Explicit configuration file
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global subscriber. Log lines go to stderr so rendered
    /// output on stdout stays clean.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if let Some(level) = &self.log_level {
            EnvFilter::new(level)
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Load the engine configuration this invocation should use.
    ///
    /// # Errors
    ///
    /// Fails if an explicit file is missing or any found file is invalid.
    pub fn load_engine_config(&self) -> Result<EngineConfig> {
        EngineConfig::load_or_default(self.config_path.as_deref())
    }
}

#[derive(Parser)]
#[command(
    name = "wydra",
    about = "Wydra - recursive shortcode expansion",
    version,
    author,
    long_about = "Wydra expands prefixed markers such as [w-div] or [wydra-card] into HTML, \
                  rendering generic elements, Tera templates and named YAML data blocks."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file (defaults to `wydra.toml` or `WYDRA_CONFIG`)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand markers in a file
    Render(render::RenderCommand),

    /// List registered markers
    List(list::ListCommand),

    /// Show what a marker spelling resolves to
    Resolve(resolve::ResolveCommand),

    /// Create a default configuration file
    Init(init::InitCommand),
}

impl Cli {
    /// Run the selected command.
    ///
    /// # Errors
    ///
    /// Propagates the command's failure.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("wydra=debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("wydra=warn".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Run the selected command with explicit settings.
    ///
    /// # Errors
    ///
    /// Propagates the command's failure.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Init(cmd) => cmd.execute(config.config_path.as_deref()),
            Commands::Render(cmd) => cmd.execute(config.load_engine_config()?),
            Commands::List(cmd) => cmd.execute(&config.load_engine_config()?),
            Commands::Resolve(cmd) => cmd.execute(&config.load_engine_config()?),
        }
    }
}
