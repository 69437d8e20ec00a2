//! Create a default `wydra.toml`.
//!
//! ```bash
//! wydra init
//! wydra init --force
//! wydra --config site/wydra.toml init
//! ```

use anyhow::{Result, anyhow};
use clap::Args;
use colored::Colorize;
use std::path::Path;

use crate::config::EngineConfig;

#[derive(Args)]
pub struct InitCommand {
    /// Overwrite an existing configuration file
    #[arg(short, long)]
    force: bool,
}

impl InitCommand {
    /// Write the defaults to `path`, or to the default location.
    ///
    /// The template directory next to the file is created as well.
    ///
    /// # Errors
    ///
    /// Refuses to overwrite an existing file without `--force`.
    pub fn execute(self, path: Option<&Path>) -> Result<()> {
        let config_path = path.map_or_else(EngineConfig::default_path, Path::to_path_buf);

        if config_path.exists() && !self.force {
            return Err(anyhow!(
                "{} already exists. Use --force to overwrite",
                config_path.display()
            ));
        }

        let config = EngineConfig::default();
        config.save(&config_path)?;

        let base_dir = config_path.parent().unwrap_or_else(|| Path::new(""));
        for dir in &config.template_paths {
            let dir = base_dir.join(dir);
            if !dir.exists() {
                std::fs::create_dir_all(&dir)?;
                tracing::debug!("Created template directory {}", dir.display());
            }
        }

        println!("{} Created {}", "✓".green(), config_path.display());
        Ok(())
    }
}
