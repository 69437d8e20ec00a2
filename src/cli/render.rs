//! Expand markers in a text file.
//!
//! The file is run through the bracket host: `[w-div]...[/w-div]` and friends
//! are dispatched, everything else is copied as is. Pages referenced with
//! `source-page` are looked up in `--pages`, or next to the input file.
//!
//! ```bash
//! wydra render page.md
//! wydra render page.md --pages content/ --output out.html
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::host::{BracketExpander, DirPageSource};

#[derive(Args)]
pub struct RenderCommand {
    /// Text file to expand
    file: PathBuf,

    /// Directory holding pages for `source-page` (defaults to the file's directory)
    #[arg(long)]
    pages: Option<PathBuf>,

    /// Page name used for unnamed data blocks (defaults to the file stem)
    #[arg(long)]
    page_name: Option<String>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RenderCommand {
    /// Render the input file.
    ///
    /// # Errors
    ///
    /// Fails if the input cannot be read, the templates cannot be scanned, or
    /// the output cannot be written. Problems inside individual markers are
    /// logged and leave that marker empty.
    pub fn execute(self, config: EngineConfig) -> Result<()> {
        let text = std::fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;

        let engine = self.build_engine(config)?;
        let rendered = engine.expand(&text);
        tracing::debug!(
            "Rendered {} ({} data blocks defined)",
            self.file.display(),
            engine.data_entries().len()
        );

        match &self.output {
            Some(path) => std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?,
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(rendered.as_bytes())?;
                stdout.flush()?;
            }
        }

        Ok(())
    }

    fn build_engine(&self, config: EngineConfig) -> Result<Engine> {
        let pages_dir = self.pages.clone().unwrap_or_else(|| {
            self.file
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf()
        });

        let mut pages = DirPageSource::new(pages_dir);
        let page_name = self.page_name.clone().or_else(|| {
            self.file.file_stem().and_then(|s| s.to_str()).map(str::to_string)
        });
        if let Some(name) = page_name {
            pages = pages.with_current(name);
        }

        let engine = Engine::builder(config)
            .expander(BracketExpander::new()?)
            .pages(pages)
            .build()?;
        Ok(engine)
    }
}
