//! Test utilities for Wydra
//!
//! Helpers shared by unit and integration tests: one-time logging setup and a
//! throwaway site layout (templates, pages, config) in a temporary directory.
//!
//! # Example
//!
//! ```rust,no_run
//! use wydra::test_utils::TestSite;
//!
//! let site = TestSite::new().unwrap();
//! site.template("card.tera", "<div class=\"card\">{{ content() }}</div>").unwrap();
//!
//! let engine = site.engine().unwrap();
//! assert_eq!(engine.expand("[w-card]hi[/w-card]"), "<div class=\"card\">hi</div>");
//! ```

pub mod fixtures;

pub use fixtures::TemplateFixture;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::host::{BracketExpander, DirPageSource};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; stays silent if neither is
/// set. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=wydra=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Temporary site with `templates/` and `pages/` directories.
pub struct TestSite {
    temp: TempDir,
}

impl TestSite {
    /// # Errors
    ///
    /// Fails if the temporary directories cannot be created.
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("Failed to create temp dir")?;
        std::fs::create_dir_all(temp.path().join("templates"))?;
        std::fs::create_dir_all(temp.path().join("pages"))?;
        Ok(Self {
            temp,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    #[must_use]
    pub fn templates_dir(&self) -> PathBuf {
        self.root().join("templates")
    }

    #[must_use]
    pub fn pages_dir(&self) -> PathBuf {
        self.root().join("pages")
    }

    /// Write a template file; returns its path.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be written.
    pub fn template(&self, file_name: &str, body: &str) -> Result<PathBuf> {
        write(&self.templates_dir().join(file_name), body)
    }

    /// Write one of the stock [`TemplateFixture`]s.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be written.
    pub fn fixture(&self, fixture: &TemplateFixture) -> Result<PathBuf> {
        self.template(&fixture.file_name, &fixture.body)
    }

    /// Write a page file; returns its path.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be written.
    pub fn page(&self, file_name: &str, body: &str) -> Result<PathBuf> {
        write(&self.pages_dir().join(file_name), body)
    }

    /// Write a file relative to the site root; returns its path.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be written.
    pub fn file(&self, relative: &str, body: &str) -> Result<PathBuf> {
        write(&self.root().join(relative), body)
    }

    /// Default configuration pointing at this site's template directory.
    #[must_use]
    pub fn config(&self) -> EngineConfig {
        EngineConfig {
            template_paths: vec![self.templates_dir()],
            ..EngineConfig::default()
        }
    }

    /// Engine with the bracket host and this site's pages.
    ///
    /// # Errors
    ///
    /// Fails if the template directory cannot be scanned.
    pub fn engine(&self) -> Result<Engine> {
        self.engine_with(self.config())
    }

    /// Same as [`engine`](Self::engine) with a custom configuration.
    ///
    /// # Errors
    ///
    /// Fails if the template directory cannot be scanned.
    pub fn engine_with(&self, config: EngineConfig) -> Result<Engine> {
        let engine = Engine::builder(config)
            .expander(BracketExpander::new()?)
            .pages(DirPageSource::new(self.pages_dir()).with_current("home"))
            .build()?;
        Ok(engine)
    }
}

fn write(path: &Path, body: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path.to_path_buf())
}
