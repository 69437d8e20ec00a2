//! Pages stored as files in a directory.
//!
//! A page is addressed by its file stem: `about` finds `about.md`,
//! `about.txt` or a bare `about`. Only direct children of the directory are
//! reachable; identifiers containing path separators or `..` are refused.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::engine::PageSource;

/// [`PageSource`] over a directory of page files.
#[derive(Debug, Clone)]
pub struct DirPageSource {
    root: PathBuf,
    current: Option<String>,
}

impl DirPageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            current: None,
        }
    }

    /// Name reported as the page being rendered.
    #[must_use]
    pub fn with_current(mut self, page: impl Into<String>) -> Self {
        self.current = Some(page.into());
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding `page`, if any.
    #[must_use]
    pub fn locate(&self, page: &str) -> Option<PathBuf> {
        if page.is_empty() || page.contains(['/', '\\']) || page.contains("..") {
            tracing::debug!("Refusing page identifier '{}'", page);
            return None;
        }

        let exact = self.root.join(page);
        if exact.is_file() {
            return Some(exact);
        }

        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .find(|entry| entry.path().file_stem().and_then(|s| s.to_str()) == Some(page))
            .map(walkdir::DirEntry::into_path)
    }
}

impl PageSource for DirPageSource {
    fn fetch(&self, page: &str) -> Option<String> {
        let path = self.locate(page)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::warn!("Cannot read page {}: {}", path.display(), e);
                None
            }
        }
    }

    fn current_page(&self) -> Option<String> {
        self.current.clone()
    }
}
