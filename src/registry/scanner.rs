//! Template directory scanner.
//!
//! Lists the files of each template search path (non-recursively) and turns
//! every usable one into a [`TemplateRecord`] whose code is the file stem.
//!
//! Rules:
//! - files whose name starts with `.`, `!`, `~` or `-` are ignored, which lets
//!   authors park drafts and partials next to live templates;
//! - only `.tera` and `.html` files are considered, `.tera` winning when both
//!   exist in one directory;
//! - a missing search path is skipped, an unreadable one is an error;
//! - when two search paths provide the same code, the later path wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::constants::{EXCLUDED_FILE_PREFIXES, TEMPLATE_EXTENSIONS};
use crate::core::WydraError;

/// A template file discovered by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRecord {
    /// Canonical marker code (file stem, case-sensitive)
    pub code: String,
    /// File name as found on disk, extension included
    pub source_name: String,
    /// Full path to the template file
    pub file_path: PathBuf,
}

impl TemplateRecord {
    /// Creates a new template record.
    pub fn new(
        code: impl Into<String>,
        source_name: impl Into<String>,
        file_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            code: code.into(),
            source_name: source_name.into(),
            file_path: file_path.into(),
        }
    }

    /// Extension priority (lower is higher priority), `usize::MAX` if unknown.
    fn extension_priority(&self) -> usize {
        Path::new(&self.source_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| TEMPLATE_EXTENSIONS.iter().position(|known| *known == ext))
            .unwrap_or(usize::MAX)
    }
}

/// Turn a file name into a record, or `None` when the scanner should skip it.
#[must_use]
pub fn template_record(file_name: &str, file_path: &Path) -> Option<TemplateRecord> {
    if file_name.starts_with(EXCLUDED_FILE_PREFIXES) {
        return None;
    }

    let path = Path::new(file_name);
    let ext = path.extension()?.to_str()?;
    if !TEMPLATE_EXTENSIONS.contains(&ext) {
        return None;
    }

    let code = path.file_stem()?.to_str()?;
    if code.is_empty() {
        return None;
    }

    Some(TemplateRecord::new(code, file_name, file_path))
}

/// Scan the search paths and return one record per template code.
///
/// Records come back sorted by code so registry builds are deterministic.
///
/// # Errors
///
/// Returns [`WydraError::TemplateDirUnreadable`] if an existing search path
/// cannot be listed.
pub fn scan_templates(paths: &[PathBuf]) -> Result<Vec<TemplateRecord>, WydraError> {
    let mut by_code: HashMap<String, TemplateRecord> = HashMap::new();

    for dir in paths {
        if !dir.is_dir() {
            tracing::debug!("Template path {} does not exist, skipping", dir.display());
            continue;
        }

        let mut found: HashMap<String, TemplateRecord> = HashMap::new();
        let walker = WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // The root itself failing means the directory is unusable
                Err(e) if e.depth() == 0 => {
                    return Err(WydraError::TemplateDirUnreadable {
                        path: dir.display().to_string(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str() else {
                tracing::debug!("Skipping non UTF-8 file name {}", entry.path().display());
                continue;
            };
            let Some(record) = template_record(file_name, entry.path()) else {
                continue;
            };

            match found.get(&record.code) {
                Some(existing) if existing.extension_priority() <= record.extension_priority() => {
                    tracing::debug!(
                        "Template {} shadowed by {} in {}",
                        record.source_name,
                        existing.source_name,
                        dir.display()
                    );
                }
                _ => {
                    found.insert(record.code.clone(), record);
                }
            }
        }

        for (code, record) in found {
            if let Some(previous) = by_code.insert(code, record) {
                tracing::debug!(
                    "Template {} overridden by later search path",
                    previous.file_path.display()
                );
            }
        }
    }

    let mut records: Vec<TemplateRecord> = by_code.into_values().collect();
    records.sort_by(|a, b| a.code.cmp(&b.code));
    tracing::debug!("Scanned {} template(s) from {} path(s)", records.len(), paths.len());
    Ok(records)
}
