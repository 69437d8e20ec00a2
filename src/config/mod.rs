//! Engine configuration (`wydra.toml`).
//!
//! The configuration surface is small: which element markers exist, how deep
//! depth-suffixed aliases go, which prefixes spell a marker, where templates
//! live, and two output switches.
//!
//! # File Format
//!
//! ```toml
//! tags = ["pre", "tag", "div", "span", "p"]
//! max_depth = 5
//! prefixes = ["wydra", "w"]
//! template_paths = ["templates", "~/.wydra/templates"]
//! debug = false
//! dump_define = false
//! ```
//!
//! Every key is optional; missing keys take the defaults above.
//!
//! # Location
//!
//! The CLI looks for `wydra.toml` in the current directory. The location can be
//! overridden with `--config` or the `WYDRA_CONFIG` environment variable.
//! Relative template paths resolve against the directory holding the file and
//! `~` is expanded.
//!
//! # Examples
//!
//! ```rust,no_run
//! use wydra::config::EngineConfig;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = EngineConfig::load(Path::new("wydra.toml"))?;
//! assert!(config.max_depth >= 1);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_FILE_NAME, CONFIG_PATH_ENV, DEFAULT_MAX_DEPTH, DEFAULT_TAGS, DEFAULT_TEMPLATE_DIR,
    MAX_DEPTH_LIMIT, NAME_SEPARATOR, PREFIX_CORE, PREFIX_SHORT,
};
use crate::core::WydraError;

fn default_tags() -> Vec<String> {
    DEFAULT_TAGS.iter().map(|t| (*t).to_string()).collect()
}

const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_prefixes() -> Vec<String> {
    vec![PREFIX_CORE.to_string(), PREFIX_SHORT.to_string()]
}

fn default_template_paths() -> Vec<PathBuf> {
    vec![PathBuf::from(DEFAULT_TEMPLATE_DIR)]
}

/// Configuration of a Wydra engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Element markers, in matching order.
    ///
    /// `pre` and `tag` have special rendering rules; every other name is
    /// emitted as an HTML element of the same name.
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,

    /// Upper bound of depth-suffixed element aliases (`w-div-0` .. `w-div-N`).
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Surface prefixes, joined to codes with `-`.
    ///
    /// Later prefixes win when two registrations produce the same alias.
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,

    /// Directories scanned for template files, in priority order.
    #[serde(default = "default_template_paths")]
    pub template_paths: Vec<PathBuf>,

    /// Emit diagnostic detail for absorbed failures (data parse errors,
    /// template render errors).
    #[serde(default)]
    pub debug: bool,

    /// Make the define marker emit a visible `wydra-instance-<hash>` token.
    #[serde(default)]
    pub dump_define: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tags: default_tags(),
            max_depth: default_max_depth(),
            prefixes: default_prefixes(),
            template_paths: default_template_paths(),
            debug: false,
            dump_define: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a specific file.
    ///
    /// Relative template paths are resolved against the file's directory and
    /// the result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or fails
    /// [`validate`](Self::validate).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(WydraError::ConfigNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Self = toml::from_str(&content).map_err(|e| WydraError::ConfigParse {
            file: path.display().to_string(),
            reason: e.message().to_string(),
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_template_paths(base_dir);
        config.validate()?;

        tracing::debug!(
            "Loaded config from {} ({} tags, {} prefixes, {} template paths)",
            path.display(),
            config.tags.len(),
            config.prefixes.len(),
            config.template_paths.len()
        );

        Ok(config)
    }

    /// Load from an explicit path, the `WYDRA_CONFIG` location, or `./wydra.toml`.
    ///
    /// An explicit path must exist. The implicit locations fall back to the
    /// defaults when no file is present.
    ///
    /// # Errors
    ///
    /// Returns an error if a found file cannot be loaded.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            let mut config = Self::default();
            config.resolve_template_paths(Path::new("."));
            Ok(config)
        }
    }

    /// Default configuration location, honouring `WYDRA_CONFIG`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Write the configuration as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Check the invariants the registry relies on.
    ///
    /// # Errors
    ///
    /// Returns [`WydraError::InvalidConfig`] describing the first violation.
    pub fn validate(&self) -> Result<(), WydraError> {
        let invalid = |reason: String| WydraError::InvalidConfig {
            reason,
        };

        if self.tags.is_empty() {
            return Err(invalid("at least one element tag is required".to_string()));
        }
        if self.max_depth == 0 {
            return Err(invalid("max_depth must be at least 1".to_string()));
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(invalid(format!("max_depth must be at most {MAX_DEPTH_LIMIT}")));
        }
        if self.prefixes.is_empty() {
            return Err(invalid("at least one prefix is required".to_string()));
        }

        let mut seen = HashSet::new();
        for prefix in &self.prefixes {
            if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
                return Err(invalid(format!(
                    "prefix '{prefix}' must be a non-empty word without whitespace"
                )));
            }
            if prefix.contains(NAME_SEPARATOR) {
                return Err(invalid(format!(
                    "prefix '{prefix}' must not contain '{NAME_SEPARATOR}'"
                )));
            }
            if !seen.insert(prefix.as_str()) {
                return Err(invalid(format!("prefix '{prefix}' is listed twice")));
            }
        }

        for tag in &self.tags {
            if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(invalid(format!("tag '{tag}' must be a plain alphanumeric name")));
            }
        }

        Ok(())
    }

    /// Expand `~` and anchor relative template paths at `base_dir`.
    fn resolve_template_paths(&mut self, base_dir: &Path) {
        self.template_paths = self
            .template_paths
            .iter()
            .map(|p| {
                let raw = p.to_string_lossy();
                let expanded = shellexpand::tilde(&raw);
                let expanded = PathBuf::from(expanded.as_ref());
                if expanded.is_absolute() {
                    expanded
                } else {
                    base_dir.join(expanded)
                }
            })
            .collect();
    }
}
