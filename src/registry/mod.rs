//! Marker registry and alias resolver.
//!
//! The registry holds one [`MarkerDefinition`] per canonical code and a flat
//! alias table mapping every surface spelling to its code. It is built once
//! and read-only afterwards.
//!
//! # Surface Spellings
//!
//! Every definition is reachable through each configured prefix:
//!
//! | Definition | Aliases (prefixes `wydra`, `w`, depth 2) |
//! |------------|-------------------------------------------|
//! | element `div` | `wydra-div`, `w-div`, `wydra-div-0` .. `w-div-2` |
//! | data `define` | `wydra-define`, `w-define` |
//! | template `card` | `wydra-card`, `w-card` |
//!
//! Depth-suffixed spellings only exist for depth-bounded definitions (the
//! element markers). They let authors nest the same element inside itself,
//! `[w-div-1][w-div]..[/w-div][/w-div-1]`, without the host's span matcher
//! closing the outer marker early.
//!
//! # Collisions
//!
//! Definitions are keyed by code, so a template named `div.tera` replaces the
//! built-in `div` element; the depth-suffixed spellings registered for the
//! element keep pointing at the code and therefore reach the template too.
//! The alias table is flat and the last registration for a surface key wins.
//! Neither case is an error.
//!
//! # Example
//!
//! ```rust
//! use wydra::registry::Registry;
//!
//! let tags = vec!["div".to_string(), "span".to_string()];
//! let prefixes = vec!["wydra".to_string(), "w".to_string()];
//! let registry = Registry::build(&tags, 5, &[], &prefixes);
//!
//! assert_eq!(registry.resolve("w-div-2"), Some("div"));
//! assert_eq!(registry.element_tag_for("wydra-span"), Some("span"));
//! assert_eq!(registry.resolve("w-div-6"), None);
//! ```

pub mod scanner;

pub use scanner::{TemplateRecord, scan_templates};

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::EngineConfig;
use crate::constants::{DEFINE_CODE, MAX_DEPTH_LIMIT, NAME_SEPARATOR};
use crate::core::WydraError;


/// What renders a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandlerKind {
    /// Generic HTML-like element
    Element,
    /// Structured data definition stored in the named data store
    DataDefine,
    /// File-backed Tera template
    Template,
}

impl HandlerKind {
    /// Short name used in listings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::DataDefine => "data-define",
            Self::Template => "template",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical definition of a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDefinition {
    /// Canonical code every alias resolves to
    pub code: String,
    /// Handler used at dispatch time
    pub kind: HandlerKind,
    /// Template file, for [`HandlerKind::Template`]
    pub template_path: Option<PathBuf>,
    /// Depth bound of suffixed aliases, for depth-aware elements
    pub max_depth: Option<usize>,
}

impl MarkerDefinition {
    /// An element marker with the given depth bound.
    pub fn element(code: impl Into<String>, max_depth: usize) -> Self {
        Self {
            code: code.into(),
            kind: HandlerKind::Element,
            template_path: None,
            max_depth: Some(max_depth),
        }
    }

    /// The reserved data definition marker.
    #[must_use]
    pub fn define() -> Self {
        Self {
            code: DEFINE_CODE.to_string(),
            kind: HandlerKind::DataDefine,
            template_path: None,
            max_depth: None,
        }
    }

    /// A template marker backed by a scanned file.
    #[must_use]
    pub fn template(record: &TemplateRecord) -> Self {
        Self {
            code: record.code.clone(),
            kind: HandlerKind::Template,
            template_path: Some(record.file_path.clone()),
            max_depth: None,
        }
    }
}

/// One row of [`Registry::catalog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Canonical code
    pub code: String,
    /// Every surface spelling of the code, in registration order
    pub aliases: Vec<String>,
    /// Handler kind
    pub kind: HandlerKind,
    /// Template file for template markers, `None` for built-ins
    pub source: Option<PathBuf>,
}

/// Incremental construction of a [`Registry`].
///
/// Use this when element depth bounds differ per tag; [`Registry::build`]
/// covers the common case.
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    prefixes: Vec<String>,
    max_depth: usize,
    element_tags: Vec<String>,
    definitions: Vec<MarkerDefinition>,
}

impl RegistryBuilder {
    /// Start a registry for the given prefixes and global depth bound.
    ///
    /// The bound is capped at [`MAX_DEPTH_LIMIT`] so every depth suffix is a
    /// single digit.
    pub fn new(prefixes: &[String], max_depth: usize) -> Self {
        Self {
            prefixes: prefixes.to_vec(),
            max_depth: max_depth.min(MAX_DEPTH_LIMIT),
            element_tags: Vec::new(),
            definitions: Vec::new(),
        }
    }

    /// Add an element marker using the global depth bound.
    #[must_use]
    pub fn element(self, tag: &str) -> Self {
        let depth = self.max_depth;
        self.element_with_depth(tag, depth)
    }

    /// Add an element marker with its own depth bound, clamped into
    /// `[1, max_depth]`.
    #[must_use]
    pub fn element_with_depth(mut self, tag: &str, depth: usize) -> Self {
        let depth = depth.max(1).min(self.max_depth);
        if !self.element_tags.iter().any(|t| t == tag) {
            self.element_tags.push(tag.to_string());
        }
        self.definitions.push(MarkerDefinition::element(tag, depth));
        self
    }

    /// Add the data definition marker.
    #[must_use]
    pub fn define(mut self) -> Self {
        self.definitions.push(MarkerDefinition::define());
        self
    }

    /// Add a template marker.
    #[must_use]
    pub fn template(mut self, record: &TemplateRecord) -> Self {
        self.definitions.push(MarkerDefinition::template(record));
        self
    }

    /// Fold the definitions into a registry and generate the alias table.
    #[must_use]
    pub fn build(self) -> Registry {
        let mut registry = Registry {
            prefixes: self.prefixes,
            max_depth: self.max_depth,
            element_tags: self.element_tags,
            definitions: Vec::new(),
            index: HashMap::new(),
            aliases: HashMap::new(),
            alias_order: Vec::new(),
        };

        for definition in self.definitions {
            registry.register_aliases(&definition);
            registry.insert_definition(definition);
        }

        tracing::debug!(
            "Registry built: {} definition(s), {} alias(es)",
            registry.definitions.len(),
            registry.aliases.len()
        );
        registry
    }
}

/// Marker definitions plus the alias table.
#[derive(Debug, Clone)]
pub struct Registry {
    prefixes: Vec<String>,
    max_depth: usize,
    element_tags: Vec<String>,
    definitions: Vec<MarkerDefinition>,
    /// code -> position in `definitions`
    index: HashMap<String, usize>,
    /// surface spelling -> code
    aliases: HashMap<String, String>,
    /// surface spellings in first-registration order
    alias_order: Vec<String>,
}

impl Registry {
    /// Build the registry from element tags, the depth bound, scanned
    /// templates and the surface prefixes.
    ///
    /// Definitions are registered in this order: elements, `define`, templates.
    #[must_use]
    pub fn build(
        element_tags: &[String],
        max_depth: usize,
        templates: &[TemplateRecord],
        prefixes: &[String],
    ) -> Self {
        let mut builder = RegistryBuilder::new(prefixes, max_depth);
        for tag in element_tags {
            builder = builder.element(tag);
        }
        builder = builder.define();
        for record in templates {
            builder = builder.template(record);
        }
        builder.build()
    }

    /// Scan the configured template paths and build the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a template directory cannot be read.
    pub fn from_config(config: &EngineConfig) -> Result<Self, WydraError> {
        let templates = scan_templates(&config.template_paths)?;
        Ok(Self::build(&config.tags, config.max_depth, &templates, &config.prefixes))
    }

    fn insert_definition(&mut self, definition: MarkerDefinition) {
        match self.index.get(&definition.code) {
            Some(&pos) => {
                tracing::debug!(
                    "Marker '{}' redefined as {} (was {})",
                    definition.code,
                    definition.kind,
                    self.definitions[pos].kind
                );
                self.definitions[pos] = definition;
            }
            None => {
                self.index.insert(definition.code.clone(), self.definitions.len());
                self.definitions.push(definition);
            }
        }
    }

    fn register_aliases(&mut self, definition: &MarkerDefinition) {
        let mut aliases: Vec<String> =
            self.prefixes.iter().map(|prefix| join(prefix, &definition.code)).collect();

        if let Some(depth) = definition.max_depth {
            let depth = depth.max(1).min(self.max_depth);
            for i in 0..=depth {
                for prefix in &self.prefixes {
                    aliases.push(format!("{}{NAME_SEPARATOR}{i}", join(prefix, &definition.code)));
                }
            }
        }

        for alias in aliases {
            if self.aliases.insert(alias.clone(), definition.code.clone()).is_none() {
                self.alias_order.push(alias);
            }
        }
    }

    /// Canonical code of a surface spelling.
    #[must_use]
    pub fn resolve(&self, surface: &str) -> Option<&str> {
        self.aliases.get(surface).map(String::as_str)
    }

    /// Definition of a canonical code.
    #[must_use]
    pub fn definition(&self, code: &str) -> Option<&MarkerDefinition> {
        self.index.get(code).map(|&pos| &self.definitions[pos])
    }

    /// Definition behind a surface spelling.
    #[must_use]
    pub fn lookup(&self, surface: &str) -> Option<&MarkerDefinition> {
        self.resolve(surface).and_then(|code| self.definition(code))
    }

    /// Template file of a canonical code, if it is a template marker.
    #[must_use]
    pub fn template_for(&self, code: &str) -> Option<&Path> {
        self.definition(code).and_then(|d| d.template_path.as_deref())
    }

    /// Bare element tag named by a surface spelling.
    ///
    /// Matches `<prefix>-<tag>` optionally followed by a single `-<digit>`
    /// depth suffix, trying element tags in configured order. When the alias
    /// table knows the spelling, only the tag it resolves to can match.
    #[must_use]
    pub fn element_tag_for(&self, surface: &str) -> Option<&str> {
        let known = self.resolve(surface);
        self.element_tags
            .iter()
            .map(String::as_str)
            .filter(|tag| known.is_none_or(|code| code == *tag))
            .find(|tag| self.prefixes.iter().any(|prefix| spells_element(surface, prefix, tag)))
    }

    /// Surface spellings of a code, in registration order.
    #[must_use]
    pub fn aliases_of(&self, code: &str) -> Vec<&str> {
        self.alias_order
            .iter()
            .filter(|alias| self.aliases.get(*alias).is_some_and(|c| c == code))
            .map(String::as_str)
            .collect()
    }

    /// All definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &MarkerDefinition> {
        self.definitions.iter()
    }

    /// Number of surface spellings.
    #[must_use]
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Configured prefixes.
    #[must_use]
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Every surface spelling, in registration order.
    pub fn surface_names(&self) -> impl Iterator<Item = &str> {
        self.alias_order.iter().map(String::as_str)
    }

    /// Listing of every definition with its aliases.
    ///
    /// Template markers come first, then built-ins; each group is sorted by
    /// code.
    #[must_use]
    pub fn catalog(&self) -> Vec<CatalogEntry> {
        let mut entries: Vec<CatalogEntry> = self
            .definitions
            .iter()
            .map(|d| CatalogEntry {
                code: d.code.clone(),
                aliases: self.aliases_of(&d.code).into_iter().map(str::to_string).collect(),
                kind: d.kind,
                source: d.template_path.clone(),
            })
            .collect();

        entries.sort_by(|a, b| {
            b.source.is_some().cmp(&a.source.is_some()).then_with(|| a.code.cmp(&b.code))
        });
        entries
    }
}

/// `<prefix>-<tag>` with an optional `-<digit>` suffix.
fn spells_element(surface: &str, prefix: &str, tag: &str) -> bool {
    let Some(rest) = surface
        .strip_prefix(prefix)
        .and_then(|r| r.strip_prefix(NAME_SEPARATOR))
        .and_then(|r| r.strip_prefix(tag))
    else {
        return false;
    };

    let mut chars = rest.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (None, _, _) => true,
        (Some(NAME_SEPARATOR), Some(d), None) => d.is_ascii_digit(),
        _ => false,
    }
}

fn join(prefix: &str, code: &str) -> String {
    format!("{prefix}{NAME_SEPARATOR}{code}")
}
