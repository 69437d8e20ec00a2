//! Render instances and their attributes.
//!
//! A [`RenderInstance`] is the state of one marker being rendered: what it
//! renders to ([`Target`]), the attributes the host parsed from the marker,
//! and the raw inner content. Instances live on the [`ContextStack`] while
//! their handler runs, which is how template functions and nested content
//! find "the current marker".

pub mod stack;

pub use stack::{ContextStack, FrameGuard, InstanceStack};

use std::fmt;
use std::path::PathBuf;

/// What a render instance produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Execute this template file.
    Template(PathBuf),
    /// Emit an element with this tag name.
    Element(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(path) => write!(f, "template {}", path.display()),
            Self::Element(tag) => write!(f, "element <{tag}>"),
        }
    }
}

/// Key of a marker attribute.
///
/// Hosts pass `key=value` pairs as [`AttrKey::Named`] and bare values as
/// [`AttrKey::Positional`], numbered from zero in source order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttrKey {
    Named(String),
    Positional(usize),
}

impl fmt::Display for AttrKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Positional(index) => write!(f, "{index}"),
        }
    }
}

/// Result of an attribute query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrValue<'a> {
    /// A named (or indexed) attribute's value
    Value(&'a str),
    /// A positional attribute equal to the queried name
    Flag,
}

impl AttrValue<'_> {
    /// String form: the value itself, or `"true"` for flags.
    #[must_use]
    pub fn to_string_value(self) -> String {
        match self {
            Self::Value(v) => v.to_string(),
            Self::Flag => "true".to_string(),
        }
    }
}

/// Ordered attribute list of a marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(AttrKey, String)>,
}

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named attribute, replacing an existing one of the same name.
    pub fn insert_named(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let key = AttrKey::Named(name.into());
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Append a positional attribute, numbered after the existing ones.
    pub fn push_positional(&mut self, value: impl Into<String>) {
        let index = self.positional().count();
        self.entries.push((AttrKey::Positional(index), value.into()));
    }

    /// Builder form of [`insert_named`](Self::insert_named).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_named(name, value);
        self
    }

    /// Builder form of [`push_positional`](Self::push_positional).
    #[must_use]
    pub fn with_positional(mut self, value: impl Into<String>) -> Self {
        self.push_positional(value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &AttrKey) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn named(&self, name: &str) -> Option<&str> {
        self.entries.iter().find_map(|(k, v)| match k {
            AttrKey::Named(n) if n == name => Some(v.as_str()),
            _ => None,
        })
    }

    /// Remove an entry, keeping the numbering of the remaining ones.
    pub fn remove(&mut self, key: &AttrKey) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Positional values in order.
    pub fn positional(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|(k, v)| match k {
            AttrKey::Positional(_) => Some(v.as_str()),
            AttrKey::Named(_) => None,
        })
    }

    /// Named entries in order.
    pub fn named_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(k, v)| match k {
            AttrKey::Named(n) => Some((n.as_str(), v.as_str())),
            AttrKey::Positional(_) => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttrKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Look an attribute up the way markers expect.
    ///
    /// A named entry wins; a purely numeric name also reaches the positional
    /// entry with that index. Failing that, a positional entry whose value
    /// equals `name` reads as a flag, so `[w-card wide]` answers `wide`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<AttrValue<'_>> {
        if let Some(value) = self.named(name) {
            return Some(AttrValue::Value(value));
        }
        if let Ok(index) = name.parse::<usize>()
            && let Some(value) = self.get(&AttrKey::Positional(index))
        {
            return Some(AttrValue::Value(value));
        }
        self.positional().any(|v| v == name).then_some(AttrValue::Flag)
    }
}

impl FromIterator<(AttrKey, String)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (AttrKey, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// One marker being rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderInstance {
    /// What the marker renders to
    pub target: Target,
    /// Canonical code the marker resolved to
    pub code: String,
    /// Attributes as parsed by the host
    pub attrs: Attributes,
    /// Raw inner content, expanded only on demand
    pub content: String,
    /// Rendered output, filled once the handler finishes
    pub result: String,
}

impl RenderInstance {
    pub fn new(
        target: Target,
        code: impl Into<String>,
        attrs: Attributes,
        content: impl Into<String>,
    ) -> Self {
        Self {
            target,
            code: code.into(),
            attrs,
            content: content.into(),
            result: String::new(),
        }
    }

    /// Attribute value, flag, or `None` when absent.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<AttrValue<'_>> {
        if self.attrs.is_empty() {
            return None;
        }
        self.attrs.lookup(name)
    }

    /// Attribute as a string with a fallback.
    #[must_use]
    pub fn attr_or(&self, name: &str, default: &str) -> String {
        self.attr(name).map_or_else(|| default.to_string(), AttrValue::to_string_value)
    }
}
