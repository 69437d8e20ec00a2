//! Named data store for blocks defined with the define marker.
//!
//! Every block is stored under its name. Defining a second block with a name
//! already in use does not overwrite the first; the newcomer is stored under
//! `<name>-<hash>` instead, so both stay retrievable:
//!
//! ```rust
//! use wydra::store::DataStore;
//!
//! let mut store = DataStore::new();
//! let first = store.define("menu", "- home\n- about", false);
//! let second = store.define("menu", "- blog", false);
//!
//! assert_eq!(first, "menu");
//! assert!(second.starts_with("menu-"));
//! assert_eq!(store.len(), 2);
//! // Lookups by name find the first definition
//! assert_eq!(store.lookup("menu"), store.get("menu"));
//! ```

use serde_yaml::Value;
use sha2::{Digest, Sha256};

use crate::extract::extract;

/// One defined data block.
#[derive(Debug, Clone, PartialEq)]
pub struct DataEntry {
    /// Storage key: the name, or `<name>-<hash>` after a collision
    pub key: String,
    /// Name the block was defined with
    pub name: String,
    /// Content hash of the raw block and its name
    pub hash: String,
    /// Extracted data
    pub data: Value,
}

/// Lowercase hex SHA-256 of `raw` followed by `name`.
#[must_use]
pub fn content_hash(raw: &str, name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hasher.update(name.as_bytes());
    hex::encode(hasher.finalize())
}

/// Insertion-ordered store of data blocks.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    entries: Vec<DataEntry>,
}

impl DataStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract `raw` and store it under `name`; returns the storage key.
    ///
    /// Re-defining the exact same block twice under a taken name replaces the
    /// earlier `<name>-<hash>` entry in place.
    pub fn define(&mut self, name: &str, raw: &str, debug: bool) -> String {
        let hash = content_hash(raw, name);
        let key = if self.get(name).is_some() {
            format!("{name}-{hash}")
        } else {
            name.to_string()
        };

        let entry = DataEntry {
            key: key.clone(),
            name: name.to_string(),
            hash,
            data: extract(raw, debug),
        };

        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }

        tracing::debug!("Defined data block '{}' as '{}'", name, key);
        key
    }

    /// First entry, in definition order, whose name or hash equals `name_or_hash`.
    #[must_use]
    pub fn lookup(&self, name_or_hash: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|e| e.name == name_or_hash || e.hash == name_or_hash)
            .map(|e| &e.data)
    }

    /// Data stored under an exact storage key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.data)
    }

    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&DataEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &DataEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_content_hash() {
        // sha256("") is well known
        assert_eq!(
            content_hash("", ""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(content_hash("ab", "c"), content_hash("a", "bc"));
        assert_ne!(content_hash("a: 1", "x"), content_hash("a: 1", "y"));
        assert_eq!(content_hash("a", "b").len(), 64);
    }

    #[test]
    fn test_define_and_lookup() {
        let mut store = DataStore::new();
        assert!(store.is_empty());

        let key = store.define("site", "title: Home", false);
        assert_eq!(key, "site");
        assert_eq!(store.lookup("site"), Some(&yaml("title: Home")));
        assert_eq!(store.lookup(&content_hash("title: Home", "site")), Some(&yaml("title: Home")));
        assert_eq!(store.lookup("missing"), None);
    }

    #[test]
    fn test_collision_keeps_both_entries() {
        let mut store = DataStore::new();
        store.define("menu", "- a", false);
        let second = store.define("menu", "- b", false);
        let hash = content_hash("- b", "menu");

        assert_eq!(second, format!("menu-{hash}"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup("menu"), Some(&yaml("[a]")));
        assert_eq!(store.get(&second), Some(&yaml("[b]")));
        assert_eq!(store.lookup(&hash), Some(&yaml("[b]")));
        assert_eq!(store.entry(&second).unwrap().name, "menu");
    }

    #[test]
    fn test_identical_redefinition_replaces_suffixed_entry() {
        let mut store = DataStore::new();
        store.define("menu", "- a", false);
        let k1 = store.define("menu", "- a", false);
        let k2 = store.define("menu", "- a", false);

        assert_eq!(k1, k2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut store = DataStore::new();
        store.define("a", "x: 1", false);
        store.clear();
        assert!(store.is_empty());
        let keys: Vec<_> = store.entries().map(|e| e.key.as_str()).collect();
        assert!(keys.is_empty());
    }
}
