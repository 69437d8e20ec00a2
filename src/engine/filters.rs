//! Tera filters and value conversion for marker templates.
//!
//! # `pluck`
//!
//! Walks a dotted path into nested data and returns what it finds, or the
//! default when any step is missing:
//!
//! ```text
//! {% set site = data(name="site") %}
//! {{ site | pluck(path="nav.0.title", default="Home") }}
//! ```
//!
//! Numeric segments index into arrays; every other segment is an object key.

use serde_yaml::Value as YamlValue;
use std::collections::HashMap;
use tera::Value;

/// Convert extracted YAML data into a Tera value.
///
/// Mapping keys that are not strings are stringified where JSON allows it;
/// anything JSON cannot represent becomes `null`.
#[must_use]
pub fn yaml_to_tera(value: &YamlValue) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::debug!("Data not representable in templates: {}", e);
        Value::Null
    })
}

/// Follow a dotted path through objects and arrays.
#[must_use]
pub fn pluck<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }

    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// The `pluck(path, default)` filter.
///
/// # Errors
///
/// Fails when `path` is given but is not a string.
pub fn pluck_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let path = match args.get("path") {
        Some(Value::String(path)) => path.as_str(),
        Some(_) => return Err(tera::Error::msg("pluck filter: `path` must be a string")),
        None => "",
    };
    let default = args.get("default").cloned().unwrap_or(Value::Null);

    Ok(pluck(value, path).cloned().unwrap_or(default))
}
