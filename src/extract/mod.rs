//! Structured-data extraction from loosely formatted marker content.
//!
//! Authors write YAML inside markers through rich-text editors, which mangle
//! it in predictable ways: list dashes become `&#8212;`, line ends gain
//! `<br />`, quotes turn into entities. [`extract`] undoes that damage and
//! parses what is left. It never fails; anything unparseable becomes an empty
//! mapping.
//!
//! Content wrapped in `<pre>..</pre>` is taken verbatim (apart from the dash
//! fix-up), since editors leave preformatted blocks alone.

pub mod entities;

pub use entities::{decode_entities, escape_attr};

use serde_yaml::{Mapping, Value};
use uuid::Uuid;

use crate::constants::{EM_DASH_ENTITY, LINE_BREAK_MARKUP};

const PRE_OPEN: &str = "<pre>";
const PRE_CLOSE: &str = "</pre>";

/// Inner text of the outermost `<pre>` block, or `raw` when there is none.
///
/// The block runs from the first `<pre>` to the last `</pre>`; an empty or
/// inverted span counts as no block.
#[must_use]
pub fn unwrap(raw: &str) -> &str {
    let Some(open) = raw.find(PRE_OPEN) else {
        return raw;
    };
    let Some(close) = raw.rfind(PRE_CLOSE) else {
        return raw;
    };

    let start = open + PRE_OPEN.len();
    if start < close {
        &raw[start..close]
    } else {
        raw
    }
}

/// Parse marker content into data.
///
/// 1. unwrap a `<pre>` block if present;
/// 2. without one, drop `<br />`, turn `&#8212;` into `-` and decode entities;
/// 3. turn remaining `&#8212;` into `-` and trim;
/// 4. a top-level list (`- ` first) is parsed as the list itself;
/// 5. anything else is parsed as a YAML document.
///
/// Failures yield an empty mapping. With `debug` set the parser's complaint
/// and the offending text are logged.
#[must_use]
pub fn extract(raw: &str, debug: bool) -> Value {
    let unwrapped = unwrap(raw);

    let text = if unwrapped.len() == raw.len() {
        let cleaned = raw.replace(EM_DASH_ENTITY, "-").replace(LINE_BREAK_MARKUP, "");
        decode_entities(&cleaned).into_owned()
    } else {
        unwrapped.to_string()
    };
    let text = text.replace(EM_DASH_ENTITY, "-");
    let text = text.trim();

    if text.starts_with("- ") {
        return extract_list(text, debug);
    }

    parse_yaml(text, debug)
}

/// Nest a top-level list under a throwaway key so the parser sees a document
/// with a single root, then hand back the list.
fn extract_list(text: &str, debug: bool) -> Value {
    let key = format!("wydra_{}", Uuid::new_v4().simple());

    let mut wrapped = format!("{key}:\n");
    for line in text.lines() {
        wrapped.push_str("  ");
        wrapped.push_str(line);
        wrapped.push('\n');
    }

    match parse_yaml(&wrapped, debug) {
        Value::Mapping(mut map) => map
            .remove(key.as_str())
            .filter(|v| !v.is_null())
            .unwrap_or_else(empty_mapping),
        other => other,
    }
}

/// Plain YAML parse with the soft failure policy of [`extract`].
///
/// Empty documents and parse failures both yield an empty mapping.
#[must_use]
pub fn parse_yaml(text: &str, debug: bool) -> Value {
    match serde_yaml::from_str::<Value>(text) {
        Ok(Value::Null) => empty_mapping(),
        Ok(value) => value,
        Err(e) => {
            if debug {
                tracing::warn!("Data parse error: {}\n{}\n/EOF", e, text);
            } else {
                tracing::trace!("Data parse failed, using empty mapping");
            }
            empty_mapping()
        }
    }
}

fn empty_mapping() -> Value {
    Value::Mapping(Mapping::new())
}
