//! Square-bracket marker syntax.
//!
//! ```text
//! [w-card title="Hello" wide]
//!   [w-div class=body]Some text[/w-div]
//! [/w-card]
//! [w-define name=menu /]
//! ```
//!
//! - `[name attrs]inner[/name]` is an enclosing marker; `[name attrs]` without
//!   a matching closer, or `[name attrs /]`, is self-closing.
//! - Attributes are `key="v"`, `key='v'`, `key=v`, or positional `"v"`, `'v'`
//!   and bare words.
//! - A same-named marker nested inside an open one must be closed or end in
//!   `/]`; closers are paired innermost first.
//! - Names the engine does not know are left in the text as written, so
//!   ordinary bracketed prose survives.

use regex::Regex;

use crate::engine::{Engine, MarkerExpander};
use crate::instance::Attributes;

const OPEN_PATTERN: &str =
    r#"\[(?P<name>[^\s\[\]/"'=]+)(?P<attrs>\s(?:[^\]"']|"[^"]*"|'[^']*')*?)?(?P<selfclose>/)?\]"#;

const ATTR_PATTERN: &str = r#"(?x)
      (?P<k1>[\w-]+)\s*=\s*"(?P<v1>[^"]*)"
    | (?P<k2>[\w-]+)\s*=\s*'(?P<v2>[^']*)'
    | (?P<k3>[\w-]+)\s*=\s*(?P<v3>[^\s"']+)
    | "(?P<p1>[^"]*)"
    | '(?P<p2>[^']*)'
    | (?P<p3>[^\s"'/]+)
"#;

/// Reference host expander for bracket markers.
#[derive(Debug, Clone)]
pub struct BracketExpander {
    open: Regex,
    attr: Regex,
}

impl BracketExpander {
    /// # Errors
    ///
    /// Returns an error if the marker patterns fail to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            open: Regex::new(OPEN_PATTERN)?,
            attr: Regex::new(ATTR_PATTERN)?,
        })
    }

    /// Parse the attribute part of an opener.
    #[must_use]
    pub fn parse_attrs(&self, raw: &str) -> Attributes {
        let mut attrs = Attributes::new();
        for caps in self.attr.captures_iter(raw) {
            let named = [("k1", "v1"), ("k2", "v2"), ("k3", "v3")]
                .into_iter()
                .find_map(|(k, v)| Some((caps.name(k)?.as_str(), caps.name(v)?.as_str())));

            if let Some((key, value)) = named {
                attrs.insert_named(key, value);
            } else if let Some(value) = ["p1", "p2", "p3"].into_iter().find_map(|p| caps.name(p)) {
                attrs.push_positional(value.as_str());
            }
        }
        attrs
    }

    /// Closer matching the opener that ends at `from`, as a byte range.
    fn find_close(&self, text: &str, from: usize, name: &str) -> Option<(usize, usize)> {
        let closer = format!("[/{name}]");
        let mut depth = 1usize;
        let mut cursor = from;

        loop {
            let close_at = cursor + text[cursor..].find(&closer)?;

            let mut scan = cursor;
            while let Some(caps) = self.open.captures_at(text, scan) {
                let whole = caps.get(0)?;
                if whole.start() >= close_at {
                    break;
                }
                if &caps["name"] == name && caps.name("selfclose").is_none() {
                    depth += 1;
                }
                scan = whole.end();
            }

            depth -= 1;
            if depth == 0 {
                return Some((close_at, close_at + closer.len()));
            }
            cursor = close_at + closer.len();
        }
    }
}

impl MarkerExpander for BracketExpander {
    fn expand(&self, engine: &Engine, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut pos = 0;

        while let Some(caps) = self.open.captures_at(text, pos) {
            let Some(whole) = caps.get(0) else {
                break;
            };
            let name = &caps["name"];

            if engine.registry().resolve(name).is_none() {
                out.push_str(&text[pos..whole.end()]);
                pos = whole.end();
                continue;
            }

            out.push_str(&text[pos..whole.start()]);
            let attrs = caps.name("attrs").map(|m| self.parse_attrs(m.as_str())).unwrap_or_default();

            let closing = if caps.name("selfclose").is_some() {
                None
            } else {
                self.find_close(text, whole.end(), name)
            };

            match closing {
                Some((inner_end, end)) => {
                    let inner = &text[whole.end()..inner_end];
                    out.push_str(&engine.dispatch(name, attrs, inner));
                    pos = end;
                }
                None => {
                    out.push_str(&engine.dispatch(name, attrs, ""));
                    pos = whole.end();
                }
            }
        }

        out.push_str(&text[pos..]);
        out
    }
}
