//! Generic element rendering.
//!
//! `w-div id=box` becomes `<div id="box">..</div>`. Two element codes are
//! special:
//!
//! - `pre` emits its content without a wrapper, after stripping a `<pre>`
//!   block around it. Authors use it to shield YAML from the editor.
//! - `tag` takes the element name from its first positional attribute, so
//!   `[w-tag section class=intro]` renders a `<section>`. Without one it emits
//!   the bare content.

use std::fmt::Write as _;

use super::Engine;
use crate::constants::{GENERIC_TAG, PRE_TAG};
use crate::extract::{escape_attr, unwrap};
use crate::instance::{AttrKey, Attributes, RenderInstance, Target};

/// Wrapper element of a prepared instance.
pub(super) struct Wrap {
    tag: String,
    attrs: Attributes,
}

/// Apply the `pre` and `tag` rewrites before the instance is pushed.
///
/// Returns the instance to push and the wrapper to emit, `None` for bare
/// content.
pub(super) fn prepare(tag: &str, mut instance: RenderInstance) -> (RenderInstance, Option<Wrap>) {
    match tag {
        PRE_TAG => {
            instance.content = unwrap(&instance.content).to_string();
            (instance, None)
        }
        GENERIC_TAG => {
            let name = instance
                .attrs
                .remove(&AttrKey::Positional(0))
                .filter(|name| !name.is_empty());
            match name {
                Some(name) => {
                    instance.target = Target::Element(name.clone());
                    let wrap = Wrap {
                        tag: name,
                        attrs: instance.attrs.clone(),
                    };
                    (instance, Some(wrap))
                }
                None => (instance, None),
            }
        }
        _ => {
            let wrap = Wrap {
                tag: tag.to_string(),
                attrs: instance.attrs.clone(),
            };
            (instance, Some(wrap))
        }
    }
}

/// Render the innermost instance, expanding its content.
pub(super) fn render(engine: &Engine, wrap: Option<&Wrap>) -> String {
    let content = match engine.content() {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Element render outside a frame: {}", e);
            return String::new();
        }
    };

    match wrap {
        Some(wrap) => format!("{}{}</{}>", open_tag(&wrap.tag, &wrap.attrs), content, wrap.tag),
        None => content,
    }
}

/// `<tag k="v" ..>` with escaped keys and values.
pub(crate) fn open_tag(tag: &str, attrs: &Attributes) -> String {
    let mut out = format!("<{tag}");
    for (key, value) in attrs.iter() {
        let key = key.to_string();
        let _ = write!(out, " {}=\"{}\"", escape_attr(&key), escape_attr(value));
    }
    out.push('>');
    out
}
