//! HTML entity handling for marker content and element attributes.

use quick_xml::escape::resolve_html5_entity;
use std::borrow::Cow;

/// Longest entity body we try to match, `&` and `;` excluded.
///
/// The longest HTML5 name, `CounterClockwiseContourIntegral`, has 31 bytes.
const MAX_ENTITY_LEN: usize = 32;

/// Escape a string for use inside a double-quoted HTML attribute.
#[must_use]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Decode named and numeric HTML entities.
///
/// Named entities cover the whole HTML5 table. Unknown or malformed entities
/// are kept verbatim.
#[must_use]
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        match decode_one(tail) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decode the entity at the start of `tail` (which begins with `&`).
/// Returns the replacement text and the number of bytes consumed.
fn decode_one(tail: &str) -> Option<(Cow<'static, str>, usize)> {
    let semi = tail[1..].find(';')? + 1;
    let body = &tail[1..semi];
    if body.is_empty() || body.len() > MAX_ENTITY_LEN {
        return None;
    }

    let decoded = if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        let c = char::from_u32(code).filter(|c| *c != '\0')?;
        Cow::Owned(c.to_string())
    } else {
        Cow::Borrowed(resolve_html5_entity(body)?)
    };

    Some((decoded, semi + 1))
}
