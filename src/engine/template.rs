//! File-backed marker templates, rendered with Tera.
//!
//! Each render gets a fresh `Tera` instance holding the functions bound to the
//! engine. Templates see the marker being rendered through:
//!
//! | Name | Kind | Value |
//! |------|------|-------|
//! | `attrs` | variable | named attributes as a map |
//! | `positional` | variable | positional attributes as a list |
//! | `tag` | variable | canonical code of the marker |
//! | `attr(name, default)` | function | attribute, `true` for a flag, else `default` |
//! | `content()` | function | inner content with nested markers expanded |
//! | `yaml()` | function | expanded inner content parsed as YAML |
//! | `data(name)` | function | block from the data store by name or hash |
//! | `pluck(path, default)` | filter | nested lookup by dotted path |
//!
//! Output is not auto-escaped: templates produce markup.

use std::collections::HashMap;
use std::path::Path;
use tera::{Context as TeraContext, Tera, Value};

use super::Engine;
use super::filters::{pluck_filter, yaml_to_tera};
use crate::core::WydraError;
use crate::extract::parse_yaml;
use crate::instance::AttrValue;

/// Render a template file against the innermost render instance.
pub(super) fn render(engine: &Engine, path: &Path) -> Result<String, WydraError> {
    let source = std::fs::read_to_string(path).map_err(|e| WydraError::Io {
        operation: format!("reading template {}", path.display()),
        reason: e.to_string(),
    })?;

    let context = build_context(engine)?;
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    register(&mut tera, engine);

    tera.render_str(&source, &context).map_err(|e| WydraError::TemplateRender {
        template: path.display().to_string(),
        reason: format_tera_error(&e),
    })
}

fn build_context(engine: &Engine) -> Result<TeraContext, WydraError> {
    engine.with_current(|instance| {
        let named: serde_json::Map<String, Value> = instance
            .attrs
            .named_entries()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        let positional: Vec<&str> = instance.attrs.positional().collect();

        let mut context = TeraContext::new();
        context.insert("attrs", &named);
        context.insert("positional", &positional);
        context.insert("tag", &instance.code);
        context
    })
}

fn register(tera: &mut Tera, engine: &Engine) {
    let bound = engine.clone();
    tera.register_function("attr", move |args: &HashMap<String, Value>| {
        let name = string_arg(args, "name", "attr")?;
        let default = args.get("default").cloned().unwrap_or(Value::Null);
        bound
            .with_current(|instance| match instance.attr(name) {
                Some(AttrValue::Value(v)) => Value::String(v.to_string()),
                Some(AttrValue::Flag) => Value::Bool(true),
                None => default,
            })
            .map_err(tera_error)
    });

    let bound = engine.clone();
    tera.register_function("content", move |_args: &HashMap<String, Value>| {
        bound.content().map(Value::String).map_err(tera_error)
    });

    let bound = engine.clone();
    tera.register_function("yaml", move |_args: &HashMap<String, Value>| {
        let content = bound.content().map_err(tera_error)?;
        Ok(yaml_to_tera(&parse_yaml(&content, bound.config().debug)))
    });

    let bound = engine.clone();
    tera.register_function("data", move |args: &HashMap<String, Value>| {
        let name = string_arg(args, "name", "data")?;
        Ok(bound.data(name).map_or(Value::Null, |data| yaml_to_tera(&data)))
    });

    tera.register_filter("pluck", pluck_filter);
}

fn string_arg<'a>(
    args: &'a HashMap<String, Value>,
    key: &str,
    function: &str,
) -> tera::Result<&'a str> {
    match args.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(tera::Error::msg(format!("{function}(): `{key}` must be a string"))),
        None => Err(tera::Error::msg(format!("{function}(): missing `{key}` argument"))),
    }
}

fn tera_error(e: WydraError) -> tera::Error {
    tera::Error::msg(e.to_string())
}

/// Flatten a Tera error chain into a readable message.
///
/// Tera nests the useful part ("Variable `x` not found", "Function `y`
/// failed") under generic wrappers that name its internal one-off template;
/// those wrappers are dropped.
#[must_use]
pub fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut messages = Vec::new();
    let mut current: Option<&dyn Error> = Some(error);
    while let Some(err) = current {
        let cleaned = err
            .to_string()
            .replace("while rendering '__tera_one_off'", "")
            .replace("Failed to render '__tera_one_off'", "")
            .replace("Failed to parse '__tera_one_off'", "Template syntax error")
            .replace("Failed to parse \"__tera_one_off\"", "Template syntax error")
            .replace("'__tera_one_off'", "template")
            .replace("__tera_one_off", "template")
            .trim()
            .to_string();

        if !cleaned.is_empty() && !messages.contains(&cleaned) {
            messages.push(cleaned);
        }
        current = err.source();
    }

    if messages.is_empty() {
        "Template rendering failed".to_string()
    } else {
        messages.join("\n  → ")
    }
}
