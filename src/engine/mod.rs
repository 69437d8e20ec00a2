//! The dispatcher: turns marker spans into output.
//!
//! An [`Engine`] owns everything one rendering pass needs: the marker
//! [`Registry`], the [`EngineConfig`], the render [`ContextStack`], the named
//! [`DataStore`], and the two host collaborators:
//!
//! - a [`MarkerExpander`] that finds markers in text and calls back into
//!   [`Engine::dispatch`] for each of them;
//! - an optional [`PageSource`] used by the `source-page` attribute and as the
//!   default name of data blocks.
//!
//! # Control Flow
//!
//! ```text
//! host expander ──► Engine::dispatch(surface, attrs, content)
//!                     │ resolve surface → definition
//!                     │ push RenderInstance (popped by FrameGuard)
//!                     │ render element / template
//!                     │   └─ content() ──► host expander ──► dispatch ...
//!                     ▼
//!                   output string
//! ```
//!
//! Nested markers are expanded only when a handler asks for its content, so a
//! template decides whether and where its body appears.
//!
//! # Failure Policy
//!
//! Dispatch never fails: an unknown marker, a missing template file or a
//! broken template produces an empty string and a log line. One bad marker
//! cannot take the whole page down.
//!
//! # Sharing
//!
//! `Engine` is a cheap handle around an `Arc`. Template functions capture a
//! clone, which is why the stack and the store sit behind mutexes. Locks are
//! released before any call into the host expander or into Tera. An engine
//! still represents a single rendering pass owner: concurrent page renders
//! need separate engines.

mod element;
pub mod filters;
mod template;

#[cfg(test)]
mod engine_tests;

pub use template::format_tera_error;

use serde_yaml::Value;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::EngineConfig;
use crate::constants::{DEFINE_MARKER_PREFIX, DEFINE_NAME_ATTR, SOURCE_PAGE_ATTR};
use crate::core::WydraError;
use crate::instance::{Attributes, ContextStack, RenderInstance, Target};
use crate::registry::{HandlerKind, Registry};
use crate::store::{DataEntry, DataStore};

/// Host text substitution: raw text in, expanded text out.
///
/// Implementations locate marker spans in `text` and replace each with the
/// result of [`Engine::dispatch`] (or one of the specific `dispatch_*`
/// entry points). Text that holds no markers must come back unchanged.
pub trait MarkerExpander: Send + Sync {
    fn expand(&self, engine: &Engine, text: &str) -> String;
}

/// Host page storage.
pub trait PageSource: Send + Sync {
    /// Raw content of a page, `None` if it does not exist.
    fn fetch(&self, page: &str) -> Option<String>;

    /// Identifier of the page being rendered, if the host tracks one.
    fn current_page(&self) -> Option<String> {
        None
    }
}

/// Expander that leaves text untouched.
///
/// Used when no host is plugged in; `content()` then yields the raw body.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughExpander;

impl MarkerExpander for PassthroughExpander {
    fn expand(&self, _engine: &Engine, text: &str) -> String {
        text.to_string()
    }
}

struct Shared {
    registry: Registry,
    config: EngineConfig,
    stack: ContextStack,
    store: Mutex<DataStore>,
    expander: Box<dyn MarkerExpander>,
    pages: Option<Box<dyn PageSource>>,
}

/// Builder for [`Engine`].
pub struct EngineBuilder {
    config: EngineConfig,
    registry: Option<Registry>,
    expander: Box<dyn MarkerExpander>,
    pages: Option<Box<dyn PageSource>>,
}

impl EngineBuilder {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: None,
            expander: Box::new(PassthroughExpander),
            pages: None,
        }
    }

    /// Use a prebuilt registry instead of scanning the configured paths.
    #[must_use]
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn expander(mut self, expander: impl MarkerExpander + 'static) -> Self {
        self.expander = Box::new(expander);
        self
    }

    #[must_use]
    pub fn pages(mut self, pages: impl PageSource + 'static) -> Self {
        self.pages = Some(Box::new(pages));
        self
    }

    /// Build the engine, scanning template paths unless a registry was given.
    ///
    /// # Errors
    ///
    /// Returns an error if a template directory cannot be read.
    pub fn build(self) -> Result<Engine, WydraError> {
        let registry = match self.registry {
            Some(registry) => registry,
            None => Registry::from_config(&self.config)?,
        };

        tracing::debug!(
            "Engine ready: {} marker spelling(s), debug={}, dump_define={}",
            registry.alias_count(),
            self.config.debug,
            self.config.dump_define
        );

        Ok(Engine {
            shared: Arc::new(Shared {
                registry,
                config: self.config,
                stack: ContextStack::new(),
                store: Mutex::new(DataStore::new()),
                expander: self.expander,
                pages: self.pages,
            }),
        })
    }
}

/// Marker dispatcher and render context owner.
#[derive(Clone)]
pub struct Engine {
    shared: Arc<Shared>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.shared.config)
            .field("markers", &self.shared.registry.alias_count())
            .field("depth", &self.shared.stack.depth())
            .field("pages", &self.shared.pages.is_some())
            .finish_non_exhaustive()
    }
}

impl Engine {
    #[must_use]
    pub fn builder(config: EngineConfig) -> EngineBuilder {
        EngineBuilder::new(config)
    }

    /// Engine over the configured template paths with the given host expander.
    ///
    /// # Errors
    ///
    /// Returns an error if a template directory cannot be read.
    pub fn new(config: EngineConfig, expander: impl MarkerExpander + 'static) -> Result<Self, WydraError> {
        Self::builder(config).expander(expander).build()
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.shared.registry
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    /// Expand markers in `text` through the host expander.
    #[must_use]
    pub fn expand(&self, text: &str) -> String {
        self.shared.expander.expand(self, text)
    }

    /// Dispatch a marker by its surface spelling, whatever its kind.
    #[must_use]
    pub fn dispatch(&self, surface: &str, attrs: Attributes, content: &str) -> String {
        let Some(kind) = self.shared.registry.lookup(surface).map(|d| d.kind) else {
            tracing::debug!("Unknown marker '{}', emitting nothing", surface);
            return String::new();
        };

        match kind {
            HandlerKind::Element => self.dispatch_element(attrs, content, surface),
            HandlerKind::Template => self.dispatch_template(attrs, content, surface),
            HandlerKind::DataDefine => self.dispatch_define(attrs, content),
        }
    }

    /// Render an element marker (`w-div`, `wydra-span-2`, `w-tag`, `w-pre`).
    #[must_use]
    pub fn dispatch_element(&self, attrs: Attributes, content: &str, surface: &str) -> String {
        let Some(tag) = self.shared.registry.element_tag_for(surface) else {
            tracing::debug!("'{}' does not name an element marker", surface);
            return String::new();
        };

        let instance = RenderInstance::new(Target::Element(tag.to_string()), tag, attrs, content);
        self.render(instance)
    }

    /// Render a template marker.
    #[must_use]
    pub fn dispatch_template(&self, attrs: Attributes, content: &str, surface: &str) -> String {
        let registry = &self.shared.registry;
        let Some((code, path)) = registry
            .resolve(surface)
            .and_then(|code| registry.template_for(code).map(|path| (code, path)))
        else {
            tracing::debug!("'{}' does not name a template marker", surface);
            return String::new();
        };

        if !path.is_file() {
            tracing::warn!("Template file for '{}' is gone: {}", code, path.display());
            return String::new();
        }

        let content = match attrs.named(SOURCE_PAGE_ATTR).filter(|p| !p.is_empty()) {
            Some(page) => self.fetch_page(page),
            None => content.to_string(),
        };

        let instance = RenderInstance::new(Target::Template(path.to_path_buf()), code, attrs, content);
        self.render(instance)
    }

    /// Store a data block and emit the define marker output.
    ///
    /// The block is named by the `name` attribute, falling back to the host's
    /// current page and then to the empty name.
    #[must_use]
    pub fn dispatch_define(&self, attrs: Attributes, content: &str) -> String {
        let name = match attrs.named(DEFINE_NAME_ATTR) {
            Some(name) => name.to_string(),
            None => self.current_page().unwrap_or_default(),
        };

        let debug = self.shared.config.debug;
        let key = self.store().define(&name, content, debug);

        if self.shared.config.dump_define {
            let hash = self.store().entry(&key).map(|e| e.hash.clone()).unwrap_or_default();
            format!("{DEFINE_MARKER_PREFIX}{hash} ")
        } else {
            String::new()
        }
    }

    /// Push the instance, render it, pop it.
    fn render(&self, instance: RenderInstance) -> String {
        let target = instance.target.clone();
        let code = instance.code.clone();

        let output = match &target {
            Target::Element(tag) => {
                let (instance, wrap) = element::prepare(tag, instance);
                let _frame = self.shared.stack.push(instance);
                let output = element::render(self, wrap.as_ref());
                self.shared.stack.set_result(&output);
                output
            }
            Target::Template(path) => {
                let _frame = self.shared.stack.push(instance);
                let output = self.render_template_file(&code, path);
                self.shared.stack.set_result(&output);
                output
            }
        };

        tracing::debug!("Rendered '{}' ({}), {} byte(s)", code, target, output.len());
        output
    }

    fn render_template_file(&self, code: &str, path: &Path) -> String {
        match template::render(self, path) {
            Ok(output) => output,
            Err(e) => {
                if self.shared.config.debug {
                    tracing::warn!("{}", e);
                } else {
                    tracing::warn!("Template '{}' failed to render, emitting nothing", code);
                }
                String::new()
            }
        }
    }

    /// Copy of the innermost render instance.
    ///
    /// # Errors
    ///
    /// Returns [`WydraError::EmptyStack`] when no marker is rendering.
    pub fn current(&self) -> Result<RenderInstance, WydraError> {
        self.shared.stack.current()
    }

    /// Run `f` against the innermost render instance.
    ///
    /// # Errors
    ///
    /// Returns [`WydraError::EmptyStack`] when no marker is rendering.
    pub fn with_current<T>(&self, f: impl FnOnce(&RenderInstance) -> T) -> Result<T, WydraError> {
        self.shared.stack.with_current(f)
    }

    /// Attribute of the innermost instance, flags read as `"true"`.
    ///
    /// # Errors
    ///
    /// Returns [`WydraError::EmptyStack`] when no marker is rendering.
    pub fn attr(&self, name: &str, default: Option<&str>) -> Result<Option<String>, WydraError> {
        self.with_current(|instance| {
            instance
                .attr(name)
                .map(|v| v.to_string_value())
                .or_else(|| default.map(str::to_string))
        })
    }

    /// Fully expanded content of the innermost instance.
    ///
    /// This is the only place nested markers get expanded.
    ///
    /// # Errors
    ///
    /// Returns [`WydraError::EmptyStack`] when no marker is rendering.
    pub fn content(&self) -> Result<String, WydraError> {
        let raw = self.with_current(|instance| instance.content.clone())?;
        Ok(self.expand(&raw))
    }

    /// Current nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.shared.stack.depth()
    }

    fn store(&self) -> MutexGuard<'_, DataStore> {
        self.shared.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Data block by name or hash.
    #[must_use]
    pub fn data(&self, name_or_hash: &str) -> Option<Value> {
        self.store().lookup(name_or_hash).cloned()
    }

    /// Data block by exact storage key.
    #[must_use]
    pub fn data_by_key(&self, key: &str) -> Option<Value> {
        self.store().get(key).cloned()
    }

    /// Snapshot of the data store in definition order.
    #[must_use]
    pub fn data_entries(&self) -> Vec<DataEntry> {
        self.store().entries().cloned().collect()
    }

    /// Forget all defined data blocks.
    pub fn reset(&self) {
        self.store().clear();
        tracing::debug!("Data store cleared");
    }

    fn current_page(&self) -> Option<String> {
        self.shared.pages.as_ref().and_then(|pages| pages.current_page())
    }

    fn fetch_page(&self, page: &str) -> String {
        let Some(pages) = self.shared.pages.as_ref() else {
            tracing::warn!("'{}' used without a page source, ignoring page '{}'", SOURCE_PAGE_ATTR, page);
            return String::new();
        };

        pages.fetch(page).unwrap_or_else(|| {
            tracing::warn!("Source page '{}' not found", page);
            String::new()
        })
    }
}
