//! Wydra - recursive shortcode expansion
//!
//! Wydra turns prefixed markers embedded in page content into HTML. A marker
//! is written by a host (a CMS filter, the bundled bracket syntax, ...) and
//! dispatched to one of three handlers:
//!
//! - **elements**: `[w-div class=x]..[/w-div]` wraps its expanded content in a tag
//! - **templates**: `[w-card]..[/w-card]` renders `templates/card.tera` with Tera
//! - **data definitions**: `[w-define name=nav]- a\n- b[/w-define]` stores a
//!   YAML block that templates read back with `data(name="nav")`
//!
//! Handlers expand their inner content through the host again, so markers
//! nest arbitrarily. The engine keeps a stack of render instances while it
//! does so; template functions always see the innermost one.
//!
//! # Architecture Overview
//!
//! ```text
//! host text ──► MarkerExpander ──► Engine::dispatch(surface, attrs, content)
//!                    ▲                  │  Registry: surface ──► code, kind
//!                    │                  ├─ element ──► open tag + content() + close
//!                    │                  ├─ template ─► Tera(attr, content, yaml, data)
//!                    │                  └─ define ───► extract ──► DataStore
//!                    └──── content() ◄──┘  ContextStack (push / pop per dispatch)
//! ```
//!
//! Failures inside a pass (unknown marker, missing template, malformed YAML)
//! are logged and produce empty output for that marker only.
//!
//! # Core Modules
//!
//! - [`registry`] - Marker definitions and prefix/depth alias resolution
//! - [`instance`] - Render instances, attributes and the context stack
//! - [`engine`] - Dispatch, element rendering and the Tera runtime
//! - [`extract`] - YAML extraction from editor-mangled content
//! - [`store`] - Named, hash-keyed data blocks
//! - [`host`] - Reference bracket-syntax host and directory page source
//!
//! ## Supporting Modules
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - `wydra.toml` loading and validation
//! - [`constants`] - Shared defaults and reserved names
//! - [`core`] - Error types and user-facing error formatting
//!
//! # Example
//!
//! ```rust,no_run
//! use wydra::config::EngineConfig;
//! use wydra::engine::Engine;
//! use wydra::host::BracketExpander;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = EngineConfig::load_or_default(None)?;
//! let engine = Engine::new(config, BracketExpander::new()?)?;
//!
//! let html = engine.expand("[w-div class=note]Hello [w-span]world[/w-span][/w-div]");
//! assert_eq!(html, r#"<div class="note">Hello <span>world</span></div>"#);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod engine;
pub mod extract;
pub mod host;
pub mod instance;
pub mod registry;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::EngineConfig;
pub use core::{WydraError, user_friendly_error};
pub use engine::{Engine, EngineBuilder, MarkerExpander, PageSource};
pub use registry::{HandlerKind, Registry};
