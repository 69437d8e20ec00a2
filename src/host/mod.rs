//! Reference host integration.
//!
//! The engine only dispatches markers; finding them in text and fetching
//! pages is the host's job. This module provides a small host good enough
//! for the CLI and for tests: a square-bracket marker syntax
//! ([`BracketExpander`]) and pages read from a directory ([`DirPageSource`]).

pub mod bracket;
pub mod pages;

pub use bracket::BracketExpander;
pub use pages::DirPageSource;
