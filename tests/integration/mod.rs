//! Integration test suite for Wydra
//!
//! End-to-end tests that drive the `wydra` binary and the public library API
//! against throwaway sites in temporary directories.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: `init`, `list`, `resolve` and error reporting through the binary
//! - **config**: configuration discovery and validation
//! - **render**: whole-page expansion through the bracket host

#[path = "../common/mod.rs"]
mod common;

mod cli;
mod config;
mod render;
