//! Core types shared by every Wydra module.
//!
//! ## `error` - Error Handling
//!
//! - [`WydraError`] - Enumerated error types for the failure modes that are not
//!   absorbed inside a rendering pass
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to the user-friendly format
//!
//! # Examples
//!
//! ```rust
//! use wydra::core::{WydraError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn load() -> Result<()> {
//!     Err(WydraError::ConfigNotFound { path: "wydra.toml".into() }.into())
//! }
//!
//! if let Err(e) = load() {
//!     let friendly = user_friendly_error(e);
//!     assert!(friendly.suggestion.is_some());
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, WydraError, user_friendly_error};

/// Result alias used by library code.
pub type Result<T, E = WydraError> = std::result::Result<T, E>;
