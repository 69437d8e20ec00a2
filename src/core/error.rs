//! Error handling for Wydra
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** for precise handling inside the library
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! Most failures inside a rendering pass never reach this module: unknown
//! markers, missing templates and malformed data blocks are absorbed where they
//! happen and turned into empty output, so one bad block cannot abort a page.
//! The variants below cover what is left: configuration problems, template
//! directories that cannot be read, and misuse of the render stack.
//!
//! # Examples
//!
//! ```rust,no_run
//! use wydra::core::{ErrorContext, WydraError, user_friendly_error};
//!
//! let context = ErrorContext::new(WydraError::ConfigNotFound {
//!     path: "wydra.toml".to_string(),
//! })
//! .with_suggestion("Run `wydra init` to create one");
//! context.display();
//!
//! let friendly = user_friendly_error(anyhow::anyhow!("something broke"));
//! eprintln!("{friendly}");
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for Wydra operations.
#[derive(Error, Debug, Clone)]
pub enum WydraError {
    /// The current render instance was requested while no marker is rendering.
    ///
    /// This is an integration bug, not a content problem: template functions
    /// and handler code may only ask for the current instance from inside a
    /// dispatch call.
    #[error("No render instance is active (the instance stack is empty)")]
    EmptyStack,

    /// Configuration file does not exist at the requested location
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was looked up
        path: String,
    },

    /// Configuration file exists but is not valid TOML for [`EngineConfig`](crate::config::EngineConfig)
    #[error("Invalid configuration in {file}: {reason}")]
    ConfigParse {
        /// The configuration file
        file: String,
        /// Parser message
        reason: String,
    },

    /// Configuration parsed but violates a constraint
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong
        reason: String,
    },

    /// A template search path exists but could not be listed
    #[error("Cannot read template directory {path}: {reason}")]
    TemplateDirUnreadable {
        /// Directory that failed
        path: String,
        /// Underlying I/O message
        reason: String,
    },

    /// Tera failed to parse or render a template file
    #[error("Template '{template}' failed to render: {reason}")]
    TemplateRender {
        /// Template file or code
        template: String,
        /// Cleaned-up Tera message chain
        reason: String,
    },

    /// Generic I/O failure with the operation that triggered it
    #[error("I/O error during {operation}: {reason}")]
    Io {
        /// The operation that failed (e.g. "reading input")
        operation: String,
        /// Underlying I/O message
        reason: String,
    },

    /// Anything else
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Error wrapped with a suggestion and optional details for CLI display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: WydraError,
    /// Actionable next step for the user
    pub suggestion: Option<String>,
    /// Extra explanation of the failure
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error without suggestion or details.
    #[must_use]
    pub const fn new(error: WydraError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with a suggestion where one is known.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(wydra_error) = error.downcast_ref::<WydraError>() {
        return create_error_context(wydra_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(WydraError::Io {
                    operation: "file access".to_string(),
                    reason: io_error.to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(WydraError::Io {
                    operation: "file access".to_string(),
                    reason: io_error.to_string(),
                })
                .with_suggestion("Check file ownership and permissions");
            }
            _ => {}
        }
    }

    // Keep the whole anyhow chain so `with_context` messages are not lost
    ErrorContext::new(WydraError::Other {
        message: format!("{error:#}"),
    })
}

fn create_error_context(error: WydraError) -> ErrorContext {
    match &error {
        WydraError::ConfigNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run `wydra init` to create a default wydra.toml, or pass --config"),
        WydraError::ConfigParse {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the TOML syntax and the key names of wydra.toml")
            .with_details(
                "Known keys: tags, max_depth, prefixes, template_paths, debug, dump_define",
            ),
        WydraError::InvalidConfig {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Fix the offending value in wydra.toml and try again"),
        WydraError::TemplateDirUnreadable {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the template_paths entries and directory permissions"),
        WydraError::EmptyStack => ErrorContext::new(error).with_details(
            "The current render instance is only available while a marker is being dispatched",
        ),
        _ => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = WydraError::ConfigNotFound {
            path: "/tmp/wydra.toml".to_string(),
        };
        assert_eq!(error.to_string(), "Configuration file not found: /tmp/wydra.toml");

        assert_eq!(
            WydraError::EmptyStack.to_string(),
            "No render instance is active (the instance stack is empty)"
        );
    }

    #[test]
    fn test_error_context_formatting() {
        let ctx = ErrorContext::new(WydraError::InvalidConfig {
            reason: "max_depth must be at least 1".to_string(),
        })
        .with_suggestion("Set max_depth = 5")
        .with_details("max_depth bounds the depth-suffixed aliases");

        let text = ctx.to_string();
        assert!(text.contains("Invalid configuration: max_depth must be at least 1"));
        assert!(text.contains("Details: max_depth bounds"));
        assert!(text.contains("Suggestion: Set max_depth = 5"));
    }

    #[test]
    fn test_user_friendly_error_known_variant() {
        let err = anyhow::Error::new(WydraError::ConfigNotFound {
            path: "missing.toml".to_string(),
        });
        let ctx = user_friendly_error(err);
        assert!(matches!(ctx.error, WydraError::ConfigNotFound { .. }));
        assert!(ctx.suggestion.unwrap().contains("wydra init"));
    }

    #[test]
    fn test_user_friendly_error_keeps_chain() {
        let err = anyhow::anyhow!("inner").context("outer");
        let ctx = user_friendly_error(err);
        let text = ctx.to_string();
        assert!(text.contains("outer"));
        assert!(text.contains("inner"));
    }
}
