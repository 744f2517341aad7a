//! Error handling for context-copy
//!
//! Failures fall into two groups and are modelled by two types:
//! - [`ContextCopyError`] - fatal errors. The operation that raised one stops
//!   before publishing anything (no tree is replaced, nothing is copied).
//! - [`Warning`](crate::core::Warning) - recoverable failures. They are logged,
//!   collected into the operation's outcome, and the rest of the batch goes on.
//!
//! Cycles in a reference graph are neither: the builder represents them
//! structurally as cycle-marker nodes.
//!
//! [`ErrorContext`] wraps a fatal error with a suggestion and details for the
//! command-line front end, and [`user_friendly_error`] converts any
//! [`anyhow::Error`] into one.
//!
//! # Examples
//!
//! ```rust,no_run
//! use context_copy::core::{ContextCopyError, ErrorContext};
//!
//! let context = ErrorContext::new(ContextCopyError::NoActiveContext)
//!     .with_suggestion("Pass --file together with --line and --column");
//!
//! context.display(); // colored output on stderr
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Fatal errors raised by context-copy operations.
///
/// # Error Categories
///
/// - **Selection**: [`NoActiveContext`], [`RootResolutionFailed`], [`NodeNotFound`]
/// - **Resolvers**: [`ResolverFailed`], [`ImportCommandFailed`], [`SnapshotInvalid`]
/// - **Configuration**: [`ConfigError`], [`TomlError`]
/// - **Plumbing**: [`IoError`], [`JsonError`]
///
/// [`NoActiveContext`]: ContextCopyError::NoActiveContext
/// [`RootResolutionFailed`]: ContextCopyError::RootResolutionFailed
/// [`NodeNotFound`]: ContextCopyError::NodeNotFound
/// [`ResolverFailed`]: ContextCopyError::ResolverFailed
/// [`ImportCommandFailed`]: ContextCopyError::ImportCommandFailed
/// [`SnapshotInvalid`]: ContextCopyError::SnapshotInvalid
/// [`ConfigError`]: ContextCopyError::ConfigError
/// [`TomlError`]: ContextCopyError::TomlError
/// [`IoError`]: ContextCopyError::IoError
/// [`JsonError`]: ContextCopyError::JsonError
#[derive(Error, Debug)]
pub enum ContextCopyError {
    /// There is no current selection or document to start from.
    #[error("No active document or selection")]
    NoActiveContext,

    /// The resolver produced no handle for the starting point.
    #[error("Could not resolve a symbol or file at {location}")]
    RootResolutionFailed {
        /// Human-readable starting location (`file:line:column`)
        location: String,
    },

    /// A tree node id did not match any node in the active tree.
    #[error("No node with id '{id}' in the current tree")]
    NodeNotFound {
        /// The id that was looked up
        id: String,
    },

    /// A resolver call failed outside of a recoverable context.
    #[error("Resolver operation '{operation}' failed: {reason}")]
    ResolverFailed {
        /// The resolver capability that was called
        operation: String,
        /// Underlying failure
        reason: String,
    },

    /// The external import parser exited unsuccessfully.
    #[error("Import parser '{program}' failed with exit code {code:?}")]
    ImportCommandFailed {
        /// Program that was executed
        program: String,
        /// Exit code, if the process exited normally
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// A workspace snapshot was structurally invalid.
    #[error("Invalid workspace snapshot: {reason}")]
    SnapshotInvalid {
        /// What was wrong with the snapshot
        reason: String,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl Clone for ContextCopyError {
    fn clone(&self) -> Self {
        match self {
            Self::NoActiveContext => Self::NoActiveContext,
            Self::RootResolutionFailed {
                location,
            } => Self::RootResolutionFailed {
                location: location.clone(),
            },
            Self::NodeNotFound {
                id,
            } => Self::NodeNotFound {
                id: id.clone(),
            },
            Self::ResolverFailed {
                operation,
                reason,
            } => Self::ResolverFailed {
                operation: operation.clone(),
                reason: reason.clone(),
            },
            Self::ImportCommandFailed {
                program,
                code,
                stderr,
            } => Self::ImportCommandFailed {
                program: program.clone(),
                code: *code,
                stderr: stderr.clone(),
            },
            Self::SnapshotInvalid {
                reason,
            } => Self::SnapshotInvalid {
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            // io::Error is not Clone; keep the kind and message
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
            // serde_json and toml errors cannot be rebuilt, keep their text
            Self::JsonError(e) => Self::Other {
                message: format!("JSON error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// A fatal error plus optional guidance for the person running the tool.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: ContextCopyError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: ContextCopyError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error. Shown in green.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error. Shown in yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with colors.
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
///
/// Recognizes [`ContextCopyError`] (directly or anywhere in the chain) and
/// [`std::io::Error`]; anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ctx_error) = error.chain().find_map(|e| e.downcast_ref::<ContextCopyError>()) {
        return create_error_context(ctx_error);
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(ContextCopyError::IoError(std::io::Error::new(
                    io_error.kind(),
                    io_error.to_string(),
                )))
                .with_suggestion("Check that the file or directory exists and the path is correct")
                .with_details(
                    "This error occurs when a required file or directory cannot be found",
                );
            }
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(ContextCopyError::IoError(std::io::Error::new(
                    io_error.kind(),
                    io_error.to_string(),
                )))
                .with_suggestion("Check the file permissions of the workspace and the config file");
            }
            _ => {}
        }
    }

    // Generic error - include the full error chain
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(ContextCopyError::Other {
        message,
    })
}

// Matches on the borrowed error: cloning turns the JSON and TOML variants
// into `Other`.
fn create_error_context(source: &ContextCopyError) -> ErrorContext {
    let error = source.clone();
    match source {
        ContextCopyError::NoActiveContext => ErrorContext::new(error)
            .with_suggestion("Select a symbol or open a file first (on the command line: pass the file and position)"),

        ContextCopyError::RootResolutionFailed { location } => {
            let details = format!(
                "Nothing at {location} could be resolved to a symbol. Point at a declaration name or a call site"
            );
            ErrorContext::new(error)
                .with_suggestion("Move the cursor onto a function, method or class name and try again")
                .with_details(details)
        }

        ContextCopyError::ImportCommandFailed { stderr, .. } => {
            let details = if stderr.trim().is_empty() {
                "The parser produced no error output".to_string()
            } else {
                stderr.trim().to_string()
            };
            ErrorContext::new(error)
                .with_suggestion("Check the 'python' and 'import_script' settings, or set CTXCOPY_PYTHON")
                .with_details(details)
        }

        ContextCopyError::SnapshotInvalid { .. } => ErrorContext::new(error)
            .with_suggestion("Every 'calls' entry must name a symbol declared in the snapshot, as 'file#Outer.inner' or '#Outer.inner'"),

        ContextCopyError::ConfigError { .. } | ContextCopyError::TomlError(_) => ErrorContext::new(error)
            .with_suggestion("Fix or remove the config file (default: ~/.ctxcopy/config.toml)"),

        ContextCopyError::JsonError(_) => ErrorContext::new(error)
            .with_suggestion("Check that the snapshot file and the import parser output are valid JSON"),

        ContextCopyError::NodeNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Print the tree with --tree to see the ids of its nodes"),

        _ => ErrorContext::new(error),
    }
}
