//! Core types shared by every part of context-copy
//!
//! # Modules
//!
//! - `location` - [`Position`], [`Range`], [`Location`] and the [`IdentityKey`]
//!   used for cycle detection
//! - `error` - [`ContextCopyError`] (fatal), [`ErrorContext`] and
//!   [`user_friendly_error`] for the command line
//! - `warning` - [`Warning`] (recoverable, collected into outcomes)
//!
//! # Error Handling Pattern
//!
//! ```rust
//! use context_copy::core::{ContextCopyError, user_friendly_error};
//!
//! fn pick_root(selection: Option<&str>) -> anyhow::Result<&str> {
//!     selection.ok_or_else(|| ContextCopyError::NoActiveContext.into())
//! }
//!
//! let error = pick_root(None).unwrap_err();
//! let friendly = user_friendly_error(error);
//! assert!(friendly.suggestion.is_some());
//! ```

pub mod error;
pub mod location;
pub mod warning;

pub use error::{ContextCopyError, ErrorContext, user_friendly_error};
pub use location::{IdentityKey, Location, Position, Range};
pub use warning::Warning;
