//! Recoverable failures.
//!
//! A [`Warning`] never aborts an operation. The code that raises one logs it
//! with `tracing::warn!`, degrades locally (truncates a subtree, skips a node,
//! omits a file) and hands the warning back in the operation's outcome.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Outgoing references of one node could not be resolved; its subtree was truncated.
    #[error("Could not expand '{node}': {reason}")]
    SubtreeExpansionFailed {
        /// Id of the node whose children are missing
        node: String,
        /// Underlying resolver failure
        reason: String,
    },

    /// No enclosing container chain was found for a checked node; it was skipped.
    #[error("No enclosing symbol found for '{label}' in {}: {reason}", file.display())]
    ContainerResolutionFailed {
        /// Label of the skipped node
        label: String,
        /// File the node points into
        file: PathBuf,
        /// Why resolution failed
        reason: String,
    },

    /// Source text of a file could not be read; its content was omitted.
    #[error("Failed to read file {}: {reason}", path.display())]
    FileReadFailed {
        /// File that could not be read
        path: PathBuf,
        /// Underlying read failure
        reason: String,
    },
}

impl Warning {
    /// Log this warning and return it, for call sites that push into a list.
    #[must_use]
    pub fn logged(self) -> Self {
        tracing::warn!("{}", self);
        self
    }
}
