//! Resolver capabilities.
//!
//! The core never parses source code itself. Everything it knows about
//! symbols, references and text comes through the traits in this module:
//!
//! - [`ReferenceResolver`] - find the handle at a position and list a
//!   handle's outgoing references (callees, or import targets). Drives the
//!   [`builder`](crate::builder).
//! - [`SymbolSource`] - hierarchical document symbols and raw source text.
//!   Drives the [`grouper`](crate::copy::grouper).
//! - [`Membership`] - decides which locations count as workspace code;
//!   anything else is treated as library code and never expanded.
//!
//! Two backends ship with the crate:
//!
//! - [`snapshot::SnapshotResolver`] - an in-memory workspace loaded from a
//!   JSON snapshot, implementing both traits.
//! - [`imports::ImportResolver`] - a file-import resolver that pipes each
//!   file to an external parser process.
//!
//! All resolver calls are awaited one at a time by the callers; a resolver
//! does not need to be safe for concurrent use by a single operation.

pub mod command;
pub mod imports;
pub mod snapshot;

pub use command::ImportCommand;
pub use imports::ImportResolver;
pub use snapshot::{SnapshotResolver, WorkspaceSnapshot};

use crate::core::{IdentityKey, Location, Position, Range};
use crate::tree::NodeKind;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};

/// Resolver-provided reference to a symbol or file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle {
    /// Display name, used as the node label.
    pub name: String,
    pub location: Location,
    /// Kind of node this handle turns into.
    pub kind: NodeKind,
}

impl Handle {
    pub fn new(name: impl Into<String>, location: Location, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            location,
            kind,
        }
    }

    #[must_use]
    pub fn identity_key(&self) -> IdentityKey {
        self.location.identity_key()
    }
}

/// Finds starting handles and follows outgoing references.
pub trait ReferenceResolver: Send + Sync {
    /// Handle for the symbol (or file) at `position` in `file`, if any.
    fn prepare_symbol_at(
        &self,
        file: &Path,
        position: Position,
    ) -> impl Future<Output = Result<Option<Handle>>> + Send;

    /// Outgoing references of `handle`, in the resolver's own order.
    fn outgoing_references(
        &self,
        handle: &Handle,
    ) -> impl Future<Output = Result<Vec<Handle>>> + Send;
}

/// Kind tag of a document symbol. Only the distinctions the grouper and the
/// import mapping need are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Class,
    Interface,
    Method,
    Function,
    /// Also an import declaration, when it sits at the top of a file.
    Module,
    Variable,
    Namespace,
    Object,
    #[serde(other)]
    Other,
}

impl SymbolKind {
    /// Class-like symbols whose members are grouped under one header.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Class | Self::Interface)
    }

    /// Callable members of a container.
    #[must_use]
    pub const fn is_member(self) -> bool {
        matches!(self, Self::Method | Self::Function)
    }
}

/// One entry of a file's symbol outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub range: Range,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentSymbol>,
}

/// Symbol outlines and source text of workspace files.
pub trait SymbolSource: Send + Sync {
    /// Top-level symbols of `file`, each with nested children.
    fn document_symbols(
        &self,
        file: &Path,
    ) -> impl Future<Output = Result<Vec<DocumentSymbol>>> + Send;

    /// Text spanned by `range` in `file`.
    fn read_text(&self, file: &Path, range: Range) -> impl Future<Output = Result<String>> + Send;

    /// Zero-based line `line` of `file`, without its line terminator.
    fn read_line(&self, file: &Path, line: u32) -> impl Future<Output = Result<String>> + Send;

    /// Path shown in serialized output. Defaults to the path as given.
    fn display_path(&self, file: &Path) -> String {
        file.display().to_string()
    }
}

/// Decides whether a path belongs to the user's workspace.
pub trait Membership {
    fn is_under_workspace_root(&self, path: &Path) -> bool;
}

impl<F> Membership for F
where
    F: Fn(&Path) -> bool,
{
    fn is_under_workspace_root(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Membership by path prefix against one or more workspace roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceRoots {
    roots: Vec<PathBuf>,
}

impl WorkspaceRoots {
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }

    pub fn single(root: impl Into<PathBuf>) -> Self {
        Self::new([root.into()])
    }

    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    #[must_use]
    pub fn primary(&self) -> Option<&Path> {
        self.roots.first().map(PathBuf::as_path)
    }

    /// `path` relative to the first root containing it, or unchanged.
    #[must_use]
    pub fn relative(&self, path: &Path) -> String {
        self.roots
            .iter()
            .find_map(|root| path.strip_prefix(root).ok())
            .filter(|rel| !rel.as_os_str().is_empty())
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

impl Membership for WorkspaceRoots {
    fn is_under_workspace_root(&self, path: &Path) -> bool {
        self.roots.iter().any(|root| path.starts_with(root))
    }
}

/// Cut the text covered by `range` out of `text`.
///
/// Columns count characters. Ranges running past the end of a line or of the
/// text are clamped.
#[must_use]
pub fn slice_text(text: &str, range: Range) -> String {
    let lines: Vec<&str> = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect();
    let start_line = range.start.line as usize;
    let end_line = (range.end.line as usize).min(lines.len().saturating_sub(1));
    if start_line >= lines.len() || start_line > end_line {
        return String::new();
    }

    let take = |line: &str, from: u32, to: Option<u32>| -> String {
        let chars = line.chars().skip(from as usize);
        match to {
            Some(to) => chars.take((to.saturating_sub(from)) as usize).collect(),
            None => chars.collect(),
        }
    };

    if start_line == end_line {
        let end_column = if range.end.line as usize > end_line { None } else { Some(range.end.column) };
        return take(lines[start_line], range.start.column, end_column);
    }

    let mut parts = Vec::with_capacity(end_line - start_line + 1);
    parts.push(take(lines[start_line], range.start.column, None));
    for line in &lines[start_line + 1..end_line] {
        parts.push((*line).to_string());
    }
    let end_column = if range.end.line as usize > end_line { None } else { Some(range.end.column) };
    parts.push(take(lines[end_line], 0, end_column));
    parts.join("\n")
}

/// Zero-based line `line` of `text`, if it exists.
#[must_use]
pub fn line_of(text: &str, line: u32) -> Option<String> {
    text.split('\n')
        .nth(line as usize)
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
}
