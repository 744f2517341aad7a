//! In-memory workspace loaded from a JSON snapshot.
//!
//! A snapshot lists files with their text and symbol outline. Each symbol
//! may name the symbols it calls, which become edges of a call graph:
//!
//! ```json
//! {
//!   "root": ".",
//!   "files": [
//!     {
//!       "path": "a.ts",
//!       "text": "class Foo {\n  bar() { helper(); }\n}\nfunction helper() {}\n",
//!       "symbols": [
//!         {
//!           "name": "Foo", "kind": "class",
//!           "range": { "start": { "line": 0, "column": 0 }, "end": { "line": 2, "column": 1 } },
//!           "children": [
//!             {
//!               "name": "bar", "kind": "method",
//!               "range": { "start": { "line": 1, "column": 2 }, "end": { "line": 1, "column": 20 } },
//!               "calls": ["#helper"]
//!             }
//!           ]
//!         },
//!         {
//!           "name": "helper", "kind": "function",
//!           "range": { "start": { "line": 3, "column": 0 }, "end": { "line": 3, "column": 20 } }
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! A call target is `file#Dotted.Path`, or `#Dotted.Path` for the calling
//! file. Relative paths resolve against `root`. Files outside `root` stand in
//! for library code: they can be reached but are never expanded.

use anyhow::{Context, Result, anyhow};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{
    DocumentSymbol, Handle, ReferenceResolver, SymbolKind, SymbolSource, WorkspaceRoots, line_of,
    slice_text,
};
use crate::core::{ContextCopyError, IdentityKey, Location, Position, Range};
use crate::tree::NodeKind;

/// Serialized form of a workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    /// Workspace root. Relative roots resolve against the snapshot file's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub files: Vec<SnapshotFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub path: PathBuf,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub symbols: Vec<SnapshotSymbol>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub range: Range,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotSymbol>,
    /// Call targets in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calls: Vec<String>,
}

struct FileEntry {
    text: String,
    symbols: Vec<DocumentSymbol>,
}

/// Resolver over a [`WorkspaceSnapshot`].
pub struct SnapshotResolver {
    root: PathBuf,
    files: HashMap<PathBuf, FileEntry>,
    graph: DiGraph<Handle, ()>,
    /// (absolute file, dotted symbol path) -> graph node
    symbol_index: HashMap<(PathBuf, String), NodeIndex>,
    key_index: HashMap<IdentityKey, NodeIndex>,
}

struct PendingCall {
    from: NodeIndex,
    file: PathBuf,
    target: String,
}

impl SnapshotResolver {
    /// Read and index a snapshot file.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let mut snapshot: WorkspaceSnapshot = serde_json::from_str(&content)
            .map_err(ContextCopyError::from)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;

        let base = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        snapshot.root = Some(match snapshot.root.take() {
            Some(root) if root.is_absolute() => root,
            Some(root) => base.join(root),
            None => base,
        });
        Self::new(snapshot)
    }

    /// Index a snapshot. Fails with [`ContextCopyError::SnapshotInvalid`] on
    /// duplicate files or symbols and on call targets that match nothing.
    pub fn new(snapshot: WorkspaceSnapshot) -> Result<Self> {
        let root = snapshot.root.unwrap_or_else(|| PathBuf::from("."));
        let mut resolver = Self {
            root,
            files: HashMap::new(),
            graph: DiGraph::new(),
            symbol_index: HashMap::new(),
            key_index: HashMap::new(),
        };

        let mut pending = Vec::new();
        for file in snapshot.files {
            let path = resolver.absolute(&file.path);
            if resolver.files.contains_key(&path) {
                return Err(invalid(format!("file {} is listed twice", path.display())));
            }
            let mut outline = Vec::with_capacity(file.symbols.len());
            for symbol in file.symbols {
                outline.push(resolver.add_symbol(&path, "", symbol, &mut pending)?);
            }
            resolver.files.insert(
                path,
                FileEntry {
                    text: file.text,
                    symbols: outline,
                },
            );
        }

        for call in pending {
            let to = resolver.resolve_target(&call.file, &call.target)?;
            if !resolver.graph.contains_edge(call.from, to) {
                resolver.graph.add_edge(call.from, to, ());
            }
        }

        tracing::debug!(
            "Indexed snapshot: {} files, {} symbols, {} calls",
            resolver.files.len(),
            resolver.graph.node_count(),
            resolver.graph.edge_count()
        );
        Ok(resolver)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Workspace membership for this snapshot: everything under its root.
    #[must_use]
    pub fn workspace(&self) -> WorkspaceRoots {
        WorkspaceRoots::single(self.root.clone())
    }

    /// `path` made absolute against the snapshot root.
    #[must_use]
    pub fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() { path.to_path_buf() } else { self.root.join(path) }
    }

    fn add_symbol(
        &mut self,
        file: &Path,
        prefix: &str,
        symbol: SnapshotSymbol,
        pending: &mut Vec<PendingCall>,
    ) -> Result<DocumentSymbol> {
        let dotted =
            if prefix.is_empty() { symbol.name.clone() } else { format!("{prefix}.{}", symbol.name) };
        let index_key = (file.to_path_buf(), dotted.clone());
        if self.symbol_index.contains_key(&index_key) {
            return Err(invalid(format!("symbol {dotted} is defined twice in {}", file.display())));
        }

        let handle =
            Handle::new(&symbol.name, Location::new(file, symbol.range), NodeKind::Symbol);
        let key = handle.identity_key();
        let node = self.graph.add_node(handle);
        self.symbol_index.insert(index_key, node);
        self.key_index.entry(key).or_insert(node);

        pending.extend(symbol.calls.into_iter().map(|target| PendingCall {
            from: node,
            file: file.to_path_buf(),
            target,
        }));

        let mut children = Vec::with_capacity(symbol.children.len());
        for child in symbol.children {
            children.push(self.add_symbol(file, &dotted, child, pending)?);
        }

        Ok(DocumentSymbol {
            name: symbol.name,
            kind: symbol.kind,
            range: symbol.range,
            children,
        })
    }

    fn resolve_target(&self, caller_file: &Path, target: &str) -> Result<NodeIndex> {
        let (file, dotted) = target
            .split_once('#')
            .ok_or_else(|| invalid(format!("call target '{target}' has no '#'")))?;
        let file = if file.is_empty() { caller_file.to_path_buf() } else { self.absolute(Path::new(file)) };
        self.symbol_index.get(&(file, dotted.to_string())).copied().ok_or_else(|| {
            invalid(format!(
                "call target '{target}' in {} does not match any symbol",
                caller_file.display()
            ))
        })
    }

    fn entry(&self, file: &Path) -> Result<&FileEntry> {
        let path = self.absolute(file);
        self.files
            .get(&path)
            .ok_or_else(|| anyhow!("{} is not part of the workspace snapshot", path.display()))
    }
}

fn invalid(reason: String) -> anyhow::Error {
    ContextCopyError::SnapshotInvalid {
        reason,
    }
    .into()
}

impl ReferenceResolver for SnapshotResolver {
    async fn prepare_symbol_at(&self, file: &Path, position: Position) -> Result<Option<Handle>> {
        let path = self.absolute(file);
        let Some(entry) = self.files.get(&path) else {
            tracing::debug!("No snapshot entry for {}", path.display());
            return Ok(None);
        };

        // Innermost symbol whose range holds the position.
        let mut dotted: Option<String> = None;
        let mut level = entry.symbols.as_slice();
        while let Some(symbol) = level.iter().find(|s| s.range.contains_position(position)) {
            dotted = Some(match dotted {
                Some(prefix) => format!("{prefix}.{}", symbol.name),
                None => symbol.name.clone(),
            });
            level = &symbol.children;
        }

        Ok(dotted
            .and_then(|dotted| self.symbol_index.get(&(path, dotted)))
            .map(|node| self.graph[*node].clone()))
    }

    async fn outgoing_references(&self, handle: &Handle) -> Result<Vec<Handle>> {
        let node = self
            .key_index
            .get(&handle.identity_key())
            .copied()
            .ok_or_else(|| anyhow!("Unknown symbol {} at {}", handle.name, handle.location))?;

        let mut edges: Vec<_> = self.graph.edges(node).map(|e| (e.id(), e.target())).collect();
        edges.sort_by_key(|(id, _)| id.index());
        Ok(edges.into_iter().map(|(_, target)| self.graph[target].clone()).collect())
    }
}

impl SymbolSource for SnapshotResolver {
    async fn document_symbols(&self, file: &Path) -> Result<Vec<DocumentSymbol>> {
        Ok(self.entry(file)?.symbols.clone())
    }

    async fn read_text(&self, file: &Path, range: Range) -> Result<String> {
        Ok(slice_text(&self.entry(file)?.text, range))
    }

    async fn read_line(&self, file: &Path, line: u32) -> Result<String> {
        line_of(&self.entry(file)?.text, line)
            .ok_or_else(|| anyhow!("Line {} is out of range in {}", line + 1, file.display()))
    }

    fn display_path(&self, file: &Path) -> String {
        self.workspace().relative(&self.absolute(file))
    }
}
