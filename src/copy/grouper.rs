//! Fragment grouping.
//!
//! Checked nodes are turned into source fragments and grouped by file, then
//! by container. Methods of one class share a single container keyed by the
//! class's declaration line, so the serializer prints that header once no
//! matter how many members were selected. Everything else gets its own
//! standalone container.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::core::{Range, Warning};
use crate::resolver::{DocumentSymbol, SymbolSource};
use crate::tree::Node;

/// Grouping key inside one file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContainerKey {
    /// Literal declaration line of a class or interface.
    Header(String),
    /// A symbol that is not a member of any class, keyed by node label.
    Standalone(String),
}

impl ContainerKey {
    #[must_use]
    pub const fn is_standalone(&self) -> bool {
        matches!(self, Self::Standalone(_))
    }
}

impl fmt::Display for ContainerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header(header) => f.write_str(header),
            Self::Standalone(label) => write!(f, "standalone:{label}"),
        }
    }
}

/// A contiguous piece of source with one-based line bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub start_line: u32,
    pub end_line: u32,
    pub code: String,
}

impl Fragment {
    /// Fragment for a zero-based `range`.
    pub fn from_range(range: Range, code: impl Into<String>) -> Self {
        Self {
            start_line: range.display_start_line(),
            end_line: range.display_end_line(),
            code: code.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerFragments {
    pub key: ContainerKey,
    pub fragments: Vec<Fragment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFragments {
    /// Path as it appears in the output.
    pub path: String,
    pub containers: Vec<ContainerFragments>,
}

/// file -> container -> fragments, each level in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentGroup {
    files: Vec<FileFragments>,
}

impl FragmentGroup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `fragment` under `file` / `key`, creating either level on first use.
    pub fn push(&mut self, file: &str, key: ContainerKey, fragment: Fragment) {
        let file_index = match self.files.iter().position(|f| f.path == file) {
            Some(index) => index,
            None => {
                self.files.push(FileFragments {
                    path: file.to_string(),
                    containers: Vec::new(),
                });
                self.files.len() - 1
            }
        };
        let containers = &mut self.files[file_index].containers;
        match containers.iter_mut().find(|c| c.key == key) {
            Some(container) => container.fragments.push(fragment),
            None => containers.push(ContainerFragments {
                key,
                fragments: vec![fragment],
            }),
        }
    }

    /// Stable-sort every container's fragments by start line.
    pub fn sort_fragments(&mut self) {
        for file in &mut self.files {
            for container in &mut file.containers {
                container.fragments.sort_by_key(|f| f.start_line);
            }
        }
    }

    #[must_use]
    pub fn files(&self) -> &[FileFragments] {
        &self.files
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.files
            .iter()
            .flat_map(|f| &f.containers)
            .map(|c| c.fragments.len())
            .sum()
    }
}

/// Result of [`group`]: the grouping plus the nodes that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct GroupOutcome {
    pub group: FragmentGroup,
    pub warnings: Vec<Warning>,
}

/// Symbols enclosing `range`, outermost first.
///
/// At each level the first symbol whose range contains `range` is taken and
/// the search continues in its children.
#[must_use]
pub fn find_enclosing_chain<'a>(symbols: &'a [DocumentSymbol], range: &Range) -> Vec<&'a DocumentSymbol> {
    let mut chain = Vec::new();
    let mut level = symbols;
    while let Some(symbol) = level.iter().find(|s| s.range.contains(range)) {
        chain.push(symbol);
        level = &symbol.children;
    }
    chain
}

/// Group `nodes` (in order) into fragments.
///
/// Symbols are fetched once per file for the duration of the call. A node
/// with no enclosing symbol, or whose text cannot be read, is skipped with a
/// warning; the rest of the batch is still grouped.
pub async fn group<S>(nodes: &[&Node], source: &S) -> GroupOutcome
where
    S: SymbolSource + ?Sized,
{
    let mut outcome = GroupOutcome::default();
    let mut symbol_cache: HashMap<PathBuf, Vec<DocumentSymbol>> = HashMap::new();

    for node in nodes {
        let file = node.location().path();
        let node_range = node.location().range;

        if symbol_cache.contains_key(file) {
            tracing::trace!("Symbol cache hit for {}", file.display());
        } else {
            match source.document_symbols(file).await {
                Ok(symbols) => {
                    symbol_cache.insert(file.to_path_buf(), symbols);
                }
                Err(e) => {
                    outcome.warnings.push(
                        Warning::ContainerResolutionFailed {
                            label: node.label().to_string(),
                            file: file.to_path_buf(),
                            reason: format!("{e:#}"),
                        }
                        .logged(),
                    );
                    continue;
                }
            }
        }
        let symbols = symbol_cache.get(file).map_or(&[][..], Vec::as_slice);

        let chain = find_enclosing_chain(symbols, &node_range);
        let (key, range) = match chain.as_slice() {
            [] => {
                outcome.warnings.push(
                    Warning::ContainerResolutionFailed {
                        label: node.label().to_string(),
                        file: file.to_path_buf(),
                        reason: "no symbol encloses the node's range".to_string(),
                    }
                    .logged(),
                );
                continue;
            }
            [.., container, member] if container.kind.is_container() && member.kind.is_member() => {
                match source.read_line(file, container.range.start.line).await {
                    Ok(header) => (ContainerKey::Header(header), member.range),
                    Err(e) => {
                        outcome.warnings.push(read_failed(file, &e));
                        continue;
                    }
                }
            }
            [_] => (ContainerKey::Standalone(node.label().to_string()), node_range),
            [.., innermost] => (ContainerKey::Standalone(node.label().to_string()), innermost.range),
        };

        let code = match source.read_text(file, range).await {
            Ok(code) => code,
            Err(e) => {
                outcome.warnings.push(read_failed(file, &e));
                continue;
            }
        };

        tracing::debug!("Grouped {} under {}", node.label(), key);
        outcome.group.push(&source.display_path(file), key, Fragment::from_range(range, code));
    }

    outcome.group.sort_fragments();
    outcome
}

fn read_failed(file: &std::path::Path, e: &anyhow::Error) -> Warning {
    Warning::FileReadFailed {
        path: file.to_path_buf(),
        reason: format!("{e:#}"),
    }
    .logged()
}
