//! Import statements that bring in copied symbols.
//!
//! A file's import declarations are its top-level [`SymbolKind::Module`]
//! symbols: the module path is the symbol's name and each child is one
//! imported binding. For every file in a copy, the report lists the import
//! statements of that file whose binding names one of the copied symbols.
//!
//! ```text
//! Relevant imports for file: a.ts
//! import { helper } from './b';
//!
//! No relevant imports found for file: b.ts
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::{CopyOutcome, drop_covered_cycle_markers, grouper};
use crate::core::Warning;
use crate::resolver::{DocumentSymbol, SymbolKind, SymbolSource};
use crate::tree::{CheckboxTree, NodeKind, NodeRef};

/// Import statement per imported name, from a file's symbol outline.
///
/// Functions, classes, variables and interfaces are named imports,
/// namespaces are `* as` imports and objects are default imports. Other
/// children are ignored. A later declaration of the same name wins.
#[must_use]
pub fn map_symbols_to_imports(symbols: &[DocumentSymbol]) -> HashMap<String, String> {
    let mut imports = HashMap::new();
    for declaration in symbols.iter().filter(|s| s.kind == SymbolKind::Module) {
        let module = &declaration.name;
        for child in &declaration.children {
            let name = &child.name;
            let statement = match child.kind {
                SymbolKind::Function
                | SymbolKind::Class
                | SymbolKind::Variable
                | SymbolKind::Interface => format!("import {{ {name} }} from '{module}';"),
                SymbolKind::Namespace => format!("import * as {name} from '{module}';"),
                SymbolKind::Object => format!("import {name} from '{module}';"),
                _ => continue,
            };
            imports.insert(name.clone(), statement);
        }
    }
    imports
}

/// Statements found for one file of the copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileImports {
    pub path: String,
    /// Deduplicated, in the order the copied names were checked.
    pub statements: Vec<String>,
}

/// Render the per-file report.
#[must_use]
pub fn render(files: &[FileImports]) -> String {
    files
        .iter()
        .map(|file| {
            if file.statements.is_empty() {
                format!("No relevant imports found for file: {}", file.path)
            } else {
                format!("Relevant imports for file: {}\n{}", file.path, file.statements.join("\n"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Report the import statements relevant to the checked part of the symbol
/// tree under `node`.
///
/// The files are those [`copy_info`](super::copy_info) would print, in the
/// same order. The copied names are the labels of every checked symbol node,
/// so a file that imports a helper copied from another file reports that
/// import.
pub async fn relevant_imports<S>(tree: &CheckboxTree, node: NodeRef, source: &S) -> CopyOutcome
where
    S: SymbolSource + ?Sized,
{
    let checked = tree.collect_checked(node);
    if checked.is_empty() {
        return CopyOutcome::NothingChecked;
    }

    let nodes = drop_covered_cycle_markers(tree, &checked);
    let grouper::GroupOutcome {
        group,
        mut warnings,
    } = grouper::group(&nodes, source).await;
    if group.is_empty() {
        return CopyOutcome::NothingValid {
            warnings,
        };
    }

    let mut names: Vec<&str> = Vec::new();
    let mut files_by_display: HashMap<String, PathBuf> = HashMap::new();
    for node in nodes.iter().filter(|n| n.kind() != NodeKind::CycleMarker) {
        if !names.contains(&node.label()) {
            names.push(node.label());
        }
        let file = node.location().path();
        files_by_display.entry(source.display_path(file)).or_insert_with(|| file.to_path_buf());
    }

    let mut files = Vec::with_capacity(group.files().len());
    for grouped in group.files() {
        let Some(file) = files_by_display.get(&grouped.path) else {
            continue;
        };
        match file_imports(file, &names, source).await {
            Ok(statements) => files.push(FileImports {
                path: grouped.path.clone(),
                statements,
            }),
            Err(e) => warnings.push(
                Warning::FileReadFailed {
                    path: file.clone(),
                    reason: format!("{e:#}"),
                }
                .logged(),
            ),
        }
    }

    tracing::debug!(
        "Relevant imports: {} statement(s) across {} file(s)",
        files.iter().map(|f| f.statements.len()).sum::<usize>(),
        files.len()
    );
    CopyOutcome::Copied {
        text: render(&files),
        warnings,
    }
}

async fn file_imports<S>(file: &Path, names: &[&str], source: &S) -> anyhow::Result<Vec<String>>
where
    S: SymbolSource + ?Sized,
{
    let imports = map_symbols_to_imports(&source.document_symbols(file).await?);
    let mut seen: HashSet<&String> = HashSet::new();
    let mut statements = Vec::new();
    for statement in names.iter().filter_map(|name| imports.get(*name)) {
        if seen.insert(statement) {
            statements.push(statement.clone());
        }
    }
    Ok(statements)
}
