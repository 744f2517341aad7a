//! Whole-file copy for import trees.
//!
//! Each checked file is emitted once, in tree order, under a delimiter line
//! carrying its workspace-relative path.

use std::collections::HashSet;
use std::path::Path;

use crate::core::Warning;
use crate::resolver::WorkspaceRoots;
use crate::tree::{Node, NodeKind};

/// Concatenated file contents.
#[derive(Debug, Clone, Default)]
pub struct Concatenated {
    pub text: String,
    /// Number of files whose content made it into `text`.
    pub files: usize,
    pub warnings: Vec<Warning>,
}

/// Concatenate the content of every file node in `nodes`.
///
/// Directory and cycle-marker nodes contribute nothing, and a file reached
/// twice is emitted once. A file that cannot be read is left out entirely and
/// reported as [`Warning::FileReadFailed`].
pub async fn concatenate(nodes: &[&Node], workspace: &WorkspaceRoots) -> Concatenated {
    let mut out = Concatenated::default();
    let mut seen: HashSet<&Path> = HashSet::new();

    for node in nodes {
        if matches!(node.kind(), NodeKind::Directory | NodeKind::CycleMarker) {
            continue;
        }
        let path = node.location().path();
        if !seen.insert(path) {
            continue;
        }

        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                out.text.push_str(&format!("''' {} '''\n{}\n\n", workspace.relative(path), content));
                out.files += 1;
            }
            Err(e) => out.warnings.push(
                Warning::FileReadFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
                .logged(),
            ),
        }
    }

    out.text = out.text.trim_end().to_string();
    out
}
