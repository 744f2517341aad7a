//! Copying the checked part of a tree as text.
//!
//! Two flavours exist, one per tree variant:
//!
//! - [`copy_info`] for symbol trees: checked nodes are grouped into
//!   fragments ([`grouper`]) and rendered ([`serializer`]), so class members
//!   share one class header.
//! - [`copy_file_info`] for import trees: the full content of each checked
//!   file is concatenated ([`files`]).
//!
//! [`relevant_imports`] reports, for a symbol tree, the import statements
//! that bring the copied symbols into each copied file.
//!
//! Both start from [`CheckboxTree::collect_checked`], so an unchecked node
//! hides its whole subtree. Nothing checked, or nothing usable, is reported
//! through [`CopyOutcome`] rather than as an error.

pub mod files;
pub mod grouper;
pub mod relevant;
pub mod serializer;

pub use grouper::{ContainerKey, Fragment, FragmentGroup, GroupOutcome, find_enclosing_chain, group};
pub use relevant::relevant_imports;
pub use serializer::serialize;

use std::collections::HashSet;

use crate::core::{IdentityKey, Warning};
use crate::resolver::{SymbolSource, WorkspaceRoots};
use crate::tree::{CheckboxTree, Node, NodeKind, NodeRef};

/// Message shown when the selection has no checked nodes.
pub const NOTHING_CHECKED_MESSAGE: &str = "No checked dependency items to copy.";

/// Message shown when checked nodes exist but none produced any text.
pub const NOTHING_VALID_MESSAGE: &str = "No valid dependency items to copy.";

/// What a copy produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The starting node itself is unchecked.
    NothingChecked,
    /// Every checked node was skipped.
    NothingValid {
        warnings: Vec<Warning>,
    },
    Copied {
        text: String,
        warnings: Vec<Warning>,
    },
}

impl CopyOutcome {
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Copied {
                text,
                ..
            } => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        match self {
            Self::NothingChecked => &[],
            Self::NothingValid {
                warnings,
            }
            | Self::Copied {
                warnings,
                ..
            } => warnings,
        }
    }

    /// Informational message for the empty outcomes.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::NothingChecked => Some(NOTHING_CHECKED_MESSAGE),
            Self::NothingValid {
                ..
            } => Some(NOTHING_VALID_MESSAGE),
            Self::Copied {
                ..
            } => None,
        }
    }
}

/// Group and serialize the checked part of the symbol tree under `node`.
pub async fn copy_info<S>(tree: &CheckboxTree, node: NodeRef, source: &S) -> CopyOutcome
where
    S: SymbolSource + ?Sized,
{
    let checked = tree.collect_checked(node);
    if checked.is_empty() {
        return CopyOutcome::NothingChecked;
    }

    let nodes = drop_covered_cycle_markers(tree, &checked);
    let GroupOutcome {
        group,
        warnings,
    } = grouper::group(&nodes, source).await;

    if group.is_empty() {
        return CopyOutcome::NothingValid {
            warnings,
        };
    }
    CopyOutcome::Copied {
        text: serialize(&group),
        warnings,
    }
}

/// Concatenate the checked files of the import tree under `node`.
pub async fn copy_file_info(tree: &CheckboxTree, node: NodeRef, workspace: &WorkspaceRoots) -> CopyOutcome {
    let checked = tree.collect_checked(node);
    if checked.is_empty() {
        return CopyOutcome::NothingChecked;
    }

    let nodes: Vec<&Node> = checked.iter().map(|r| tree.node(*r)).collect();
    let concatenated = files::concatenate(&nodes, workspace).await;
    if concatenated.files == 0 {
        return CopyOutcome::NothingValid {
            warnings: concatenated.warnings,
        };
    }
    CopyOutcome::Copied {
        text: concatenated.text,
        warnings: concatenated.warnings,
    }
}

/// Resolve `checked` to nodes, leaving out cycle markers that point at a
/// symbol some other checked node already covers.
fn drop_covered_cycle_markers<'a>(tree: &'a CheckboxTree, checked: &[NodeRef]) -> Vec<&'a Node> {
    let nodes: Vec<&Node> = checked.iter().map(|r| tree.node(*r)).collect();
    let covered: HashSet<IdentityKey> = nodes
        .iter()
        .filter(|n| n.kind() != NodeKind::CycleMarker)
        .map(|n| n.location().identity_key())
        .collect();
    nodes
        .into_iter()
        .filter(|n| {
            n.kind() != NodeKind::CycleMarker || !covered.contains(&n.location().identity_key())
        })
        .collect()
}
