//! Reachability graph builder.
//!
//! Turns "everything reachable from here" into a [`CheckboxTree`]. Starting
//! from the handle at the selection, the builder asks the resolver for each
//! handle's outgoing references and expands them depth-first:
//!
//! - references whose target lies outside the workspace are dropped;
//! - a handle whose [`IdentityKey`] was already visited in this build becomes
//!   a `"<name> (already visited)"` leaf of kind [`NodeKind::CycleMarker`],
//!   so reference cycles terminate;
//! - a resolver failure while expanding one handle truncates that subtree,
//!   raises a [`Warning::SubtreeExpansionFailed`], and the build continues.
//!
//! Children appear in the order the resolver returned them. Traversal uses
//! an explicit stack of frames, so arbitrarily deep reference chains do not
//! grow the call stack.
//!
//! # Example
//!
//! ```rust,ignore
//! use context_copy::builder::{Selection, build};
//!
//! # async fn example(resolver: &context_copy::resolver::SnapshotResolver) -> anyhow::Result<()> {
//! let selection = Selection::new("src/a.ts", Position::new(1, 4));
//! let outcome = build(Some(&selection), resolver, &resolver.workspace()).await?;
//! for warning in &outcome.warnings {
//!     eprintln!("{warning}");
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;

use crate::core::{ContextCopyError, IdentityKey, Position, Warning};
use crate::resolver::{Handle, Membership, ReferenceResolver};
use crate::tree::{CheckboxTree, NodeKind, NodeRef};

/// Suffix appended to the label of a revisited handle.
pub const CYCLE_MARKER_SUFFIX: &str = " (already visited)";

/// Where a build starts: the active document and cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub file: PathBuf,
    pub position: Position,
}

impl Selection {
    pub fn new(file: impl Into<PathBuf>, position: Position) -> Self {
        Self {
            file: file.into(),
            position,
        }
    }
}

/// A finished build.
#[derive(Debug)]
pub struct BuildOutcome {
    pub tree: CheckboxTree,
    pub root: NodeRef,
    /// Subtrees that could not be expanded.
    pub warnings: Vec<Warning>,
}

/// Node whose remaining references still have to be visited.
struct Frame {
    node: NodeRef,
    pending: VecDeque<Handle>,
}

/// Build the tree of everything reachable from `selection`.
///
/// # Errors
///
/// - [`ContextCopyError::NoActiveContext`] when `selection` is `None`
/// - [`ContextCopyError::RootResolutionFailed`] when the resolver finds no
///   handle at the selection
/// - [`ContextCopyError::ResolverFailed`] when looking up the root handle
///   itself fails
///
/// No tree is produced in any of these cases.
pub async fn build<R, M>(
    selection: Option<&Selection>,
    resolver: &R,
    membership: &M,
) -> Result<BuildOutcome, ContextCopyError>
where
    R: ReferenceResolver,
    M: Membership + ?Sized,
{
    let selection = selection.ok_or(ContextCopyError::NoActiveContext)?;
    let root_handle = resolver
        .prepare_symbol_at(&selection.file, selection.position)
        .await
        .map_err(|e| ContextCopyError::ResolverFailed {
            operation: "prepare_symbol_at".to_string(),
            reason: format!("{e:#}"),
        })?
        .ok_or_else(|| ContextCopyError::RootResolutionFailed {
            location: format!(
                "{}:{}:{}",
                selection.file.display(),
                selection.position.line + 1,
                selection.position.column + 1
            ),
        })?;

    tracing::debug!("Building tree from {} at {}", root_handle.name, root_handle.location);

    let mut tree = CheckboxTree::new();
    let mut visited: HashSet<IdentityKey> = HashSet::new();
    let mut warnings = Vec::new();

    visited.insert(root_handle.identity_key());
    let root = tree.create(&root_handle.name, root_handle.location.clone(), root_handle.kind, None);
    let mut stack = vec![expand(&tree, root, &root_handle, resolver, membership, &mut warnings).await];

    while let Some(frame) = stack.last_mut() {
        let Some(next) = frame.pending.pop_front() else {
            stack.pop();
            continue;
        };
        let parent = frame.node;

        if !visited.insert(next.identity_key()) {
            tracing::trace!("Already visited {} at {}", next.name, next.location);
            tree.create(
                format!("{}{CYCLE_MARKER_SUFFIX}", next.name),
                next.location,
                NodeKind::CycleMarker,
                Some(parent),
            );
            continue;
        }

        let child = tree.create(&next.name, next.location.clone(), next.kind, Some(parent));
        let frame = expand(&tree, child, &next, resolver, membership, &mut warnings).await;
        stack.push(frame);
    }

    tracing::debug!("Built tree with {} nodes ({} warnings)", tree.len(), warnings.len());
    Ok(BuildOutcome {
        tree,
        root,
        warnings,
    })
}

/// Fetch the outgoing references of `handle` that stay inside the workspace.
async fn expand<R, M>(
    tree: &CheckboxTree,
    node: NodeRef,
    handle: &Handle,
    resolver: &R,
    membership: &M,
    warnings: &mut Vec<Warning>,
) -> Frame
where
    R: ReferenceResolver,
    M: Membership + ?Sized,
{
    let pending = match resolver.outgoing_references(handle).await {
        Ok(references) => references
            .into_iter()
            .filter(|reference| {
                let inside = membership.is_under_workspace_root(reference.location.path());
                if !inside {
                    tracing::trace!("Skipping external reference {}", reference.location);
                }
                inside
            })
            .collect(),
        Err(e) => {
            warnings.push(
                Warning::SubtreeExpansionFailed {
                    node: tree.node(node).id().to_string(),
                    reason: format!("{e:#}"),
                }
                .logged(),
            );
            VecDeque::new()
        }
    };
    Frame {
        node,
        pending,
    }
}
