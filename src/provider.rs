//! Tree provider instances.
//!
//! A [`TreeProvider`] owns the active tree of one view. Presentation layers
//! hold the provider explicitly, subscribe to its [`RefreshEvent`]s, and call
//! the toggle and copy operations on it. A new build replaces the whole tree
//! in one step, and only when the build succeeds.
//!
//! [`NodeRef`]s are only meaningful for the tree that produced them; after a
//! rebuild, look nodes up again by id with [`TreeProvider::find`].

use tokio::sync::broadcast;

use crate::builder::{self, Selection};
use crate::copy::{self, CopyOutcome};
use crate::core::{ContextCopyError, Warning};
use crate::resolver::{Membership, ReferenceResolver, SymbolSource, WorkspaceRoots};
use crate::tree::{CheckboxTree, NodeRef, RenderOptions, render_tree};

/// Buffered refresh events per subscriber before the oldest are dropped.
const REFRESH_CHANNEL_CAPACITY: usize = 64;

/// Something in the view changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshEvent {
    /// The node whose subtree changed, or `None` for the whole tree.
    pub node: Option<NodeRef>,
}

pub struct TreeProvider {
    tree: CheckboxTree,
    events: broadcast::Sender<RefreshEvent>,
}

impl Default for TreeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeProvider {
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(REFRESH_CHANNEL_CAPACITY);
        Self {
            tree: CheckboxTree::new(),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn tree(&self) -> &CheckboxTree {
        &self.tree
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeRef] {
        self.tree.roots()
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<NodeRef> {
        self.tree.find(id)
    }

    /// Replace the active tree and signal a full refresh.
    pub fn set_roots(&mut self, tree: CheckboxTree) {
        self.tree = tree;
        self.refresh(None);
    }

    /// Run the builder and publish its tree.
    ///
    /// On error the previous tree stays active and no event is sent.
    pub async fn build<R, M>(
        &mut self,
        selection: Option<&Selection>,
        resolver: &R,
        membership: &M,
    ) -> Result<Vec<Warning>, ContextCopyError>
    where
        R: ReferenceResolver,
        M: Membership + ?Sized,
    {
        let outcome = builder::build(selection, resolver, membership).await?;
        self.set_roots(outcome.tree);
        Ok(outcome.warnings)
    }

    pub fn toggle_checked(&mut self, node: NodeRef) {
        self.tree.toggle_checked(node);
        self.refresh(Some(node));
    }

    pub fn toggle_children(&mut self, node: NodeRef) {
        self.tree.toggle_children(node);
        self.refresh(Some(node));
    }

    /// [`toggle_checked`](Self::toggle_checked) by node id.
    pub fn toggle_checked_by_id(&mut self, id: &str) -> Result<NodeRef, ContextCopyError> {
        let node = self.require(id)?;
        self.toggle_checked(node);
        Ok(node)
    }

    /// Uncheck the node with `id` and its whole subtree. Unchecking twice
    /// leaves it unchecked.
    pub fn uncheck_by_id(&mut self, id: &str) -> Result<NodeRef, ContextCopyError> {
        let node = self.require(id)?;
        self.tree.set_checked_recursively(node, false);
        self.refresh(Some(node));
        Ok(node)
    }

    /// [`toggle_children`](Self::toggle_children) by node id.
    pub fn toggle_children_by_id(&mut self, id: &str) -> Result<NodeRef, ContextCopyError> {
        let node = self.require(id)?;
        self.toggle_children(node);
        Ok(node)
    }

    /// Notify subscribers. Having no subscribers is fine.
    pub fn refresh(&self, node: Option<NodeRef>) {
        let _ = self.events.send(RefreshEvent {
            node,
        });
    }

    pub async fn copy_info<S>(&self, node: NodeRef, source: &S) -> CopyOutcome
    where
        S: SymbolSource + ?Sized,
    {
        copy::copy_info(&self.tree, node, source).await
    }

    /// Import statements relevant to the checked symbols under `node`.
    pub async fn relevant_imports<S>(&self, node: NodeRef, source: &S) -> CopyOutcome
    where
        S: SymbolSource + ?Sized,
    {
        copy::relevant_imports(&self.tree, node, source).await
    }

    pub async fn copy_file_info(&self, node: NodeRef, workspace: &WorkspaceRoots) -> CopyOutcome {
        copy::copy_file_info(&self.tree, node, workspace).await
    }

    #[must_use]
    pub fn render(&self, node: NodeRef, options: &RenderOptions) -> String {
        render_tree(&self.tree, node, options)
    }

    fn require(&self, id: &str) -> Result<NodeRef, ContextCopyError> {
        self.tree.find(id).ok_or_else(|| ContextCopyError::NodeNotFound {
            id: id.to_string(),
        })
    }
}
