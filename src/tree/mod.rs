//! Checkbox tree model.
//!
//! A [`CheckboxTree`] is an arena of [`Node`]s. Children are owned through the
//! arena and listed in order on their parent; the parent link is a plain
//! [`NodeRef`] index, so there is no ownership cycle between the two
//! directions. The same model backs the call tree (symbol nodes) and the
//! file-import tree (file nodes).
//!
//! # Checked state
//!
//! Every node starts checked. The stored flags are only changed by the
//! explicit operations below:
//!
//! - [`CheckboxTree::toggle_checked`] flips a node and overwrites its whole
//!   subtree with the new state.
//! - [`CheckboxTree::toggle_children`] leaves the node alone and flips its
//!   children as a block: all checked → all unchecked, otherwise all checked.
//! - [`CheckboxTree::set_checked_recursively`] forces a state onto a subtree.
//!
//! Unchecking a node does not touch flags further down unless one of these
//! operations says so. [`CheckboxTree::collect_checked`] still never descends
//! through an unchecked node, which is what makes "ancestor unchecked ⇒
//! descendant excluded" hold for the effective selection.
//!
//! # Examples
//!
//! ```rust
//! use context_copy::core::Location;
//! use context_copy::tree::{CheckboxTree, NodeKind};
//!
//! let mut tree = CheckboxTree::new();
//! let main = tree.create("main", Location::file_start("a.ts"), NodeKind::Symbol, None);
//! let helper = tree.create("helper", Location::file_start("a.ts"), NodeKind::Symbol, Some(main));
//!
//! assert_eq!(tree.node(helper).id(), "main/helper");
//!
//! tree.toggle_checked(main);
//! assert!(!tree.node(helper).is_checked());
//! assert!(tree.collect_checked(main).is_empty());
//! ```

pub mod render;

pub use render::{RenderOptions, render_tree};

use crate::core::Location;
use std::collections::HashMap;
use std::fmt;

/// Index of a node inside its [`CheckboxTree`].
///
/// A `NodeRef` is only meaningful for the tree that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeRef(usize);

impl NodeRef {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A code symbol (function, method, class ...).
    Symbol,
    /// A source file.
    File,
    /// A package directory; its content lives in its entry-file child.
    Directory,
    /// A revisit of something already expanded elsewhere in the tree.
    CycleMarker,
}

impl NodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::File => "file",
            Self::Directory => "directory",
            Self::CycleMarker => "cycle-marker",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a view should present a node. Derived from the children, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    Expanded,
    Leaf,
}

#[derive(Debug, Clone)]
pub struct Node {
    id: String,
    label: String,
    location: Location,
    kind: NodeKind,
    is_checked: bool,
    parent: Option<NodeRef>,
    children: Vec<NodeRef>,
}

impl Node {
    /// Path-like id: the parent's id, `/`, then this node's label.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    #[must_use]
    pub const fn is_checked(&self) -> bool {
        self.is_checked
    }

    #[must_use]
    pub const fn parent(&self) -> Option<NodeRef> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[must_use]
    pub fn expansion(&self) -> Expansion {
        if self.is_leaf() { Expansion::Leaf } else { Expansion::Expanded }
    }
}

/// Arena of checkbox nodes produced by one build.
#[derive(Debug, Clone, Default)]
pub struct CheckboxTree {
    nodes: Vec<Node>,
    by_id: HashMap<String, NodeRef>,
    roots: Vec<NodeRef>,
}

impl CheckboxTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a checked node and attach it as the last child of `parent`, or
    /// as a new root when `parent` is `None`.
    ///
    /// The id is `parent.id + "/" + label`. Ids stay unique within the tree:
    /// when a sibling already took the derived id, the label segment gets a
    /// `~2`, `~3` ... suffix.
    pub fn create(
        &mut self,
        label: impl Into<String>,
        location: Location,
        kind: NodeKind,
        parent: Option<NodeRef>,
    ) -> NodeRef {
        let label = label.into();
        let base = match parent {
            Some(p) => format!("{}/{}", self.nodes[p.0].id, label),
            None => label.clone(),
        };
        let mut id = base.clone();
        let mut n = 2;
        while self.by_id.contains_key(&id) {
            id = format!("{base}~{n}");
            n += 1;
        }

        let node_ref = NodeRef(self.nodes.len());
        self.nodes.push(Node {
            id: id.clone(),
            label,
            location,
            kind,
            is_checked: true,
            parent,
            children: Vec::new(),
        });
        self.by_id.insert(id, node_ref);

        match parent {
            Some(p) => self.nodes[p.0].children.push(node_ref),
            None => self.roots.push(node_ref),
        }
        node_ref
    }

    /// Borrow a node.
    ///
    /// # Panics
    ///
    /// Panics if `node` was not created by this tree.
    #[must_use]
    pub fn node(&self, node: NodeRef) -> &Node {
        &self.nodes[node.0]
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<NodeRef> {
        self.by_id.get(id).copied()
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeRef] {
        &self.roots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Flip `node` and overwrite its entire subtree with the new state.
    pub fn toggle_checked(&mut self, node: NodeRef) {
        let state = !self.nodes[node.0].is_checked;
        self.set_checked_recursively(node, state);
    }

    /// Set `node` and every descendant to `state`, unconditionally.
    pub fn set_checked_recursively(&mut self, node: NodeRef, state: bool) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let entry = &mut self.nodes[current.0];
            entry.is_checked = state;
            stack.extend(entry.children.iter().copied());
        }
    }

    /// Flip the direct children of `node` as a block, leaving `node` itself alone.
    ///
    /// If every child is checked they are all unchecked, otherwise they are
    /// all checked; the new state is pushed through each child's subtree. A
    /// childless node counts as "all children checked" and nothing changes.
    pub fn toggle_children(&mut self, node: NodeRef) {
        let children = self.nodes[node.0].children.clone();
        let all_checked = children.iter().all(|c| self.nodes[c.0].is_checked);
        for child in children {
            self.set_checked_recursively(child, !all_checked);
        }
    }

    /// Pre-order list of nodes reachable from `node` through checked nodes only.
    ///
    /// An unchecked node is excluded together with its whole subtree, whatever
    /// the flags below it say.
    #[must_use]
    pub fn collect_checked(&self, node: NodeRef) -> Vec<NodeRef> {
        let mut collected = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let entry = &self.nodes[current.0];
            if !entry.is_checked {
                continue;
            }
            collected.push(current);
            stack.extend(entry.children.iter().rev().copied());
        }
        collected
    }

    /// Pre-order list of `node` and all its descendants, checked or not.
    #[must_use]
    pub fn descendants(&self, node: NodeRef) -> Vec<NodeRef> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }
        out
    }
}
