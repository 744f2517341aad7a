//! Text rendering of a checkbox tree.
//!
//! Produces the familiar `cargo tree` layout:
//!
//! ```text
//! [x] main
//! ├── [x] parse
//! │   └── [ ] tokenize
//! └── [x] main (already visited)
//! ```
//!
//! Checkbox glyphs are computed from each node's stored flag at render time;
//! nothing about the presentation is kept on the node.

use super::{CheckboxTree, NodeRef};

/// Controls what [`render_tree`] prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix each label with `[x]` or `[ ]`.
    pub glyphs: bool,
    /// Print unchecked subtrees too. When false they are pruned like
    /// [`CheckboxTree::collect_checked`] prunes them.
    pub include_unchecked: bool,
    /// Append the node id in parentheses.
    pub show_ids: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            glyphs: false,
            include_unchecked: true,
            show_ids: false,
        }
    }
}

/// Glyph for a checked flag.
#[must_use]
pub const fn checkbox_glyph(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

/// Render the subtree rooted at `root`, one node per line.
///
/// Returns an empty string when `root` is unchecked and unchecked nodes are
/// excluded.
#[must_use]
pub fn render_tree(tree: &CheckboxTree, root: NodeRef, options: &RenderOptions) -> String {
    let mut out = String::new();
    if !options.include_unchecked && !tree.node(root).is_checked() {
        return out;
    }

    out.push_str(&line_for(tree, root, options));
    out.push('\n');

    // (node, prefix for its own line, is last among siblings)
    let mut stack: Vec<(NodeRef, String, bool)> = Vec::new();
    push_children(tree, root, String::new(), options, &mut stack);

    while let Some((node, prefix, is_last)) = stack.pop() {
        let connector = if is_last { "└── " } else { "├── " };
        out.push_str(&prefix);
        out.push_str(connector);
        out.push_str(&line_for(tree, node, options));
        out.push('\n');

        let child_prefix = if is_last { format!("{prefix}    ") } else { format!("{prefix}│   ") };
        push_children(tree, node, child_prefix, options, &mut stack);
    }

    out
}

fn push_children(
    tree: &CheckboxTree,
    node: NodeRef,
    prefix: String,
    options: &RenderOptions,
    stack: &mut Vec<(NodeRef, String, bool)>,
) {
    let visible: Vec<NodeRef> = tree
        .node(node)
        .children()
        .iter()
        .copied()
        .filter(|c| options.include_unchecked || tree.node(*c).is_checked())
        .collect();

    // Reverse so the first child is popped first.
    for (i, child) in visible.iter().enumerate().rev() {
        stack.push((*child, prefix.clone(), i == visible.len() - 1));
    }
}

fn line_for(tree: &CheckboxTree, node: NodeRef, options: &RenderOptions) -> String {
    let entry = tree.node(node);
    let mut line = String::new();
    if options.glyphs {
        line.push_str(checkbox_glyph(entry.is_checked()));
        line.push(' ');
    }
    line.push_str(entry.label());
    if options.show_ids {
        line.push_str(&format!(" ({})", entry.id()));
    }
    line
}
