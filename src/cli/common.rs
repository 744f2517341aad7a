//! Pieces shared by the tree-building commands.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::copy::CopyOutcome;
use crate::provider::TreeProvider;
use crate::tree::{NodeRef, RenderOptions};

/// Selection edits and output mode, applied after the tree is built.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeArgs {
    /// Uncheck the node with this id and its subtree (repeatable).
    #[arg(long = "uncheck", value_name = "ID")]
    pub uncheck: Vec<String>,

    /// Toggle the direct children of the node with this id (repeatable).
    #[arg(long = "toggle-children", value_name = "ID")]
    pub toggle_children: Vec<String>,

    /// Print the tree instead of the copied text.
    #[arg(long)]
    pub tree: bool,

    /// Show `[x]`/`[ ]` checkboxes when printing the tree.
    #[arg(long, requires = "tree")]
    pub glyphs: bool,
}

impl TreeArgs {
    /// Apply `--uncheck` then `--toggle-children` edits.
    pub fn apply(&self, provider: &mut TreeProvider) -> Result<()> {
        for id in &self.uncheck {
            provider.uncheck_by_id(id)?;
        }
        for id in &self.toggle_children {
            provider.toggle_children_by_id(id)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            glyphs: self.glyphs,
            ..RenderOptions::default()
        }
    }
}

/// The single root of a freshly built provider.
pub fn built_root(provider: &TreeProvider) -> Result<NodeRef> {
    provider.roots().first().copied().ok_or_else(|| anyhow::anyhow!("Build produced no tree"))
}

/// Write the copied text to stdout, or an informational note to stderr.
pub fn print_outcome(outcome: &CopyOutcome) {
    if let Some(text) = outcome.text() {
        println!("{text}");
    } else if let Some(message) = outcome.message() {
        eprintln!("{}", message.yellow());
    }
    let skipped = outcome.warnings().len();
    if skipped > 0 {
        eprintln!("{}", format!("{skipped} item(s) skipped, see warnings above").dimmed());
    }
}
