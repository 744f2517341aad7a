//! `ctxcopy symbols`: copy a call tree from a workspace snapshot.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::common::{TreeArgs, built_root, print_outcome};
use crate::builder::Selection;
use crate::core::Position;
use crate::provider::TreeProvider;
use crate::resolver::SnapshotResolver;

#[derive(Args, Debug)]
pub struct SymbolsCommand {
    /// Workspace snapshot (JSON) to resolve symbols against.
    #[arg(long, value_name = "JSON")]
    pub snapshot: PathBuf,

    /// File holding the starting symbol, relative to the snapshot root.
    #[arg(long)]
    pub file: PathBuf,

    /// Line of the starting symbol (1-based).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub line: u32,

    /// Column of the starting symbol (1-based).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub column: u32,

    /// Print the import statements that bring in the copied symbols instead of their code.
    #[arg(long, conflicts_with = "tree")]
    pub imports: bool,

    #[command(flatten)]
    pub tree: TreeArgs,
}

impl SymbolsCommand {
    /// Workspace membership comes from the snapshot root, not from the
    /// configured `workspace_roots`.
    pub async fn execute(self) -> Result<()> {
        let resolver = SnapshotResolver::load(&self.snapshot).await?;
        let workspace = resolver.workspace();
        let selection = Selection::new(&self.file, Position::new(self.line - 1, self.column - 1));

        let mut provider = TreeProvider::new();
        provider.build(Some(&selection), &resolver, &workspace).await?;
        let root = built_root(&provider)?;
        self.tree.apply(&mut provider)?;

        if self.tree.tree {
            print!("{}", provider.render(root, &self.tree.render_options()));
        } else if self.imports {
            print_outcome(&provider.relevant_imports(root, &resolver).await);
        } else {
            print_outcome(&provider.copy_info(root, &resolver).await);
        }
        Ok(())
    }
}
