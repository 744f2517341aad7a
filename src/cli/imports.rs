//! `ctxcopy imports`: copy a file and everything it imports.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use super::common::{TreeArgs, built_root, print_outcome};
use crate::builder::Selection;
use crate::config::Config;
use crate::core::Position;
use crate::provider::TreeProvider;

#[derive(Args, Debug)]
pub struct ImportsCommand {
    /// File to start from.
    pub file: PathBuf,

    /// Workspace root. Defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    #[command(flatten)]
    pub tree: TreeArgs,
}

impl ImportsCommand {
    pub async fn execute(self, config: &Config) -> Result<()> {
        let root = match &self.workspace {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };
        let root = canonical(&root).await;
        let file = canonical(&self.file).await;

        let resolver = config.import_resolver(&root)?;
        let workspace = config.workspace(&root);
        let selection = Selection::new(file, Position::default());

        let mut provider = TreeProvider::new();
        provider.build(Some(&selection), &resolver, &workspace).await?;
        let tree_root = built_root(&provider)?;
        self.tree.apply(&mut provider)?;

        if self.tree.tree {
            print!("{}", provider.render(tree_root, &self.tree.render_options()));
        } else {
            print_outcome(&provider.copy_file_info(tree_root, &workspace).await);
        }
        Ok(())
    }
}

/// Canonical form of `path` so prefix checks line up with the parser's
/// absolute paths. Paths that cannot be resolved are kept as given.
async fn canonical(path: &Path) -> PathBuf {
    tokio::fs::canonicalize(path).await.unwrap_or_else(|_| path.to_path_buf())
}
