//! Command-line interface for context-copy.
//!
//! ```text
//! ctxcopy symbols --snapshot ws.json --file src/a.ts --line 2 --column 5
//! ctxcopy imports app/main.py --workspace .
//! ```
//!
//! Both commands build a tree from the starting point, apply any
//! `--uncheck`/`--toggle-children` edits, and print either the copied text
//! (stdout) or the tree itself (`--tree`). `symbols --imports` prints the
//! import statements of the copied symbols instead. An empty selection is
//! not an error: a note goes to stderr and the exit code stays 0.

mod common;
mod imports;
mod symbols;

pub use common::TreeArgs;
pub use imports::ImportsCommand;
pub use symbols::SymbolsCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Settings derived from the global flags, separate from parsing so tests
/// can inject them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter override. `None` defers to `RUST_LOG`, falling back to `warn`.
    pub log_level: Option<String>,
    /// Explicit configuration file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Filter for the stderr log subscriber.
    #[must_use]
    pub fn log_filter(&self) -> EnvFilter {
        match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "ctxcopy",
    about = "Copy a symbol's call tree or a file's imports as pasteable context",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to an alternate configuration file.
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy the call tree under a symbol from a workspace snapshot.
    Symbols(SymbolsCommand),

    /// Copy a file together with the workspace files it imports.
    Imports(ImportsCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };
        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    pub async fn execute_with_config(self, cli_config: CliConfig) -> Result<()> {
        let config = Config::load(cli_config.config_path.as_deref()).await?;
        match self.command {
            Commands::Symbols(cmd) => cmd.execute().await,
            Commands::Imports(cmd) => cmd.execute(&config).await,
        }
    }
}
