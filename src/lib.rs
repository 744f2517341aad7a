//! context-copy: pasteable context from call trees and import trees
//!
//! Starting from a symbol (or a file), context-copy walks outward along
//! references that stay inside the workspace, presents the result as a
//! checkbox tree, and turns whatever is still checked into one block of text.
//!
//! # Architecture Overview
//!
//! ```text
//! Selection ──► builder ──► CheckboxTree ──► (user toggles) ──► copy ──► text
//!                  ▲                                              ▲
//!          ReferenceResolver                                SymbolSource
//!          (snapshot | imports)                             (snapshot)
//! ```
//!
//! - [`builder`] expands references with an explicit work stack. A symbol
//!   reached again on the same path becomes a leaf cycle marker, so the
//!   tree is always finite.
//! - [`tree`] holds the checkbox model: checking a node checks its whole
//!   subtree; a node's "partial" look is derived, never stored.
//! - [`copy`] groups checked symbols under their enclosing class or
//!   interface so a container header is printed once, then serializes the
//!   groups deterministically. For import trees it concatenates the files.
//! - [`provider`] owns a tree and announces changes on a broadcast channel.
//!
//! # Core Modules
//!
//! - [`core`] - positions and locations, fatal errors, recoverable warnings
//! - [`tree`] - checkbox tree model and text rendering
//! - [`resolver`] - resolver traits plus the snapshot and import backends
//! - [`builder`] - reachability tree construction
//! - [`copy`] - fragment grouping, serialization, file concatenation
//! - [`provider`] - tree ownership and refresh notifications
//! - [`config`] - `~/.ctxcopy/config.toml`
//! - [`cli`] - the `ctxcopy` binary's commands
//!
//! # Example
//!
//! ```rust,no_run
//! use context_copy::builder::Selection;
//! use context_copy::core::Position;
//! use context_copy::provider::TreeProvider;
//! use context_copy::resolver::SnapshotResolver;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let resolver = SnapshotResolver::load("ws.json".as_ref()).await?;
//! let selection = Selection::new("a.ts", Position::new(1, 2));
//!
//! let mut provider = TreeProvider::new();
//! provider.build(Some(&selection), &resolver, &resolver.workspace()).await?;
//! let root = provider.roots()[0];
//! if let Some(text) = provider.copy_info(root, &resolver).await.text() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod cli;
pub mod config;
pub mod copy;
pub mod core;
pub mod provider;
pub mod resolver;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
