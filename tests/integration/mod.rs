//! Integration test suite for context-copy
//!
//! End-to-end runs: tree building against real resolvers, the copy paths,
//! and the `ctxcopy` binary.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **symbol_copy**: call trees from workspace snapshots through to copied text
//! - **import_copy**: import trees over files on disk (Unix, uses `sh`)
//! - **cli**: the `ctxcopy` binary

#[path = "../common/mod.rs"]
mod common;

mod cli;
#[cfg(unix)]
mod import_copy;
mod symbol_copy;
