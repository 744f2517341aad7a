//! Shared helpers for the context-copy test targets.

// Not every helper is used by every test file.
#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use context_copy::test_utils::SnapshotFixture;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary workspace with an isolated (empty) configuration file.
pub struct TestWorkspace {
    _temp: TempDir,
    root: PathBuf,
    config: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        let temp = TempDir::new()?;
        let root = temp.path().canonicalize()?;
        let config = root.join("ctxcopy.toml");
        fs::write(&config, "")?;
        Ok(Self {
            _temp: temp,
            root,
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn write_config(&self, content: &str) -> Result<()> {
        fs::write(&self.config, content)?;
        Ok(())
    }

    pub fn write_file(&self, rel: &str, content: &str) -> Result<PathBuf> {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn write_snapshot(&self, fixture: &SnapshotFixture) -> Result<PathBuf> {
        fixture.write(&self.root)
    }

    /// `ctxcopy` running inside the workspace with its own config file.
    pub fn ctxcopy(&self) -> Command {
        let mut cmd = Command::cargo_bin("ctxcopy").expect("ctxcopy binary");
        cmd.current_dir(&self.root)
            .env("CTXCOPY_CONFIG", &self.config)
            .env_remove("CTXCOPY_PYTHON")
            .env_remove("RUST_LOG");
        cmd
    }
}
