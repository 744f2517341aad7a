//! File-import resolver backed by an external parser process.
//!
//! Each file's text is piped to the parser, which answers with a JSON object
//! mapping every import alias to either a resolved path or a message saying
//! why it could not be resolved:
//!
//! ```json
//! {
//!     "os": "/usr/lib/python3.12/os.py",
//!     "pkg.util": "/work/project/pkg/util.py",
//!     "missing": "Module 'missing' not found"
//! }
//! ```
//!
//! Values starting with one of the unresolved markers are skipped. Relative
//! values resolve against the workspace root, and paths that do not exist are
//! dropped. Workspace membership is left to the builder.

use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};

use super::{Handle, ImportCommand, ReferenceResolver};
use crate::core::{ContextCopyError, Location, Position};
use crate::tree::NodeKind;

/// Value prefixes the parser uses for imports it could not resolve.
pub const DEFAULT_UNRESOLVED_MARKERS: &[&str] = &["Module", "could not be resolved", "not found"];

/// Files that stand in for a package directory, in lookup order.
pub const DEFAULT_PACKAGE_ENTRY_FILES: &[&str] = &["__init__.py", "index.py"];

pub struct ImportResolver {
    command: ImportCommand,
    workspace_root: PathBuf,
    unresolved_markers: Vec<String>,
    package_entry_files: Vec<String>,
}

impl ImportResolver {
    pub fn new(command: ImportCommand, workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            command,
            workspace_root: workspace_root.into(),
            unresolved_markers: DEFAULT_UNRESOLVED_MARKERS.iter().map(|m| (*m).to_string()).collect(),
            package_entry_files: DEFAULT_PACKAGE_ENTRY_FILES
                .iter()
                .map(|f| (*f).to_string())
                .collect(),
        }
    }

    #[must_use]
    pub fn with_unresolved_markers(mut self, markers: Vec<String>) -> Self {
        self.unresolved_markers = markers;
        self
    }

    #[must_use]
    pub fn with_package_entry_files(mut self, files: Vec<String>) -> Self {
        self.package_entry_files = files;
        self
    }

    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() { path.to_path_buf() } else { self.workspace_root.join(path) }
    }

    /// Handle for an existing file or directory, `None` if nothing is there.
    async fn handle_for(&self, path: PathBuf) -> Result<Option<Handle>> {
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to inspect {}", path.display()));
            }
        };
        let kind = if metadata.is_dir() { NodeKind::Directory } else { NodeKind::File };
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());
        Ok(Some(Handle::new(name, Location::file_start(path), kind)))
    }

    async fn package_entry(&self, dir: &Path) -> Result<Vec<Handle>> {
        for entry in &self.package_entry_files {
            if let Some(handle) = self.handle_for(dir.join(entry)).await?
                && handle.kind == NodeKind::File
            {
                return Ok(vec![handle]);
            }
        }
        tracing::debug!("Package {} has no entry file", dir.display());
        Ok(Vec::new())
    }

    async fn file_imports(&self, file: &Path) -> Result<Vec<Handle>> {
        let text = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;

        let stdout = self
            .command
            .clone()
            .arg("--file")
            .arg(file.display().to_string())
            .execute(&text)
            .await
            .with_context(|| format!("Failed to parse imports of {}", file.display()))?;

        let mut handles = Vec::new();
        for (alias, value) in parse_import_map(&stdout)? {
            if is_unresolved(&value, &self.unresolved_markers) {
                tracing::debug!("Skipping unresolved import {} -> {}", alias, value);
                continue;
            }
            let target = self.absolute(Path::new(&value));
            match self.handle_for(target).await? {
                Some(handle) => {
                    tracing::debug!("Import {} -> {}", alias, handle.location.file.display());
                    handles.push(handle);
                }
                None => tracing::debug!("Import {} -> {} does not exist", alias, value),
            }
        }
        Ok(handles)
    }
}

/// Parse the parser's stdout into `(alias, value)` pairs in document order.
///
/// Non-string values are dropped.
pub fn parse_import_map(json: &str) -> Result<Vec<(String, String)>> {
    let value: serde_json::Value =
        serde_json::from_str(json.trim())
            .map_err(ContextCopyError::from)
            .context("Import parser output is not valid JSON")?;
    let map = value.as_object().ok_or_else(|| anyhow!("Import parser output is not a JSON object"))?;
    Ok(map
        .iter()
        .filter_map(|(alias, value)| value.as_str().map(|v| (alias.clone(), v.to_string())))
        .collect())
}

/// True when `value` starts with one of `markers`.
#[must_use]
pub fn is_unresolved(value: &str, markers: &[String]) -> bool {
    markers.iter().any(|marker| value.starts_with(marker.as_str()))
}

impl ReferenceResolver for ImportResolver {
    async fn prepare_symbol_at(&self, file: &Path, _position: Position) -> Result<Option<Handle>> {
        self.handle_for(self.absolute(file)).await
    }

    async fn outgoing_references(&self, handle: &Handle) -> Result<Vec<Handle>> {
        let path = handle.location.path();
        match handle.kind {
            NodeKind::Directory => self.package_entry(path).await,
            NodeKind::File => self.file_imports(path).await,
            NodeKind::Symbol | NodeKind::CycleMarker => Ok(Vec::new()),
        }
    }
}
