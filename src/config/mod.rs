//! User configuration for context-copy.
//!
//! Configuration is a small TOML file. Lookup order:
//!
//! 1. an explicit path (the `--config` flag)
//! 2. `$CTXCOPY_CONFIG`
//! 3. `~/.ctxcopy/config.toml` (`%LOCALAPPDATA%\ctxcopy\config.toml` on Windows)
//!
//! An explicit path that does not exist is an error. A missing default file
//! just means defaults.
//!
//! ```toml
//! # Roots whose files count as workspace code. Empty: the current directory.
//! workspace_roots = ["/work/project"]
//!
//! # Interpreter and script for the import parser.
//! python = "/usr/bin/python3"
//! import_script = "scripts/parse_imports.py"
//!
//! # Parser values starting with any of these are unresolved imports.
//! unresolved_markers = ["Module", "could not be resolved", "not found"]
//!
//! # Files that stand in for a package directory, in lookup order.
//! package_entry_files = ["__init__.py", "index.py"]
//! ```
//!
//! `$CTXCOPY_PYTHON` overrides `python`. Without either, `python3` and then
//! `python` are looked up on `PATH`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::ContextCopyError;
use crate::resolver::imports::{DEFAULT_PACKAGE_ENTRY_FILES, DEFAULT_UNRESOLVED_MARKERS};
use crate::resolver::{ImportCommand, ImportResolver, WorkspaceRoots};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "CTXCOPY_CONFIG";

/// Environment variable naming the Python interpreter.
pub const PYTHON_ENV: &str = "CTXCOPY_PYTHON";

/// Parser script location, relative to the workspace root, when none is configured.
pub const DEFAULT_IMPORT_SCRIPT: &str = "scripts/parse_imports.py";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub workspace_roots: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_script: Option<PathBuf>,
    pub unresolved_markers: Vec<String>,
    pub package_entry_files: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_roots: Vec::new(),
            python: None,
            import_script: None,
            unresolved_markers: DEFAULT_UNRESOLVED_MARKERS.iter().map(|m| (*m).to_string()).collect(),
            package_entry_files: DEFAULT_PACKAGE_ENTRY_FILES
                .iter()
                .map(|f| (*f).to_string())
                .collect(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment and default location.
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_with_env(explicit, |key| std::env::var(key).ok()).await
    }

    /// [`load`](Self::load) with a custom environment lookup.
    pub async fn load_with_env<F>(explicit: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match explicit
            .map(Path::to_path_buf)
            .or_else(|| env(CONFIG_ENV).map(PathBuf::from))
        {
            Some(path) => {
                if !path.exists() {
                    return Err(ContextCopyError::ConfigError {
                        message: format!("Config file {} does not exist", path.display()),
                    }
                    .into());
                }
                Self::load_from(&path).await?
            }
            None => match Self::default_path() {
                Ok(path) if path.exists() => Self::load_from(&path).await?,
                Ok(_) => Self::default(),
                Err(e) => {
                    tracing::debug!("No default config location: {e}");
                    Self::default()
                }
            },
        };

        if let Some(python) = env(PYTHON_ENV).filter(|p| !p.is_empty()) {
            config.python = Some(PathBuf::from(python));
        }
        Ok(config)
    }

    /// Parse a configuration file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        toml::from_str(&content)
            .map_err(ContextCopyError::from)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("ctxcopy")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".ctxcopy")
        };
        Ok(config_dir.join("config.toml"))
    }

    /// Configured workspace roots, or `fallback` when none are set.
    #[must_use]
    pub fn workspace(&self, fallback: &Path) -> WorkspaceRoots {
        if self.workspace_roots.is_empty() {
            WorkspaceRoots::single(fallback)
        } else {
            WorkspaceRoots::new(self.workspace_roots.iter().cloned())
        }
    }

    /// Interpreter for the import parser.
    pub fn python_interpreter(&self) -> Result<PathBuf> {
        if let Some(python) = &self.python {
            return Ok(python.clone());
        }
        ["python3", "python"].iter().find_map(|name| which::which(name).ok()).ok_or_else(|| {
            ContextCopyError::ConfigError {
                message: format!(
                    "No Python interpreter found; set `python` in the config file or {PYTHON_ENV}"
                ),
            }
            .into()
        })
    }

    /// Parser script, resolved against `workspace_root` when relative.
    #[must_use]
    pub fn import_script(&self, workspace_root: &Path) -> PathBuf {
        let script = self.import_script.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_IMPORT_SCRIPT));
        if script.is_absolute() { script } else { workspace_root.join(script) }
    }

    /// Import resolver for `workspace_root` using the configured parser.
    pub fn import_resolver(&self, workspace_root: &Path) -> Result<ImportResolver> {
        let script = self.import_script(workspace_root);
        if !script.exists() {
            return Err(ContextCopyError::ConfigError {
                message: format!("Import parser script not found at {}", script.display()),
            }
            .into());
        }
        let python = self.python_interpreter()?;
        tracing::debug!("Import parser: {} {}", python.display(), script.display());

        let command = ImportCommand::python(python.display().to_string(), &script)
            .arg("--root")
            .arg(workspace_root.display().to_string())
            .current_dir(workspace_root);
        Ok(ImportResolver::new(command, workspace_root)
            .with_unresolved_markers(self.unresolved_markers.clone())
            .with_package_entry_files(self.package_entry_files.clone()))
    }
}
