//! Builder for the external import-parser process.
//!
//! The import resolver does not understand any language itself. It pipes a
//! file's text to a parser program on stdin and reads a JSON object mapping
//! each import alias to a resolved path from stdout.
//!
//! ```rust,ignore
//! use context_copy::resolver::ImportCommand;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let stdout = ImportCommand::python("python3", "scripts/parse_imports.py")
//!     .arg("--root")
//!     .arg("/path/to/workspace")
//!     .current_dir("/path/to/workspace")
//!     .execute("import os\nfrom pkg import util\n")
//!     .await?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::core::ContextCopyError;

/// Program plus arguments, run once per file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    env_vars: Vec<(String, String)>,
}

impl ImportCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
        }
    }

    /// `python script`, the usual shape of the parser command.
    pub fn python(interpreter: impl Into<String>, script: impl AsRef<Path>) -> Self {
        Self::new(interpreter).arg(script.as_ref().display().to_string())
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Command line for log messages.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the command with `stdin` as its standard input and return stdout.
    ///
    /// A non-zero exit becomes [`ContextCopyError::ImportCommandFailed`]
    /// carrying the captured stderr.
    pub async fn execute(&self, stdin: &str) -> Result<String> {
        let start = std::time::Instant::now();
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env_vars {
            tracing::trace!(target: "imports", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }

        tracing::debug!(target: "imports", "Executing command: {}", self.display());

        let mut child =
            cmd.spawn().with_context(|| format!("Failed to execute {}", self.display()))?;

        // Feed stdin while stdout and stderr drain, so a parser that answers
        // before reading all of its input cannot fill a pipe and stall.
        let pipe = child.stdin.take();
        let feed = async move {
            let Some(mut pipe) = pipe else {
                return Ok(());
            };
            match pipe.write_all(stdin.as_bytes()).await {
                // The parser may exit without draining stdin; that is judged
                // by the exit status instead.
                Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            }
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        let output = output.with_context(|| format!("Failed to wait for {}", self.display()))?;
        fed.with_context(|| format!("Failed to write to {}", self.program))?;

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if !output.status.success() {
            tracing::debug!(
                target: "imports",
                "Command failed with exit code: {:?}",
                output.status.code()
            );
            return Err(ContextCopyError::ImportCommandFailed {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            }
            .into());
        }
        if !stderr.is_empty() {
            tracing::debug!(target: "imports", "{}", stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_millis() > 100 {
            tracing::debug!(target: "imports::perf", "{} took {}ms", self.program, elapsed.as_millis());
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
