//! Test fixtures for workspaces
//!
//! [`SnapshotFixture`] builds a [`WorkspaceSnapshot`] for the symbol tree,
//! [`ImportFixture`] lays out files on disk together with a shell script
//! that plays the import parser.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::core::{Position, Range};
use crate::resolver::snapshot::{SnapshotFile, SnapshotSymbol};
use crate::resolver::{ImportCommand, ImportResolver, SnapshotResolver, SymbolKind, WorkspaceSnapshot};

/// Symbol spanning `(line, column)` to `(line, column)`, zero-based, end column exclusive.
pub fn symbol(
    name: &str,
    kind: SymbolKind,
    start: (u32, u32),
    end: (u32, u32),
    calls: &[&str],
) -> SnapshotSymbol {
    SnapshotSymbol {
        name: name.to_string(),
        kind,
        range: Range::new(Position::new(start.0, start.1), Position::new(end.0, end.1)),
        children: Vec::new(),
        calls: calls.iter().map(|c| (*c).to_string()).collect(),
    }
}

/// Builder for workspace snapshots.
#[derive(Clone, Debug, Default)]
pub struct SnapshotFixture {
    pub snapshot: WorkspaceSnapshot,
}

impl SnapshotFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with its text and top-level symbols.
    pub fn file(mut self, path: &str, text: &str, symbols: Vec<SnapshotSymbol>) -> Self {
        self.snapshot.files.push(SnapshotFile {
            path: PathBuf::from(path),
            text: text.to_string(),
            symbols,
        });
        self
    }

    /// `a.ts` with class `Foo` whose method `bar` (lines 2-4) calls `baz` (lines 6-8).
    pub fn foo_class() -> Self {
        let text = "class Foo {\n  bar() {\n    return this.baz();\n  }\n\n  baz() {\n    return 2;\n  }\n}\n";
        let mut foo = symbol("Foo", SymbolKind::Class, (0, 0), (8, 1), &[]);
        foo.children = vec![
            symbol("bar", SymbolKind::Method, (1, 2), (3, 3), &["#Foo.baz"]),
            symbol("baz", SymbolKind::Method, (5, 2), (7, 3), &[]),
        ];
        Self::new().file("a.ts", text, vec![foo])
    }

    /// `cycle.ts` with functions `a` and `b` calling each other.
    pub fn mutual_recursion() -> Self {
        let text = "function a() {\n  b();\n}\nfunction b() {\n  a();\n}\n";
        Self::new().file(
            "cycle.ts",
            text,
            vec![
                symbol("a", SymbolKind::Function, (0, 0), (2, 1), &["#b"]),
                symbol("b", SymbolKind::Function, (3, 0), (5, 1), &["#a"]),
            ],
        )
    }

    /// Index the snapshot in memory with `root` as workspace root.
    pub fn into_resolver(mut self, root: impl Into<PathBuf>) -> Result<SnapshotResolver> {
        self.snapshot.root = Some(root.into());
        SnapshotResolver::new(self.snapshot)
    }

    /// Write `snapshot.json` into `dir` with a root relative to it.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let mut snapshot = self.snapshot.clone();
        snapshot.root = Some(PathBuf::from("."));
        let path = dir.join("snapshot.json");
        fs::write(&path, serde_json::to_string_pretty(&snapshot)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Files on disk plus the import map the fake parser reports for each.
#[derive(Clone, Debug, Default)]
pub struct ImportFixture {
    files: Vec<(String, String)>,
    imports: Vec<(String, Vec<(String, String)>)>,
}

/// A built [`ImportFixture`]. The directory lives as long as this value.
pub struct ImportWorkspace {
    _dir: TempDir,
    pub root: PathBuf,
    pub script: PathBuf,
}

impl ImportFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, rel: &str, content: &str) -> Self {
        self.files.push((rel.to_string(), content.to_string()));
        self
    }

    /// What the parser prints for `rel`, in order.
    pub fn imports(mut self, rel: &str, map: &[(&str, &str)]) -> Self {
        self.imports.push((
            rel.to_string(),
            map.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect(),
        ));
        self
    }

    pub fn build(self) -> Result<ImportWorkspace> {
        let dir = TempDir::new()?;
        let root = dir.path().canonicalize()?;
        for (rel, content) in &self.files {
            let path = root.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)?;
        }

        let mut script = String::from(
            "#!/bin/sh\ncat >/dev/null\nfile=\nwhile [ $# -gt 0 ]; do\n  [ \"$1\" = --file ] && file=\"$2\"\n  shift\ndone\ncase \"$file\" in\n",
        );
        for (rel, map) in &self.imports {
            let mut object = serde_json::Map::new();
            for (key, value) in map {
                object.insert(key.clone(), serde_json::Value::String(value.clone()));
            }
            let json = serde_json::Value::Object(object).to_string().replace('\'', "'\\''");
            script.push_str(&format!("  '{}') printf '%s' '{json}' ;;\n", root.join(rel).display()));
        }
        script.push_str("  *) printf '{}' ;;\nesac\n");

        let script_path = dir.path().join("fake_parser.sh");
        fs::write(&script_path, script)?;
        Ok(ImportWorkspace {
            _dir: dir,
            root,
            script: script_path,
        })
    }
}

impl ImportWorkspace {
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Resolver that runs the fake parser through `sh`.
    pub fn resolver(&self) -> ImportResolver {
        let command = ImportCommand::new("sh").arg(self.script.display().to_string());
        ImportResolver::new(command, &self.root)
    }
}
