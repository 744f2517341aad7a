//! Source positions, ranges and locations
//!
//! Every node in a checkbox tree points at a [`Location`]: a file plus a
//! [`Range`] inside it. Lines and columns are zero-based, the way language
//! services report them; conversion to the one-based numbers shown to users
//! happens only when text is serialized.
//!
//! The core treats locations as opaque beyond two questions: do two ranges
//! nest ([`Range::contains`]), and do two locations denote the same symbol
//! ([`Location::identity_key`]).
//!
//! # Examples
//!
//! ```rust
//! use context_copy::core::{Position, Range};
//!
//! let class = Range::new(Position::new(0, 0), Position::new(8, 1));
//! let method = Range::new(Position::new(1, 4), Position::new(3, 5));
//!
//! assert!(class.contains(&method));
//! assert!(!method.contains(&class));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A zero-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based column, counted in characters.
    pub column: u32,
}

impl Position {
    /// Create a position from zero-based coordinates.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self {
            line,
            column,
        }
    }
}

/// A span between two positions. Containment checks treat both ends as inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self {
            start,
            end,
        }
    }

    /// True when `other` lies entirely inside this range (bounds inclusive).
    #[must_use]
    pub fn contains(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True when `position` lies inside this range (bounds inclusive).
    #[must_use]
    pub fn contains_position(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    /// One-based first line, as shown in serialized output.
    #[must_use]
    pub const fn display_start_line(&self) -> u32 {
        self.start.line + 1
    }

    /// One-based last line, as shown in serialized output.
    #[must_use]
    pub const fn display_end_line(&self) -> u32 {
        self.end.line + 1
    }
}

/// A range inside a particular file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: PathBuf,
    pub range: Range,
}

impl Location {
    pub fn new(file: impl Into<PathBuf>, range: Range) -> Self {
        Self {
            file: file.into(),
            range,
        }
    }

    /// Location covering the start of a file. Used for file-level nodes.
    pub fn file_start(file: impl Into<PathBuf>) -> Self {
        Self::new(file, Range::default())
    }

    /// Key used to detect revisits while traversing a reference graph.
    #[must_use]
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            file: self.file.clone(),
            line: self.range.start.line,
            column: self.range.start.column,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file.display(),
            self.range.start.line + 1,
            self.range.start.column + 1
        )
    }
}

/// `(file, startLine, startColumn)`: two handles with equal keys are the
/// same symbol as far as cycle detection is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}
