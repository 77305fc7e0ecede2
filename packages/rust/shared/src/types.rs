//! Core domain types for mdindex.

use serde::{Deserialize, Serialize};

/// Deepest heading level Markdown recognizes.
pub const MAX_HEADING_LEVEL: u8 = 6;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// An immutable, 1-indexed sequence of source lines.
///
/// Slot `i` of [`Document::lines`] is physical line `i + 1`. Line terminators
/// (`\n` and `\r\n`) are stripped on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Split a full text buffer into lines.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Build a document from already-split lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// All lines, 0-indexed.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line by 0-based slot.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    /// Line by 1-based physical number.
    pub fn line(&self, number: usize) -> Option<&str> {
        number.checked_sub(1).and_then(|idx| self.get(idx))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SectionEntry
// ---------------------------------------------------------------------------

/// A single accepted title in the index file.
///
/// Field order matches the on-disk record: `addr`, `title`, `line`, `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEntry {
    /// Hierarchical numeric address (e.g. `2.3` or `1.2.1`).
    pub addr: String,
    /// Clean, trimmed title text.
    pub title: String,
    /// 1-based line the title was read from.
    pub line: usize,
    /// Heading level, 1 through 6.
    pub level: u8,
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Category of a verification discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    /// The title could not be found near its recorded line.
    Correctness,
    /// The section no longer carries enough prose.
    Coherence,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Correctness => f.write_str("Correctness"),
            Self::Coherence => f.write_str("Coherence"),
        }
    }
}

/// One discrepancy between an index entry and the current document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationIssue {
    /// Address of the offending entry.
    pub addr: String,
    pub kind: IssueKind,
    /// Human-readable description with search bounds or counts.
    pub message: String,
    /// The entry as it appears in the index.
    pub entry: SectionEntry,
}

impl std::fmt::Display for VerificationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} issue: {}", self.addr, self.kind, self.message)
    }
}
