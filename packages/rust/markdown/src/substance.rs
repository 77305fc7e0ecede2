//! Content substantiality: drop titles that do not introduce real prose.

use std::ops::Range;

use tracing::info;

use mdindex_shared::{AddrStyle, Document, IndexerConfig, SectionEntry};

use crate::address::renumber;
use crate::patterns::{is_code_fence, is_effective_content};

/// A title removed by the filter, with the count that sank it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedSection {
    pub entry: SectionEntry,
    pub content_lines: usize,
}

/// Result of one filtering pass.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Survivors, renumbered densely.
    pub kept: Vec<SectionEntry>,
    pub dropped: Vec<DroppedSection>,
}

/// Count effective content lines in `range` (0-based, end exclusive).
///
/// The range is clamped to the document. With `skip_first`, the first line
/// of the range is ignored (it holds the title). Fence delimiters toggle a
/// local code-block flag; fenced lines never count.
pub fn count_effective_lines(doc: &Document, range: Range<usize>, skip_first: bool) -> usize {
    let end = range.end.min(doc.len());
    let start = range.start.min(end);
    let mut in_code_block = false;
    let mut count = 0;

    for (idx, line) in doc.lines()[start..end].iter().enumerate() {
        if skip_first && idx == 0 {
            continue;
        }
        let trimmed = line.trim();
        if is_code_fence(trimmed) {
            in_code_block = !in_code_block;
            continue;
        }
        if !in_code_block && is_effective_content(trimmed) {
            count += 1;
        }
    }

    count
}

/// Segment owned by `entries[i]`: from its own line up to the next entry's
/// line, or to the end of the document. 0-based, end exclusive.
pub fn segment(entries: &[SectionEntry], i: usize, doc_len: usize) -> Range<usize> {
    let start = entries[i].line.saturating_sub(1);
    let end = entries
        .get(i + 1)
        .map_or(doc_len, |next| next.line.saturating_sub(1));
    start..end.max(start)
}

/// Keeps titles whose segment carries at least `min_content_lines` of prose.
#[derive(Debug, Clone)]
pub struct SubstantialityFilter {
    min_content_lines: usize,
    style: AddrStyle,
}

impl SubstantialityFilter {
    pub fn new(min_content_lines: usize, style: AddrStyle) -> Self {
        Self {
            min_content_lines,
            style,
        }
    }

    pub fn from_config(config: &IndexerConfig) -> Self {
        Self::new(config.min_content_lines, config.addr_style)
    }

    /// Filter `entries` (in line order) against `doc` and renumber the survivors.
    pub fn apply(&self, doc: &Document, entries: Vec<SectionEntry>) -> FilterOutcome {
        let counts: Vec<usize> = (0..entries.len())
            .map(|i| count_effective_lines(doc, segment(&entries, i, doc.len()), true))
            .collect();

        let mut outcome = FilterOutcome::default();
        for (entry, content_lines) in entries.into_iter().zip(counts) {
            if content_lines >= self.min_content_lines {
                outcome.kept.push(entry);
            } else {
                info!(
                    title = %entry.title,
                    addr = %entry.addr,
                    line = entry.line,
                    content_lines,
                    "section dropped: insufficient content"
                );
                outcome.dropped.push(DroppedSection {
                    entry,
                    content_lines,
                });
            }
        }

        renumber(&mut outcome.kept, self.style);
        outcome
    }
}
