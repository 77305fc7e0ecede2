//! Single-pass line classification with code-fence tracking.

use mdindex_shared::Document;

use crate::patterns::{heading_marker, is_code_fence};

/// What a single source line is, structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent<'a> {
    /// A fence delimiter; toggles code-block state.
    CodeFence,
    /// A heading marker, with its trimmed text or `None` for a bare `#` run.
    Heading { level: u8, text: Option<&'a str> },
    /// Anything else, including every line inside a code fence.
    Plain(&'a str),
}

/// A classified line, borrowing from the [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    /// 0-based slot in the document.
    pub idx: usize,
    /// The untouched source line.
    pub raw: &'a str,
    pub event: LineEvent<'a>,
}

impl ClassifiedLine<'_> {
    /// 1-based physical line number.
    pub fn number(&self) -> usize {
        self.idx + 1
    }

    pub fn is_heading(&self) -> bool {
        matches!(self.event, LineEvent::Heading { .. })
    }
}

/// Classify every line of the document, in order, one event per line.
pub fn classify(doc: &Document) -> Vec<ClassifiedLine<'_>> {
    let mut in_code_block = false;

    doc.lines()
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            let raw = raw.as_str();
            let event = if is_code_fence(raw.trim()) {
                in_code_block = !in_code_block;
                LineEvent::CodeFence
            } else if in_code_block {
                LineEvent::Plain(raw)
            } else {
                match parse_heading(raw) {
                    Some((level, text)) => LineEvent::Heading { level, text },
                    None => LineEvent::Plain(raw),
                }
            };
            ClassifiedLine { idx, raw, event }
        })
        .collect()
}

/// Parse a heading marker out of a raw line.
///
/// Returns the level and the trimmed text (`None` when the `#` run stands
/// alone). Runs longer than six, and runs glued to text (`#tag`), are not
/// headings.
pub fn parse_heading(line: &str) -> Option<(u8, Option<&str>)> {
    heading_marker(line.trim())
}
