//! Heading → title resolution.
//!
//! Inline headings are screened by a pluggable set of [`AcceptanceRule`]s.
//! Empty headings (`#` alone) borrow their title from the first prose line
//! that follows them.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use mdindex_shared::{HeadingPolicy, IndexerConfig};

use crate::classify::{ClassifiedLine, LineEvent};
use crate::patterns::is_continuation_filler;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// An inline heading under consideration.
#[derive(Debug, Clone, Copy)]
pub struct HeadingCandidate<'a> {
    pub level: u8,
    /// Trimmed text after the `#` run.
    pub text: &'a str,
    /// The untouched source line.
    pub raw: &'a str,
    /// 1-based line number.
    pub line: usize,
    /// The source line immediately above, if any.
    pub previous: Option<&'a str>,
}

/// An accepted `(level, title, line)` triple, not yet addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTitle {
    pub level: u8,
    pub title: String,
    /// 1-based line the title text was read from.
    pub line: usize,
}

/// A predicate that can veto an inline heading.
pub trait AcceptanceRule: std::fmt::Debug + Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// `true` when the candidate should not become a title.
    fn rejects(&self, candidate: &HeadingCandidate<'_>) -> bool;
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Real titles sit after a blank line or directly under another heading.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphBoundary;

impl AcceptanceRule for ParagraphBoundary {
    fn name(&self) -> &'static str {
        "paragraph-boundary"
    }

    fn rejects(&self, candidate: &HeadingCandidate<'_>) -> bool {
        candidate.previous.is_some_and(|prev| {
            let prev = prev.trim();
            !prev.is_empty() && !prev.starts_with('#')
        })
    }
}

/// Assignments, comparisons, calls, indexing, imports and attribute access.
static CODE_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
          \s=\s
        | ==
        | \(.*\)
        | \[.*\]
        | ^(?:assert|import|from)\s
        | self\.
        | \.(?:query|scalars)
        ",
    )
    .expect("code shape regex")
});

/// Heading text that reads like a commented-out line of source code.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeShape;

impl AcceptanceRule for CodeShape {
    fn name(&self) -> &'static str {
        "code-shape"
    }

    fn rejects(&self, candidate: &HeadingCandidate<'_>) -> bool {
        CODE_SHAPE_RE.is_match(candidate.text)
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Turns classified headings into accepted titles.
#[derive(Debug)]
pub struct TitleResolver {
    rules: Vec<Box<dyn AcceptanceRule>>,
    /// Confirmed-title glyph; bypasses the rules and is cut from the title.
    anchor: Option<char>,
    min_title_chars: usize,
}

impl TitleResolver {
    /// No rules: any non-empty heading text is a title.
    pub fn standard() -> Self {
        Self {
            rules: Vec::new(),
            anchor: None,
            min_title_chars: 1,
        }
    }

    /// Anti-code-comment screening with an anchor escape hatch.
    pub fn strict(anchor: char, min_title_chars: usize) -> Self {
        Self {
            rules: vec![Box::new(ParagraphBoundary), Box::new(CodeShape)],
            anchor: Some(anchor),
            min_title_chars: min_title_chars.max(1),
        }
    }

    pub fn from_config(config: &IndexerConfig) -> Self {
        match config.policy {
            HeadingPolicy::Standard => Self::standard().with_anchor(config.anchor),
            HeadingPolicy::Strict => Self::strict(config.anchor, config.min_title_chars),
        }
    }

    /// Strip `anchor` from titles, and let it bypass the rules.
    pub fn with_anchor(mut self, anchor: char) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Add another rule on top of the policy's own.
    pub fn with_rule(mut self, rule: impl AcceptanceRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Resolve every heading in a classified document.
    ///
    /// `lines` must hold one entry per document line, in order.
    pub fn resolve(&self, lines: &[ClassifiedLine<'_>]) -> Vec<ResolvedTitle> {
        let mut titles = Vec::new();

        for (pos, line) in lines.iter().enumerate() {
            let LineEvent::Heading { level, text } = line.event else {
                continue;
            };

            let resolved = match text {
                Some(text) => {
                    let candidate = HeadingCandidate {
                        level,
                        text,
                        raw: line.raw,
                        line: line.number(),
                        previous: pos.checked_sub(1).map(|p| lines[p].raw),
                    };
                    self.accept_inline(&candidate)
                        .map(|title| (title, line.number()))
                }
                None => self.continue_empty(lines, pos),
            };

            if let Some((title, line)) = resolved {
                debug!(level, %title, line, "title accepted");
                titles.push(ResolvedTitle { level, title, line });
            }
        }

        titles
    }

    fn accept_inline(&self, candidate: &HeadingCandidate<'_>) -> Option<String> {
        let anchored = self.anchor.is_some_and(|a| candidate.raw.contains(a));
        if !anchored {
            if let Some(rule) = self.rules.iter().find(|r| r.rejects(candidate)) {
                debug!(
                    rule = rule.name(),
                    line = candidate.line,
                    text = candidate.text,
                    "heading rejected"
                );
                return None;
            }
        }
        self.clean(candidate.text)
    }

    /// Scan forward from an empty heading for the line that carries its title.
    ///
    /// Stops at the next heading, the next code fence, or the end of the
    /// document; the heading is dropped in those cases.
    fn continue_empty(&self, lines: &[ClassifiedLine<'_>], pos: usize) -> Option<(String, usize)> {
        for next in &lines[pos + 1..] {
            match next.event {
                LineEvent::CodeFence | LineEvent::Heading { .. } => break,
                LineEvent::Plain(raw) => {
                    let trimmed = raw.trim();
                    if is_continuation_filler(trimmed) {
                        continue;
                    }
                    return self.clean(trimmed).map(|title| (title, next.number()));
                }
            }
        }

        debug!(line = lines[pos].number(), "empty heading without a title line");
        None
    }

    /// Cut the anchor and anything after it, trim, and enforce the length floor.
    fn clean(&self, text: &str) -> Option<String> {
        let mut title = text;
        if let Some(pos) = self.anchor.and_then(|a| title.find(a)) {
            title = title[..pos].trim_end().trim_end_matches('[');
        }

        let title = title.trim();
        if title.chars().count() < self.min_title_chars {
            return None;
        }
        Some(title.to_string())
    }
}

impl Default for TitleResolver {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
