//! Line-shape predicates shared by the resolver, the filter and the verifier.
//!
//! Every predicate takes an already-trimmed line.

use std::sync::LazyLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// A line that is nothing but `[text](target)`.
static PURE_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[.*?\]\(.*?\)$").expect("pure link regex"));

/// Opening half of a link broken across lines: `[` or `[` + zero-width space,
/// with no closing bracket on the same line.
static LINK_OPEN_FRAGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\x{200B}?[^\]]*$").expect("link open fragment regex"));

/// Closing half of a link broken across lines: `](https://...)`.
static LINK_CLOSE_FRAGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\]\(https?://.*\)$").expect("link close fragment regex"));

/// ATX heading marker: one to six `#`, then whitespace and optional text,
/// or nothing at all.
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})(?:\s+(.*?))?\s*$").expect("heading regex")
});

/// `1. `, `23. ` and friends.
static ORDERED_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s").expect("ordered item regex"));

/// Fence delimiter marker.
pub const CODE_FENCE: &str = "```";

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Heading level and text of a trimmed line. Text is `None` for a bare
/// `#` run.
pub fn heading_marker(trimmed: &str) -> Option<(u8, Option<&str>)> {
    let caps = HEADING_RE.captures(trimmed)?;
    let level = u8::try_from(caps.get(1)?.as_str().len()).ok()?;
    let text = caps
        .get(2)
        .map(|m| m.as_str().trim())
        .filter(|t| !t.is_empty());
    Some((level, text))
}

pub fn is_code_fence(trimmed: &str) -> bool {
    trimmed.starts_with(CODE_FENCE)
}

/// `- item` or `* item`.
pub fn is_list_item(trimmed: &str) -> bool {
    trimmed.starts_with("- ") || trimmed.starts_with("* ")
}

pub fn is_ordered_item(trimmed: &str) -> bool {
    ORDERED_ITEM_RE.is_match(trimmed)
}

pub fn is_pure_link(trimmed: &str) -> bool {
    PURE_LINK_RE.is_match(trimmed)
}

pub fn is_link_fragment(trimmed: &str) -> bool {
    LINK_OPEN_FRAGMENT_RE.is_match(trimmed) || LINK_CLOSE_FRAGMENT_RE.is_match(trimmed)
}

/// Lines skipped while looking for the title of an empty heading.
pub fn is_continuation_filler(trimmed: &str) -> bool {
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || is_code_fence(trimmed)
        || is_list_item(trimmed)
        || is_pure_link(trimmed)
        || is_link_fragment(trimmed)
}

/// Whether a line outside a code fence counts as one unit of prose.
///
/// Blank lines, `#`-prefixed lines, list and ordered-list items, pure links
/// and link fragments do not count.
pub fn is_effective_content(trimmed: &str) -> bool {
    !(trimmed.is_empty()
        || trimmed.starts_with('#')
        || is_list_item(trimmed)
        || is_ordered_item(trimmed)
        || is_pure_link(trimmed)
        || is_link_fragment(trimmed))
}
