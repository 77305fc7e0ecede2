//! Markdown heading extraction: classify → resolve → address → filter.
//!
//! [`index_document`] is the main entry point. It runs the whole pipeline
//! over an in-memory [`Document`] and returns the final, densely numbered
//! entries together with what was dropped along the way. Every call owns its
//! own counter and fence state.

pub mod address;
pub mod classify;
pub mod patterns;
pub mod resolve;
pub mod substance;

use tracing::{debug, info, instrument};

use mdindex_shared::{Document, IndexerConfig, SectionEntry};

pub use address::{AddressAllocator, renumber};
pub use classify::{ClassifiedLine, LineEvent, classify, parse_heading};
pub use resolve::{
    AcceptanceRule, CodeShape, HeadingCandidate, ParagraphBoundary, ResolvedTitle, TitleResolver,
};
pub use substance::{
    DroppedSection, FilterOutcome, SubstantialityFilter, count_effective_lines, segment,
};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Result of indexing one document.
#[derive(Debug, Clone, Default)]
pub struct IndexBuild {
    /// Final index, in document order.
    pub entries: Vec<SectionEntry>,
    /// Heading markers seen outside code fences.
    pub headings_seen: usize,
    /// Titles accepted by the resolver, before filtering.
    pub accepted: usize,
    /// Titles removed for thin content.
    pub dropped: Vec<DroppedSection>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Index a document.
///
/// 1. Classify lines, tracking code fences
/// 2. Resolve headings into titles under the configured policy
/// 3. Number the titles
/// 4. Drop thin sections and renumber the survivors
#[instrument(skip_all, fields(lines = doc.len(), policy = ?config.policy))]
pub fn index_document(doc: &Document, config: &IndexerConfig) -> IndexBuild {
    let lines = classify(doc);
    let headings_seen = lines.iter().filter(|l| l.is_heading()).count();

    let titles = TitleResolver::from_config(config).resolve(&lines);
    let accepted = titles.len();
    debug!(headings_seen, accepted, "titles resolved");

    let mut allocator = AddressAllocator::new(config.addr_style);
    let raw: Vec<SectionEntry> = titles
        .into_iter()
        .map(|t| SectionEntry {
            addr: allocator.next(t.level),
            title: t.title,
            line: t.line,
            level: t.level,
        })
        .collect();

    let FilterOutcome { kept, dropped } = SubstantialityFilter::from_config(config).apply(doc, raw);

    info!(
        headings_seen,
        accepted,
        kept = kept.len(),
        dropped = dropped.len(),
        "document indexed"
    );

    IndexBuild {
        entries: kept,
        headings_seen,
        accepted,
        dropped,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mdindex_shared::{AddrStyle, HeadingPolicy};
    use std::fs;

    fn fixture_path(name: &str) -> std::path::PathBuf {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(name)
    }

    fn load_fixture(name: &str) -> Document {
        let text = fs::read_to_string(fixture_path(name))
            .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"));
        Document::from_text(&text)
    }

    fn entry(addr: &str, title: &str, line: usize, level: u8) -> SectionEntry {
        SectionEntry {
            addr: addr.into(),
            title: title.into(),
            line,
            level,
        }
    }

    // --- Scenarios ---

    #[test]
    fn intro_and_sub_are_both_kept() {
        let doc = Document::from_lines([
            "# Intro",
            "",
            "Some text.",
            "More text.",
            "## Sub",
            "",
            "A.",
            "B.",
        ]);
        let build = index_document(&doc, &IndexerConfig::default());
        assert_eq!(
            build.entries,
            vec![entry("1", "Intro", 1, 1), entry("1.1", "Sub", 5, 2)]
        );

        let config = IndexerConfig {
            addr_style: AddrStyle::LevelCounter,
            ..IndexerConfig::default()
        };
        let build = index_document(&doc, &config);
        let addrs: Vec<_> = build.entries.iter().map(|e| e.addr.as_str()).collect();
        assert_eq!(addrs, vec!["1.1", "2.1"]);
    }

    #[test]
    fn back_to_back_headings_yield_empty_index() {
        let doc = Document::from_lines(["# A", "## B", "text"]);
        let build = index_document(&doc, &IndexerConfig::default());
        assert!(build.entries.is_empty());
        assert_eq!(build.accepted, 2);
        assert_eq!(build.dropped.len(), 2);
    }

    #[test]
    fn empty_heading_resolves_to_following_line() {
        let doc = Document::from_lines(["#", "Real Title", "", "line one", "line two"]);
        let build = index_document(&doc, &IndexerConfig::default());
        assert_eq!(build.entries, vec![entry("1", "Real Title", 2, 1)]);
    }

    // --- Properties ---

    #[test]
    fn code_fenced_headings_never_indexed() {
        let doc = Document::from_lines([
            "# Usage",
            "Run it like this.",
            "Then check output.",
            "```sh",
            "# Not a heading",
            "## Neither",
            "echo hi",
            "```",
            "Trailing prose.",
        ]);
        let build = index_document(&doc, &IndexerConfig::default());
        assert_eq!(build.headings_seen, 1);
        assert_eq!(build.entries, vec![entry("1", "Usage", 1, 1)]);
    }

    #[test]
    fn addresses_are_dense_after_filtering() {
        let doc = Document::from_lines([
            "# One", "a", "b", "## Thin", "x", "## Kept", "c", "d", "# Two", "e", "f",
        ]);
        let build = index_document(&doc, &IndexerConfig::default());
        let addrs: Vec<_> = build.entries.iter().map(|e| e.addr.as_str()).collect();
        assert_eq!(addrs, vec!["1", "1.1", "2"]);
        assert_eq!(build.dropped[0].entry.title, "Thin");
        assert_eq!(build.dropped[0].entry.addr, "1.1");
    }

    #[test]
    fn runs_do_not_share_state() {
        let doc = Document::from_lines(["# Alpha", "p", "q", "# Beta", "r", "s"]);
        let first = index_document(&doc, &IndexerConfig::default());
        let second = index_document(&doc, &IndexerConfig::default());
        assert_eq!(first.entries, second.entries);
        assert_eq!(second.entries[0].addr, "1");
    }

    #[test]
    fn entries_are_in_line_order_and_unique() {
        let doc = load_fixture("markdown/guide.md");
        let build = index_document(&doc, &IndexerConfig::default());
        assert!(!build.entries.is_empty());
        assert!(build.entries.windows(2).all(|w| w[0].line < w[1].line));
        assert!(build.entries.iter().all(|e| (1..=6).contains(&e.level)));
        assert!(build.entries.iter().all(|e| !e.title.is_empty()));
    }

    // --- Fixture ---

    #[test]
    fn guide_fixture_standard_policy() {
        let doc = load_fixture("markdown/guide.md");
        let build = index_document(&doc, &IndexerConfig::default());
        let titles: Vec<_> = build.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Getting Started",
                "Installation",
                "Configuration Reference",
                "x = load_settings()",
                "Troubleshooting",
            ]
        );
        let addrs: Vec<_> = build.entries.iter().map(|e| e.addr.as_str()).collect();
        assert_eq!(addrs, vec!["1", "1.1", "1.2", "1.2.1", "2"]);
    }

    #[test]
    fn guide_fixture_strict_policy() {
        let doc = load_fixture("markdown/guide.md");
        let config = IndexerConfig {
            policy: HeadingPolicy::Strict,
            ..IndexerConfig::default()
        };
        let build = index_document(&doc, &config);
        let titles: Vec<_> = build.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Getting Started",
                "Installation",
                "Configuration Reference",
                "Troubleshooting",
            ]
        );
        let addrs: Vec<_> = build.entries.iter().map(|e| e.addr.as_str()).collect();
        assert_eq!(addrs, vec!["1", "1.1", "1.2", "2"]);
    }
}
