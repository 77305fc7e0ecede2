//! Index verification against the current document.
//!
//! Each entry gets two independent checks: is its title still near its
//! recorded line (correctness), and does its segment still carry enough
//! prose (coherence). Problems are collected, never raised.

use std::ops::Range;
use std::path::PathBuf;

use tracing::{info, instrument, warn};

use mdindex_markdown::count_effective_lines;
use mdindex_shared::{
    Document, IssueKind, Result, SectionEntry, VerificationIssue, VerifierConfig,
};

use crate::store::{load_document, load_index};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Outcome of checking one entry.
#[derive(Debug, Clone)]
pub struct EntryVerdict {
    pub entry: SectionEntry,
    /// 0-based slot where the title was found.
    pub found_at: Option<usize>,
    /// 0-based, end-exclusive window that was searched.
    pub searched: Range<usize>,
    /// 0-based, end-exclusive segment that was counted.
    pub segment: Range<usize>,
    pub content_lines: usize,
    pub issues: Vec<VerificationIssue>,
}

impl EntryVerdict {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// 0-based slot to center context on: where the title was found, else
    /// where it was recorded.
    pub fn focus(&self) -> usize {
        self.found_at
            .unwrap_or_else(|| self.entry.line.saturating_sub(1))
    }
}

/// All verdicts for an index, in line order.
#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    pub verdicts: Vec<EntryVerdict>,
}

impl VerificationReport {
    pub fn issues(&self) -> impl Iterator<Item = &VerificationIssue> {
        self.verdicts.iter().flat_map(|v| v.issues.iter())
    }

    pub fn issue_count(&self) -> usize {
        self.verdicts.iter().map(|v| v.issues.len()).sum()
    }

    /// `true` when the index matches the document.
    pub fn is_consistent(&self) -> bool {
        self.verdicts.iter().all(EntryVerdict::is_ok)
    }
}

// ---------------------------------------------------------------------------
// Verifier
// ---------------------------------------------------------------------------

/// Re-derives each entry's position and substance from the document.
#[derive(Debug, Clone)]
pub struct IndexVerifier {
    search_window: usize,
    min_content_lines: usize,
    anchor: Option<char>,
}

impl IndexVerifier {
    pub fn new(search_window: usize, min_content_lines: usize) -> Self {
        Self {
            search_window,
            min_content_lines,
            anchor: None,
        }
    }

    pub fn from_config(config: &VerifierConfig) -> Self {
        Self::new(config.search_window, config.min_content_lines)
    }

    /// Treat text from `anchor` onward in a heading line as decoration.
    pub fn with_anchor(mut self, anchor: char) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Check every entry. Entries are processed in line order; the index
    /// itself is not modified.
    #[instrument(skip_all, fields(entries = index.len(), lines = doc.len()))]
    pub fn verify(&self, doc: &Document, index: &[SectionEntry]) -> VerificationReport {
        let mut ordered: Vec<&SectionEntry> = index.iter().collect();
        ordered.sort_by_key(|e| e.line);

        let verdicts = ordered
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let next_line = ordered.get(i + 1).map(|n| n.line);
                self.check(doc, entry, next_line)
            })
            .collect();

        let report = VerificationReport { verdicts };
        info!(
            audited = report.verdicts.len(),
            issues = report.issue_count(),
            "verification complete"
        );
        report
    }

    fn check(&self, doc: &Document, entry: &SectionEntry, next_line: Option<usize>) -> EntryVerdict {
        let mut issues = Vec::new();

        // --- Correctness ---
        let start = entry.line.saturating_sub(1);
        let end = doc.len().min(entry.line.saturating_add(self.search_window));
        let searched = start..end.max(start);
        let found_at = searched.clone().find(|&idx| {
            doc.get(idx)
                .is_some_and(|line| self.title_matches(line.trim(), entry))
        });

        if found_at.is_none() {
            issues.push(issue(
                entry,
                IssueKind::Correctness,
                format!(
                    "title '{}' (level {}, line {}) not found near line {}; searched lines {} to {}",
                    entry.title,
                    entry.level,
                    entry.line,
                    entry.line,
                    searched.start + 1,
                    searched.end
                ),
            ));
        }

        // --- Coherence ---
        let seg_start = found_at.unwrap_or(start);
        let seg_end = next_line.map_or(doc.len(), |l| l.saturating_sub(1));
        let segment = seg_start..seg_end.max(seg_start);
        let skip_first = found_at
            .and_then(|idx| doc.get(idx))
            .is_some_and(|line| self.is_title_line(line.trim(), entry));
        let content_lines = count_effective_lines(doc, segment.clone(), skip_first);

        if content_lines < self.min_content_lines {
            issues.push(issue(
                entry,
                IssueKind::Coherence,
                format!(
                    "title '{}' (line {}) has only {} effective content lines; segment lines {} to {}",
                    entry.title,
                    entry.line,
                    content_lines,
                    segment.start + 1,
                    segment.end
                ),
            ));
        }

        for problem in &issues {
            warn!(addr = %entry.addr, kind = %problem.kind, "{}", problem.message);
        }

        EntryVerdict {
            entry: entry.clone(),
            found_at,
            searched,
            segment,
            content_lines,
            issues,
        }
    }

    /// Whether a trimmed document line carries the entry's title.
    fn title_matches(&self, line: &str, entry: &SectionEntry) -> bool {
        line.starts_with(entry.title.as_str()) || self.is_title_line(line, entry)
    }

    /// The line is the title itself, bare or as a heading of the entry's level.
    fn is_title_line(&self, line: &str, entry: &SectionEntry) -> bool {
        if line == entry.title {
            return true;
        }
        let hashes = "#".repeat(usize::from(entry.level));
        let Some(rest) = line.strip_prefix(hashes.as_str()) else {
            return false;
        };
        let mut rest = rest.trim();
        if rest == entry.title {
            return true;
        }
        if let Some(pos) = self.anchor.and_then(|a| rest.find(a)) {
            rest = rest[..pos].trim_end().trim_end_matches('[').trim();
            return rest == entry.title;
        }
        false
    }
}

fn issue(entry: &SectionEntry, kind: IssueKind, message: String) -> VerificationIssue {
    VerificationIssue {
        addr: entry.addr.clone(),
        kind,
        message,
        entry: entry.clone(),
    }
}

// ---------------------------------------------------------------------------
// File-level entry point
// ---------------------------------------------------------------------------

/// Inputs for a verification run.
#[derive(Debug, Clone)]
pub struct VerifyJob {
    /// Markdown source the index was built from.
    pub markdown: PathBuf,
    /// Index file to check.
    pub index: PathBuf,
    pub verifier: VerifierConfig,
    /// Anchor glyph used by the indexer, if any.
    pub anchor: Option<char>,
}

/// Document and report, kept together so the caller can render context.
#[derive(Debug)]
pub struct VerifyOutcome {
    pub document: Document,
    pub report: VerificationReport,
}

/// Load both files and verify. Fails only on I/O, decoding, or a malformed index.
#[instrument(skip_all, fields(markdown = %job.markdown.display(), index = %job.index.display()))]
pub fn run_verify(job: &VerifyJob) -> Result<VerifyOutcome> {
    let document = load_document(&job.markdown)?;
    let index = load_index(&job.index)?;

    let mut verifier = IndexVerifier::from_config(&job.verifier);
    if let Some(anchor) = job.anchor {
        verifier = verifier.with_anchor(anchor);
    }

    let report = verifier.verify(&document, &index);
    Ok(VerifyOutcome { document, report })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_path(name: &str) -> PathBuf {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(name)
    }

    fn entry(addr: &str, title: &str, line: usize, level: u8) -> SectionEntry {
        SectionEntry {
            addr: addr.into(),
            title: title.into(),
            line,
            level,
        }
    }

    fn verifier() -> IndexVerifier {
        IndexVerifier::new(10, 2)
    }

    #[test]
    fn consistent_index_has_no_issues() {
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
        let index = vec![entry("1", "Intro", 1, 1), entry("1.1", "Sub", 5, 2)];
        let report = verifier().verify(&doc, &index);
        assert!(report.is_consistent());
        assert_eq!(report.verdicts[0].found_at, Some(0));
        assert_eq!(report.verdicts[0].content_lines, 2);
        assert_eq!(report.verdicts[1].segment, 4..8);
    }

    #[test]
    fn shifted_title_is_found_within_window() {
        let doc = Document::from_lines([
            "preface", "", "", "## Moved", "text one", "text two",
        ]);
        let report = verifier().verify(&doc, &[entry("1", "Moved", 1, 2)]);
        assert!(report.is_consistent());
        assert_eq!(report.verdicts[0].found_at, Some(3));
        assert_eq!(report.verdicts[0].segment, 3..6);
    }

    #[test]
    fn missing_title_is_a_correctness_issue() {
        let doc = Document::from_lines(["# Other", "p", "q"]);
        let report = verifier().verify(&doc, &[entry("1", "Gone", 1, 1)]);
        let issues: Vec<_> = report.issues().collect();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Correctness);
        assert_eq!(issues[0].addr, "1");
        assert!(issues[0].message.contains("searched lines 1 to 3"));
    }

    #[test]
    fn window_is_bounded() {
        let mut lines = vec!["filler"; 12];
        lines.push("# Far Away");
        lines.extend(["a", "b"]);
        let doc = Document::from_lines(lines);

        let report = verifier().verify(&doc, &[entry("1", "Far Away", 1, 1)]);
        assert_eq!(report.verdicts[0].found_at, None);
        assert_eq!(report.verdicts[0].searched, 0..11);

        let report = IndexVerifier::new(13, 2).verify(&doc, &[entry("1", "Far Away", 1, 1)]);
        assert_eq!(report.verdicts[0].found_at, Some(12));
    }

    #[test]
    fn heading_level_must_match_exactly() {
        let doc = Document::from_lines(["### Deep", "a", "b"]);
        let report = verifier().verify(&doc, &[entry("1", "Deep", 1, 2)]);
        assert_eq!(report.verdicts[0].found_at, None);
    }

    #[test]
    fn prefix_match_counts_as_found_but_not_skipped() {
        let doc = Document::from_lines(["Overview of the system", "detail"]);
        let report = verifier().verify(&doc, &[entry("1", "Overview", 1, 1)]);
        let verdict = &report.verdicts[0];
        assert_eq!(verdict.found_at, Some(0));
        // The matched line is prose, so it counts toward the segment.
        assert_eq!(verdict.content_lines, 2);
        assert!(verdict.is_ok());
    }

    #[test]
    fn thin_segment_is_a_coherence_issue() {
        let doc = Document::from_lines(["# A", "only one", "# B", "x", "y"]);
        let index = vec![entry("1", "A", 1, 1), entry("2", "B", 3, 1)];
        let report = verifier().verify(&doc, &index);
        let issues: Vec<_> = report.issues().collect();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Coherence);
        assert_eq!(issues[0].entry.title, "A");
        assert!(issues[0].message.contains("only 1 effective content lines"));
    }

    #[test]
    fn all_issues_are_accumulated() {
        let doc = Document::from_lines(["# A", "# B", "# C"]);
        let index = vec![
            entry("1", "A", 1, 1),
            entry("2", "Missing", 2, 1),
            entry("3", "C", 3, 1),
        ];
        let report = verifier().verify(&doc, &index);
        assert_eq!(report.verdicts.len(), 3);
        // Every entry is thin; "Missing" is also not found.
        assert_eq!(report.issue_count(), 4);
    }

    #[test]
    fn unsorted_index_is_checked_in_line_order() {
        let doc = Document::from_lines(["# A", "a1", "a2", "# B", "b1", "b2"]);
        let index = vec![entry("2", "B", 4, 1), entry("1", "A", 1, 1)];
        let report = verifier().verify(&doc, &index);
        assert!(report.is_consistent());
        assert_eq!(report.verdicts[0].entry.title, "A");
        assert_eq!(index[0].title, "B");
    }

    #[test]
    fn entry_past_end_of_document() {
        let doc = Document::from_lines(["# A", "a", "b"]);
        let report = verifier().verify(&doc, &[entry("1", "Late", 40, 1)]);
        let kinds: Vec<_> = report.issues().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::Correctness, IssueKind::Coherence]);
    }

    #[test]
    fn extreme_recorded_line_is_reported_not_fatal() {
        let body = format!(
            r#"[{{"addr":"1","title":"A","line":{},"level":1}}]"#,
            usize::MAX
        );
        let index = crate::store::parse_index(std::path::Path::new("index.json"), &body)
            .expect("parse");
        let doc = Document::from_lines(["# A", "a", "b"]);

        let report = verifier().verify(&doc, &index);
        let kinds: Vec<_> = report.issues().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::Correctness, IssueKind::Coherence]);
    }

    #[test]
    fn anchored_heading_matches_with_anchor() {
        let doc = Document::from_lines(["## Setup [¶](#setup)", "one", "two"]);
        let index = [entry("1", "Setup", 1, 2)];

        let report = verifier().verify(&doc, &index);
        // Without the anchor the line still starts with "## ", not the title.
        assert!(!report.is_consistent());

        let report = verifier().with_anchor('¶').verify(&doc, &index);
        assert!(report.is_consistent());
    }

    #[test]
    fn guide_fixture_round() {
        let job = VerifyJob {
            markdown: fixture_path("markdown/guide.md"),
            index: fixture_path("json/guide.index.json"),
            verifier: VerifierConfig::default(),
            anchor: Some('¶'),
        };
        let outcome = run_verify(&job).expect("verify fixture");
        assert_eq!(outcome.report.verdicts.len(), 5);
        assert!(outcome.report.is_consistent());
    }

    #[test]
    fn stale_fixture_reports_both_kinds() {
        let job = VerifyJob {
            markdown: fixture_path("markdown/guide.md"),
            index: fixture_path("json/guide.stale.index.json"),
            verifier: VerifierConfig::default(),
            anchor: Some('¶'),
        };
        let outcome = run_verify(&job).expect("verify fixture");
        let found: Vec<_> = outcome
            .report
            .issues()
            .map(|i| (i.addr.as_str(), i.kind))
            .collect();
        assert_eq!(
            found,
            vec![("1.1", IssueKind::Correctness), ("1.3", IssueKind::Coherence)]
        );
    }

    #[test]
    fn malformed_index_aborts_the_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let index = dir.path().join("index.json");
        std::fs::write(&index, "[{\"addr\": 1}]").expect("write");

        let job = VerifyJob {
            markdown: fixture_path("markdown/guide.md"),
            index,
            verifier: VerifierConfig::default(),
            anchor: None,
        };
        let err = run_verify(&job).unwrap_err();
        assert!(matches!(
            err,
            mdindex_shared::MdIndexError::IndexMalformed { .. }
        ));
    }
}
