//! Human-readable rendering of a [`VerificationReport`].

use std::fmt::Write as _;

use mdindex_shared::Document;

use crate::verify::{EntryVerdict, VerificationReport};

const DIVIDER: &str = "----------------------------------------";

/// What to show and how much surrounding text to include.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Only list entries with at least one issue.
    pub errors_only: bool,
    /// Skip entries deeper than this level.
    pub max_level: Option<u8>,
    /// Lines of document context on each side of the focus line. Failing
    /// entries get at least one line of context.
    pub context_lines: usize,
}

impl ReportOptions {
    fn includes(&self, verdict: &EntryVerdict) -> bool {
        self.max_level.is_none_or(|max| verdict.entry.level <= max)
    }
}

/// Render the report as plain text, ending with a summary line.
///
/// The summary counts only entries that pass the level filter, whether or
/// not `errors_only` hides them.
pub fn render_report(doc: &Document, report: &VerificationReport, opts: &ReportOptions) -> String {
    let mut out = String::new();
    let mut audited = 0;
    let mut issues = 0;

    for verdict in report.verdicts.iter().filter(|v| opts.includes(v)) {
        audited += 1;
        issues += verdict.issues.len();

        if opts.errors_only && verdict.is_ok() {
            continue;
        }
        render_verdict(&mut out, doc, verdict, opts);
    }

    let _ = writeln!(out, "audited: {audited} | issues: {issues}");
    out
}

fn render_verdict(out: &mut String, doc: &Document, verdict: &EntryVerdict, opts: &ReportOptions) {
    let entry = &verdict.entry;
    let tag = if verdict.is_ok() { "[OK]  " } else { "[FAIL]" };
    let _ = writeln!(
        out,
        "{tag} Lvl {} | Addr {:<12} | {}",
        entry.level, entry.addr, entry.title
    );
    for issue in &verdict.issues {
        let _ = writeln!(out, "       {}: {}", issue.kind, issue.message);
    }

    let radius = if verdict.is_ok() {
        opts.context_lines
    } else {
        opts.context_lines.max(1)
    };
    if radius > 0 {
        render_context(out, doc, verdict.focus(), radius);
    }
}

/// Lines `focus - radius ..= focus + radius`, numbered 1-based, focus marked.
fn render_context(out: &mut String, doc: &Document, focus: usize, radius: usize) {
    if doc.is_empty() {
        return;
    }
    let focus = focus.min(doc.len() - 1);
    let start = focus.saturating_sub(radius);
    let end = focus.saturating_add(radius).saturating_add(1).min(doc.len());

    for number in start + 1..=end {
        let Some(line) = doc.line(number) else {
            break;
        };
        let marker = if number == focus + 1 { "->" } else { "  " };
        let _ = writeln!(out, "{number:6} {marker} {line}");
    }
    let _ = writeln!(out, "{DIVIDER}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::IndexVerifier;
    use mdindex_shared::SectionEntry;

    fn entry(addr: &str, title: &str, line: usize, level: u8) -> SectionEntry {
        SectionEntry {
            addr: addr.into(),
            title: title.into(),
            line,
            level,
        }
    }

    fn sample() -> (Document, VerificationReport) {
        let doc = Document::from_lines([
            "# Intro", "Some text.", "More text.", "## Sub", "A.", "B.", "## Thin", "x",
        ]);
        let index = vec![
            entry("1", "Intro", 1, 1),
            entry("1.1", "Sub", 4, 2),
            entry("1.2", "Thin", 7, 2),
        ];
        let report = IndexVerifier::new(10, 2).verify(&doc, &index);
        (doc, report)
    }

    #[test]
    fn lists_every_entry_by_default() {
        let (doc, report) = sample();
        let text = render_report(&doc, &report, &ReportOptions::default());
        assert!(text.contains("[OK]   Lvl 1 | Addr 1            | Intro"));
        assert!(text.contains("[FAIL] Lvl 2 | Addr 1.2          | Thin"));
        assert!(text.contains("Coherence: "));
        assert!(text.ends_with("audited: 3 | issues: 1\n"));
    }

    #[test]
    fn errors_only_hides_passing_entries() {
        let (doc, report) = sample();
        let opts = ReportOptions {
            errors_only: true,
            ..ReportOptions::default()
        };
        let text = render_report(&doc, &report, &opts);
        assert!(!text.contains("Intro"));
        assert!(text.contains("Thin"));
        assert!(text.ends_with("audited: 3 | issues: 1\n"));
    }

    #[test]
    fn level_filter_limits_audit() {
        let (doc, report) = sample();
        let opts = ReportOptions {
            max_level: Some(1),
            ..ReportOptions::default()
        };
        let text = render_report(&doc, &report, &opts);
        assert!(!text.contains("Thin"));
        assert!(text.ends_with("audited: 1 | issues: 0\n"));
    }

    #[test]
    fn failing_entries_get_context() {
        let (doc, report) = sample();
        let text = render_report(&doc, &report, &ReportOptions::default());
        assert!(text.contains("     7 -> ## Thin"));
        assert!(text.contains("     6    B."));
        assert!(text.contains("     8    x"));
        // Passing entries stay compact without a context request.
        assert!(!text.contains("     1 -> # Intro"));
    }

    #[test]
    fn requested_context_applies_to_all() {
        let (doc, report) = sample();
        let opts = ReportOptions {
            context_lines: 2,
            ..ReportOptions::default()
        };
        let text = render_report(&doc, &report, &opts);
        assert!(text.contains("     1 -> # Intro"));
        assert!(text.contains("     3    More text."));
        assert!(text.contains("     2    Some text."));
    }

    #[test]
    fn oversized_context_is_clamped_to_document() {
        let (doc, report) = sample();
        let opts = ReportOptions {
            context_lines: usize::MAX,
            ..ReportOptions::default()
        };
        let text = render_report(&doc, &report, &opts);
        assert!(text.contains("     1 -> # Intro"));
        assert!(text.contains("     8    x"));
        assert!(text.ends_with("audited: 3 | issues: 1\n"));
    }

    #[test]
    fn empty_report_still_summarizes() {
        let doc = Document::from_lines(Vec::<String>::new());
        let text = render_report(&doc, &VerificationReport::default(), &ReportOptions::default());
        assert_eq!(text, "audited: 0 | issues: 0\n");
    }
}
