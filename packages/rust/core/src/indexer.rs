//! File-level indexing: read a Markdown file, index it, write the JSON.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use mdindex_markdown::{DroppedSection, index_document};
use mdindex_shared::{IndexLayout, IndexerConfig, Result};

use crate::store::{load_document, write_index};

/// Inputs for an indexing run.
#[derive(Debug, Clone)]
pub struct IndexJob {
    /// Markdown source.
    pub input: PathBuf,
    /// Destination for the index file.
    pub output: PathBuf,
    pub indexer: IndexerConfig,
    pub layout: IndexLayout,
}

/// Statistics from a completed run.
#[derive(Debug, Clone)]
pub struct IndexSummary {
    pub output: PathBuf,
    /// Lines in the source document.
    pub lines: usize,
    pub headings_seen: usize,
    pub accepted: usize,
    /// Entries written.
    pub kept: usize,
    pub dropped: Vec<DroppedSection>,
    pub elapsed: Duration,
}

/// Run the indexer end to end. The output file is written only after the
/// whole document has been processed.
#[instrument(skip_all, fields(input = %job.input.display(), output = %job.output.display()))]
pub fn run_index(job: &IndexJob) -> Result<IndexSummary> {
    let start = Instant::now();

    let doc = load_document(&job.input)?;
    let build = index_document(&doc, &job.indexer);
    write_index(&job.output, &build.entries, job.layout)?;

    let summary = IndexSummary {
        output: job.output.clone(),
        lines: doc.len(),
        headings_seen: build.headings_seen,
        accepted: build.accepted,
        kept: build.entries.len(),
        dropped: build.dropped,
        elapsed: start.elapsed(),
    };

    info!(
        kept = summary.kept,
        dropped = summary.dropped.len(),
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "index written"
    );
    Ok(summary)
}
