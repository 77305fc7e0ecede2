//! File-level workflows for mdindex.
//!
//! This crate ties document loading, the heading pipeline from
//! `mdindex-markdown`, index persistence, and verification into the
//! end-to-end operations the CLI exposes (`run_index`, `run_verify`).

pub mod indexer;
pub mod report;
pub mod store;
pub mod verify;

pub use indexer::{IndexJob, IndexSummary, run_index};
pub use report::{ReportOptions, render_report};
pub use store::{load_document, load_index, parse_index, render_index, write_index};
pub use verify::{
    EntryVerdict, IndexVerifier, VerificationReport, VerifyJob, VerifyOutcome, run_verify,
};
