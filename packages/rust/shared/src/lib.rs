//! Shared types, error model, and configuration for mdindex.
//!
//! This crate is the foundation depended on by all other mdindex crates.
//! It provides:
//! - [`MdIndexError`]: the unified error type
//! - Domain types ([`Document`], [`SectionEntry`], [`VerificationIssue`])
//! - Configuration ([`AppConfig`], [`IndexerConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AddrStyle, AppConfig, HeadingPolicy, IndexLayout, IndexerConfig, OutputConfig,
    VerifierConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{MdIndexError, Result};
pub use types::{Document, IssueKind, MAX_HEADING_LEVEL, SectionEntry, VerificationIssue};
