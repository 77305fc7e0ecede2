//! Error types for mdindex.
//!
//! Library crates use [`MdIndexError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all mdindex operations.
///
/// Heuristic rejections (unresolved empty headings, thin sections,
/// verification mismatches) are never errors; they are logged or reported.
#[derive(Debug, thiserror::Error)]
pub enum MdIndexError {
    /// The Markdown source does not exist.
    #[error("input not found: {path:?}")]
    InputNotFound { path: PathBuf },

    /// The Markdown source is not valid UTF-8.
    #[error("failed to decode {path:?} as UTF-8: {source}")]
    Decode {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },

    /// The index file is not valid JSON or breaks the record contract.
    #[error("malformed index {path:?}: {message}")]
    IndexMalformed { path: PathBuf, message: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Index serialization failure.
    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MdIndexError>;

impl MdIndexError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a malformed-index error for the given file.
    pub fn malformed(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::IndexMalformed {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Like [`MdIndexError::io`], for reading a run's input file: a
    /// `NotFound` error becomes [`MdIndexError::InputNotFound`].
    pub fn input(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::InputNotFound { path };
        }
        Self::Io { path, source }
    }
}
