//! Error taxonomy: IO, Snapshot, Usage. Resolution gaps are not represented
//! here at all; they are data-dependent and dropped silently by the
//! resolver and edge installer, never surfaced as an error.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("usage error: {0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
