//! Crate-level error type.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the extraction pipeline.
///
/// Per-file failures are caught at the file-processing boundary and logged;
/// only failures opening the output destination abort a run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid sentence tag pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl ExtractError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
