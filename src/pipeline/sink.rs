//! CSV output sink
//!
//! Append-only writer over the destination file. The header row is written
//! exactly once, only when the destination is currently empty, so repeated
//! runs accumulate rows under a single header.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{ExtractError, Result};

/// Serializing CSV writer with header-if-empty semantics.
///
/// Failure to open the destination is fatal to the whole run; there is no
/// partial-write recovery.
#[derive(Debug)]
pub struct CsvSink {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows_written: usize,
}

impl CsvSink {
    /// Open (or create) the destination in append mode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| ExtractError::io(path, e))?;
        let is_empty = file
            .metadata()
            .map_err(|e| ExtractError::io(path, e))?
            .len()
            == 0;

        let writer = csv::WriterBuilder::new()
            .has_headers(is_empty)
            .from_writer(file);
        Ok(Self {
            writer,
            path: path.to_path_buf(),
            rows_written: 0,
        })
    }

    /// Append one record.
    pub fn write<S: Serialize>(&mut self, record: &S) -> Result<()> {
        self.writer.serialize(record)?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| ExtractError::io(&self.path, e))
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
