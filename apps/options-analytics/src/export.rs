//! Snapshot loading and JSON export.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::chain::ChainRecord;

/// Errors reading a snapshot or writing output.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to open, read or write a file.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to encode or decode JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read a JSON array of chain records.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<ChainRecord>, ExportError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ExportError::io(path, e))?;
    let records: Vec<ChainRecord> = serde_json::from_reader(BufReader::new(file))?;
    tracing::debug!(path = %path.display(), records = records.len(), "Read chain snapshot");
    Ok(records)
}

/// Write `value` as pretty JSON to `writer`, followed by a newline.
pub fn write_json<T: Serialize, W: Write>(value: &T, mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer).map_err(serde_json::Error::io)?;
    writer.flush().map_err(serde_json::Error::io)?;
    Ok(())
}

/// Write `value` as pretty JSON to `path`, or stdout when `path` is `None`.
pub fn export_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<(), ExportError> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
            write_json(value, BufWriter::new(file))?;
            tracing::info!(path = %path.display(), "Report written");
        }
        None => write_json(value, std::io::stdout().lock())?,
    }
    Ok(())
}
