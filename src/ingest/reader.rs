//! CSV vocabulary reader.
//!
//! The input must carry a term column and a source-label column; anything
//! else in the file is ignored. Row position becomes the record index,
//! which later keys narration file names.

use std::path::Path;

use csv::StringRecord;
use thiserror::Error;
use tracing::debug;

use crate::domain::InputRecord;

/// Required term column header
pub const TERM_COLUMN: &str = "Front";

/// Required source-label column header
pub const SOURCE_COLUMN: &str = "Source";

/// Errors that abort the run before any remote call
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("input file not found: {0}")]
    FileNotFound(String),

    #[error("missing required column '{column}' (found: {found})")]
    MissingColumn {
        column: &'static str,
        found: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read and validate vocabulary rows.
///
/// Rows with an empty term are skipped (not an error); they still consume
/// an index so file naming stays stable under edits to other rows.
pub fn read_records(path: &Path) -> Result<Vec<InputRecord>, IngestError> {
    if !path.exists() {
        return Err(IngestError::FileNotFound(path.display().to_string()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let term_idx = column_index(&headers, TERM_COLUMN)?;
    let source_idx = column_index(&headers, SOURCE_COLUMN)?;

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;

        let term = row.get(term_idx).unwrap_or("").trim();
        if term.is_empty() {
            debug!(index, "Skipping row without a term");
            continue;
        }

        let source_label = row.get(source_idx).unwrap_or("").trim().to_string();

        records.push(InputRecord {
            index,
            term: term.to_string(),
            source_label,
        });
    }

    Ok(records)
}

fn column_index(headers: &StringRecord, column: &'static str) -> Result<usize, IngestError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| IngestError::MissingColumn {
            column,
            found: headers.iter().collect::<Vec<_>>().join(", "),
        })
}
