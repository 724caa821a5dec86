//! Vocabulary input ingestion.
//!
//! Reads the tabular input file into validated records before any remote
//! work starts. Structural problems (missing file, missing columns) are
//! fatal here; individual empty rows are skipped silently.

pub mod reader;

// Re-export key types
pub use reader::{read_records, IngestError, SOURCE_COLUMN, TERM_COLUMN};
