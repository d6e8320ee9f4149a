//! Error types shared by the store, the file parser and the engine.

use thiserror::Error;

/// Errors raised below the CLI layer.
///
/// Dirty data never lands here: missing or unparseable values are coerced by
/// the normalizer. These variants cover caller mistakes and I/O failures.
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("Unknown category '{category}' for dataset '{dataset}'")]
    UnknownCategory { dataset: String, category: String },

    #[error("Invalid schema '{schema}': {reason}")]
    InvalidSchema { schema: String, reason: String },

    #[error("Unsupported file type: {0}. Upload CSV or XLSX.")]
    UnsupportedFileType(String),

    #[error("Uploaded file has no header row: {0}")]
    MissingHeader(String),

    #[error("Invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),

    #[error("Document not found in '{collection}': {id}")]
    NotFound { collection: String, id: String },

    #[error("Collection '{collection}' is corrupt: {reason}")]
    CorruptCollection { collection: String, reason: String },

    #[error(
        "Partial upload: {committed_chunks}/{total_chunks} chunks ({committed_records} records) \
         were saved before the failure: {source}"
    )]
    PartialUpload {
        committed_chunks: usize,
        total_chunks: usize,
        committed_records: usize,
        #[source]
        source: Box<StatsError>,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StatsResult<T> = std::result::Result<T, StatsError>;
