//! Error kinds for a single station file and for a whole batch.

use thiserror::Error;

/// Why one station file produced no result. Every variant is non-fatal to a batch.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("no parseable rows in source")]
    EmptySource,

    #[error("expected at least 12 columns, found {columns}")]
    SchemaUnderflow { columns: usize },

    #[error("no valid AIR-TEMP value")]
    NoValidExtremum,

    #[error("transport failure: {0}")]
    TransportFailure(String),

    #[error("failed to decompress source: {0}")]
    Decode(#[from] std::io::Error),

    #[error("failed to persist table: {0}")]
    Sink(#[source] SinkError),
}

impl FileError {
    /// Short stable name used when tallying skipped files.
    pub fn kind(&self) -> &'static str {
        match self {
            FileError::EmptySource => "EmptySource",
            FileError::SchemaUnderflow { .. } => "SchemaUnderflow",
            FileError::NoValidExtremum => "NoValidExtremum",
            FileError::TransportFailure(_) => "TransportFailure",
            FileError::Decode(_) => "Decode",
            FileError::Sink(_) => "Sink",
        }
    }
}

impl From<reqwest::Error> for FileError {
    fn from(e: reqwest::Error) -> Self {
        FileError::TransportFailure(e.to_string())
    }
}

/// Failures writing tables to disk.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

/// Conditions that end a batch run.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("no station files listed for years {start}..{end}")]
    NoData { start: i32, end: i32 },

    #[error("failed to persist summary for {year}: {source}")]
    Summary {
        year: i32,
        #[source]
        source: SinkError,
    },
}

// -- Tests -------------------------------------------------------------------
