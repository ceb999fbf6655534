//! Error types for checkpoint ingestion
//!
//! Every failure aborts the run. Errors tied to a metadata source carry the
//! offending path so the message points at the file to fix.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Error type for the ingest-and-export pipeline
#[derive(Error, Debug)]
pub enum IngestError {
    /// Directory or file could not be read or written
    #[error("File operation failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Metadata file content is not a valid metadata record
    #[error("Malformed metadata in '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Metadata decoded but lacks a required field
    #[error("Invalid metadata in '{path}': {source}")]
    Validation {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    /// Table store operation failed (rusqlite)
    #[error("Table store error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Parquet writer or reader failed
    #[error("Parquet export failed: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow record batch construction failed
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// CSV export failed
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// Manifest serialization failed
    #[error("Failed to serialize run manifest: {0}")]
    Manifest(#[source] serde_json::Error),

    /// Exported artifact does not hold the rows that were written
    #[error("Export verification failed for '{path}': expected {expected} rows, found {actual}")]
    ExportMismatch {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Common(#[from] ckpt_common::CommonError),
}

impl IngestError {
    /// Create an I/O error for a path
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a decode error for a metadata path
    pub fn decode(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Self::Decode {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a validation error for a metadata path
    pub fn validation(path: impl AsRef<Path>, source: ValidationError) -> Self {
        Self::Validation {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Record-level validation failure raised by the normalizer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required source key is absent, null, or empty
    #[error("required field '{0}' is missing or empty")]
    MissingField(&'static str),
}
