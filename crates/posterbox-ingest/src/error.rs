//! Error types for the ingestion pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Errors that can occur during ingestion.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The content store could not be written.
    #[error("Storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid attachment filename: {0:?}")]
    InvalidFilename(String),

    #[error("Database error: {0}")]
    Database(#[from] posterbox_db::DbError),

    #[error("Mail error: {0}")]
    Mail(#[from] posterbox_mail::MailError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IngestError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IngestError::Storage {
            path: path.into(),
            source,
        }
    }
}
