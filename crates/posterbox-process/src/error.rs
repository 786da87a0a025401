//! Error types for text recognition.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for processing operations.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Errors that can occur during text recognition.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Tool not found: {tool}. Please install it.")]
    ToolNotFound { tool: String },

    #[error("OCR error: {0}")]
    OcrError(String),
}

impl From<ProcessError> for posterbox_core::Error {
    fn from(err: ProcessError) -> Self {
        posterbox_core::Error::Recognition(err.to_string())
    }
}
