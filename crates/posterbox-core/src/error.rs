//! Error types for Posterbox.

use thiserror::Error;

/// Core error type, shared by the capability providers.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Text recognition failed: {0}")]
    Recognition(String),

    #[error("Tag extraction failed: {0}")]
    TagExtraction(String),
}

/// Result type alias using Posterbox's Error.
pub type Result<T> = std::result::Result<T, Error>;
