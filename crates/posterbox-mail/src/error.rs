//! Error types for mailbox access.

use crate::session::MessageUid;
use thiserror::Error;

/// Result type for mailbox operations.
pub type MailResult<T> = Result<T, MailError>;

/// Errors that can occur while talking to the mail server.
#[derive(Error, Debug)]
pub enum MailError {
    /// Network or TLS failure; fatal to the pass.
    #[error("Connection error: {0}")]
    Connectivity(String),

    /// The server rejected the credentials; fatal to the pass.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Folder '{name}' error: {message}")]
    Folder { name: String, message: String },

    #[error("Search failed: {0}")]
    Search(String),

    /// A single message could not be fetched (e.g. expunged elsewhere).
    #[error("Failed to fetch message {uid}: {message}")]
    Fetch { uid: MessageUid, message: String },

    #[error("Failed to dispose of message {uid}: {message}")]
    Disposition { uid: MessageUid, message: String },

    #[error("Failed to close session: {0}")]
    Finalize(String),

    #[error("Unparseable message: {0}")]
    Parse(String),
}
