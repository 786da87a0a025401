//! Posterbox Mail - Mailbox access and attachment extraction.
//!
//! This crate provides:
//! - The [`MailboxSession`] contract used by the ingestion pipeline
//! - An IMAP implementation over TLS ([`ImapConnection`] / [`ImapMailbox`])
//! - Extraction of image attachments from raw messages

mod attachments;
mod error;
mod imap_session;
mod session;

pub use attachments::{ImageAttachment, ParsedMessage};
pub use error::{MailError, MailResult};
pub use imap_session::{ImapConnection, ImapMailbox};
pub use session::{MailboxSession, MessageUid};
