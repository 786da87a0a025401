//! The mailbox contract consumed by the ingestion pipeline.

use crate::error::MailResult;

/// Server-assigned identifier of a message within the selected mailbox.
pub type MessageUid = u32;

/// An authenticated session with a mailbox selected.
///
/// Messages move from unseen to processed in two phases: [`mark_processed`]
/// copies a message into the processed folder and flags it deleted, and
/// [`finalize`] expunges every flagged message at once. Until the expunge,
/// a deletion flag is reversible, so a crash mid-pass loses nothing.
///
/// [`mark_processed`]: MailboxSession::mark_processed
/// [`finalize`]: MailboxSession::finalize
pub trait MailboxSession {
    /// Create `name` unless it already exists.
    fn ensure_folder_exists(&mut self, name: &str) -> MailResult<()>;

    /// Ids of the unseen messages in the selected mailbox, ascending.
    fn list_unseen(&mut self) -> MailResult<Vec<MessageUid>>;

    /// Raw RFC 822 bytes of one message. Must not mark it seen.
    fn fetch_raw(&mut self, uid: MessageUid) -> MailResult<Vec<u8>>;

    /// Copy the message to the processed folder, then flag it deleted.
    fn mark_processed(&mut self, uid: MessageUid) -> MailResult<()>;

    /// Expunge flagged messages and log out. Consumes the session, so it
    /// runs exactly once.
    fn finalize(self) -> MailResult<()>
    where
        Self: Sized;
}
