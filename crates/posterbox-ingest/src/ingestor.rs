//! The ingestion pass: unseen messages in, posters and tags out.

use crate::error::IngestResult;
use crate::store::ContentStore;
use chrono::{DateTime, Utc};
use posterbox_core::{normalize_tags, PosterId, TagExtractor, TextRecognizer};
use posterbox_db::Database;
use posterbox_mail::{ImageAttachment, MailboxSession, MessageUid, ParsedMessage};
use std::fmt;
use tracing::{debug, info, warn};

/// Counters for one ingestion pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub messages_found: usize,
    /// Messages copied to the processed folder and flagged deleted.
    pub messages_processed: usize,
    /// Messages left in the inbox after a fetch or disposition failure.
    pub messages_failed: usize,
    pub attachments_stored: usize,
    pub attachments_failed: usize,
    pub posters_created: usize,
    pub tags_linked: usize,
    /// Whether the closing expunge succeeded.
    pub finalized: bool,
}

impl fmt::Display for PassSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Messages found:      {}", self.messages_found)?;
        writeln!(f, "Messages processed:  {}", self.messages_processed)?;
        writeln!(f, "Messages failed:     {}", self.messages_failed)?;
        writeln!(
            f,
            "Attachments:         {} stored, {} failed",
            self.attachments_stored, self.attachments_failed
        )?;
        writeln!(f, "Posters created:     {}", self.posters_created)?;
        write!(f, "Tags linked:         {}", self.tags_linked)
    }
}

/// What a single stored attachment produced.
#[derive(Debug)]
struct AttachmentOutcome {
    poster_id: PosterId,
    tags_linked: usize,
}

/// Drives one pass over a mailbox session.
///
/// The recognizer and tag extractor are built once by the caller and
/// borrowed for every pass.
pub struct Ingestor<'a> {
    db: &'a Database,
    store: &'a ContentStore,
    recognizer: &'a dyn TextRecognizer,
    tagger: &'a dyn TagExtractor,
}

impl<'a> Ingestor<'a> {
    pub fn new(
        db: &'a Database,
        store: &'a ContentStore,
        recognizer: &'a dyn TextRecognizer,
        tagger: &'a dyn TagExtractor,
    ) -> Self {
        Self {
            db,
            store,
            recognizer,
            tagger,
        }
    }

    /// Run one pass and finalize the session.
    ///
    /// Only a failure to list the inbox ends the pass with an error; every
    /// per-message and per-attachment failure is logged and counted.
    pub fn run<S: MailboxSession>(
        &self,
        mut session: S,
        processed_folder: &str,
    ) -> IngestResult<PassSummary> {
        if let Err(e) = session.ensure_folder_exists(processed_folder) {
            warn!("Could not ensure folder '{}' exists: {}", processed_folder, e);
        }

        let uids = match session.list_unseen() {
            Ok(uids) => uids,
            Err(e) => {
                if let Err(close_err) = session.finalize() {
                    warn!("Failed to close session: {}", close_err);
                }
                return Err(e.into());
            }
        };

        let mut summary = PassSummary {
            messages_found: uids.len(),
            ..Default::default()
        };
        info!("Found {} unseen messages", uids.len());

        for uid in uids {
            self.process_message(&mut session, uid, &mut summary);
        }

        match session.finalize() {
            Ok(()) => summary.finalized = true,
            Err(e) => warn!("Failed to finalize mailbox: {}", e),
        }

        info!(
            found = summary.messages_found,
            processed = summary.messages_processed,
            failed = summary.messages_failed,
            posters = summary.posters_created,
            "Ingestion pass complete"
        );
        Ok(summary)
    }

    fn process_message<S: MailboxSession>(
        &self,
        session: &mut S,
        uid: MessageUid,
        summary: &mut PassSummary,
    ) {
        let raw = match session.fetch_raw(uid) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(uid, "Skipping message, left unseen: {}", e);
                summary.messages_failed += 1;
                return;
            }
        };

        let received = Utc::now();

        match ParsedMessage::parse(&raw) {
            Ok(message) => {
                debug!(uid, subject = message.subject().unwrap_or(""), "Processing message");
                for attachment in message.image_attachments() {
                    self.process_attachment(uid, &attachment, received, summary);
                }
            }
            Err(e) => warn!(uid, "Message has no readable attachments: {}", e),
        }

        match session.mark_processed(uid) {
            Ok(()) => summary.messages_processed += 1,
            Err(e) => {
                warn!(uid, "Failed to mark message processed: {}", e);
                summary.messages_failed += 1;
            }
        }
    }

    fn process_attachment(
        &self,
        uid: MessageUid,
        attachment: &ImageAttachment<'_>,
        received: DateTime<Utc>,
        summary: &mut PassSummary,
    ) {
        let filename = attachment.filename.as_str();

        if attachment.data.is_empty() {
            warn!(uid, filename, "Skipping empty attachment");
            summary.attachments_failed += 1;
            return;
        }

        match self.ingest_attachment(attachment, received) {
            Ok(outcome) => {
                summary.attachments_stored += 1;
                summary.posters_created += 1;
                summary.tags_linked += outcome.tags_linked;
                info!(
                    uid,
                    filename,
                    poster_id = outcome.poster_id,
                    tags = outcome.tags_linked,
                    "Stored poster"
                );
            }
            Err(e) => {
                warn!(uid, filename, "Failed to ingest attachment: {}", e);
                summary.attachments_failed += 1;
            }
        }
    }

    fn ingest_attachment(
        &self,
        attachment: &ImageAttachment<'_>,
        received: DateTime<Utc>,
    ) -> IngestResult<AttachmentOutcome> {
        let path = self.store.save(&attachment.filename, attachment.data)?;

        let text = match self.recognizer.recognize(&path) {
            Ok(text) => text,
            Err(e) => {
                warn!(filename = attachment.filename.as_str(), "OCR failed: {}", e);
                String::new()
            }
        };

        let tags = self.extract_tags(&text);

        let poster_id = self
            .db
            .insert_poster(&path.to_string_lossy(), &text, received)?;

        let mut tags_linked = 0;
        for tag in &tags {
            let linked = self
                .db
                .get_or_create_tag(tag)
                .and_then(|tag_id| self.db.link_poster_tag(poster_id, tag_id));
            match linked {
                Ok(true) => tags_linked += 1,
                Ok(false) => debug!(poster_id, tag = tag.as_str(), "Tag already linked"),
                Err(e) => warn!(poster_id, tag = tag.as_str(), "Failed to link tag: {}", e),
            }
        }

        Ok(AttachmentOutcome {
            poster_id,
            tags_linked,
        })
    }

    fn extract_tags(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        match self.tagger.extract_tags(text) {
            Ok(tags) => normalize_tags(tags),
            Err(e) => {
                warn!("Tag extraction failed, storing poster untagged: {}", e);
                Vec::new()
            }
        }
    }
}
