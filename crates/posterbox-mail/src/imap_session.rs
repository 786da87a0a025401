//! IMAP implementation of the mailbox session.
//!
//! `ImapConnection` is an authenticated connection with no mailbox selected;
//! selecting a mailbox turns it into an `ImapMailbox`, which is the only
//! state where unseen messages can be listed.

use crate::error::{MailError, MailResult};
use crate::session::{MailboxSession, MessageUid};
use posterbox_config::MailCredentials;
use std::net::TcpStream;
use tracing::{debug, info, warn};

type ImapSession = imap::Session<native_tls::TlsStream<TcpStream>>;

/// Unseen messages that no earlier pass has flagged `\Deleted`; a flagged
/// message is already in the processed folder even if it was never expunged.
const PENDING_QUERY: &str = "UNSEEN UNDELETED";

/// An authenticated IMAP connection.
pub struct ImapConnection {
    session: ImapSession,
    server: String,
}

impl ImapConnection {
    /// Connect over TLS and log in. No retry is attempted.
    pub fn connect(server: &str, port: u16, credentials: &MailCredentials) -> MailResult<Self> {
        let tls = native_tls::TlsConnector::builder()
            .build()
            .map_err(|e| MailError::Connectivity(format!("failed to build TLS connector: {e}")))?;

        debug!("Connecting to {}:{}", server, port);
        let client = imap::connect((server, port), server, &tls).map_err(|e| {
            MailError::Connectivity(format!("failed to connect to {server}:{port}: {e}"))
        })?;

        let session = client
            .login(&credentials.account, &credentials.password)
            .map_err(|(e, _client)| match e {
                imap::Error::No(message) | imap::Error::Bad(message) => {
                    MailError::Authentication(message)
                }
                other => MailError::Connectivity(other.to_string()),
            })?;

        info!("Logged in to {} as {}", server, credentials.account);

        Ok(Self {
            session,
            server: server.to_string(),
        })
    }

    /// Select `inbox`; processed messages will be copied to `processed_folder`.
    /// On failure the connection is logged out before the error is returned.
    pub fn select(mut self, inbox: &str, processed_folder: &str) -> MailResult<ImapMailbox> {
        let mailbox = match self.session.select(inbox) {
            Ok(mailbox) => mailbox,
            Err(e) => {
                if let Err(logout_err) = self.session.logout() {
                    warn!("Logout from {} failed: {}", self.server, logout_err);
                }
                return Err(MailError::Folder {
                    name: inbox.to_string(),
                    message: e.to_string(),
                });
            }
        };

        debug!("Selected {} ({} messages)", inbox, mailbox.exists);

        Ok(ImapMailbox {
            session: self.session,
            server: self.server,
            processed_folder: processed_folder.to_string(),
        })
    }
}

/// An IMAP session with a mailbox selected.
pub struct ImapMailbox {
    session: ImapSession,
    server: String,
    processed_folder: String,
}

impl MailboxSession for ImapMailbox {
    fn ensure_folder_exists(&mut self, name: &str) -> MailResult<()> {
        ensure_folder(&mut self.session, name)
    }

    fn list_unseen(&mut self) -> MailResult<Vec<MessageUid>> {
        let uids = self
            .session
            .uid_search(PENDING_QUERY)
            .map_err(|e| MailError::Search(e.to_string()))?;

        let mut uids: Vec<MessageUid> = uids.into_iter().collect();
        uids.sort_unstable();
        Ok(uids)
    }

    fn fetch_raw(&mut self, uid: MessageUid) -> MailResult<Vec<u8>> {
        // BODY.PEEK leaves \Seen untouched, so a message we fail on stays unseen.
        let fetches = self
            .session
            .uid_fetch(uid.to_string(), "BODY.PEEK[]")
            .map_err(|e| MailError::Fetch {
                uid,
                message: e.to_string(),
            })?;

        fetches
            .iter()
            .find_map(|fetch| fetch.body())
            .map(<[u8]>::to_vec)
            .ok_or_else(|| MailError::Fetch {
                uid,
                message: "message no longer exists".to_string(),
            })
    }

    fn mark_processed(&mut self, uid: MessageUid) -> MailResult<()> {
        let uid_set = uid.to_string();

        self.session
            .uid_copy(&uid_set, &self.processed_folder)
            .map_err(|e| MailError::Disposition {
                uid,
                message: format!("copy to '{}' failed: {e}", self.processed_folder),
            })?;

        self.session
            .uid_store(&uid_set, "+FLAGS (\\Deleted)")
            .map_err(|e| MailError::Disposition {
                uid,
                message: format!("flagging deleted failed: {e}"),
            })?;

        Ok(())
    }

    fn finalize(mut self) -> MailResult<()> {
        let expunged = self.session.expunge().map(|_| ());
        if let Err(e) = &expunged {
            warn!("Expunge on {} failed: {}", self.server, e);
        }

        if let Err(e) = self.session.logout() {
            warn!("Logout from {} failed: {}", self.server, e);
        }

        expunged.map_err(|e| MailError::Finalize(e.to_string()))
    }
}

fn ensure_folder(session: &mut ImapSession, name: &str) -> MailResult<()> {
    if folder_exists(session, name)? {
        return Ok(());
    }

    info!("Creating folder '{}'", name);
    match session.create(name) {
        Ok(()) => Ok(()),
        Err(e) => {
            let listed = folder_names(session, name)?;
            after_failed_create(name, &e.to_string(), listed.iter().map(String::as_str))
        }
    }
}

fn folder_exists(session: &mut ImapSession, name: &str) -> MailResult<bool> {
    let listed = folder_names(session, name)?;
    Ok(listed.iter().any(|folder| folder_matches(folder, name)))
}

fn folder_names(session: &mut ImapSession, name: &str) -> MailResult<Vec<String>> {
    let names = session
        .list(Some(""), Some("*"))
        .map_err(|e| MailError::Folder {
            name: name.to_string(),
            message: e.to_string(),
        })?;

    Ok(names.iter().map(|folder| folder.name().to_string()).collect())
}

/// Decide the outcome of a failed CREATE from a fresh folder listing.
/// Another client may have created the folder between LIST and CREATE,
/// in which case the folder exists and that is success.
fn after_failed_create<'n>(
    name: &str,
    create_error: &str,
    listed: impl IntoIterator<Item = &'n str>,
) -> MailResult<()> {
    if listed.into_iter().any(|folder| folder_matches(folder, name)) {
        debug!("Folder '{}' appeared concurrently: {}", name, create_error);
        Ok(())
    } else {
        Err(MailError::Folder {
            name: name.to_string(),
            message: create_error.to_string(),
        })
    }
}

/// IMAP treats INBOX case-insensitively; every other name is exact.
fn folder_matches(listed: &str, wanted: &str) -> bool {
    if wanted.eq_ignore_ascii_case("INBOX") {
        listed.eq_ignore_ascii_case("INBOX")
    } else {
        listed == wanted
    }
}
