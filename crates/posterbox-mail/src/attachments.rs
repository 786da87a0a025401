//! Image attachment extraction from raw RFC 822 messages.

use crate::error::{MailError, MailResult};
use mail_parser::{Message, MessageParser, MessagePart, MimeHeaders, PartType};
use posterbox_core::ImageFormat;

/// A decoded image attachment borrowed from its parsed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment<'a> {
    /// Filename as declared by the sender.
    pub filename: String,
    pub format: ImageFormat,
    pub data: &'a [u8],
}

/// A parsed email message.
pub struct ParsedMessage<'a> {
    message: Message<'a>,
}

impl<'a> ParsedMessage<'a> {
    /// Parse raw message bytes as fetched from the server.
    pub fn parse(raw: &'a [u8]) -> MailResult<Self> {
        let message = MessageParser::default()
            .parse(raw)
            .ok_or_else(|| MailError::Parse("not a MIME message".to_string()))?;
        Ok(Self { message })
    }

    pub fn subject(&self) -> Option<&str> {
        self.message.subject()
    }

    /// Image attachments in message order, including those inside
    /// forwarded (`message/rfc822`) parts.
    ///
    /// The sequence is lazy and has no side effects.
    pub fn image_attachments(&self) -> impl Iterator<Item = ImageAttachment<'_>> + '_ {
        images_in(&self.message)
    }
}

type Images<'m> = Box<dyn Iterator<Item = ImageAttachment<'m>> + 'm>;

fn images_in<'m>(message: &'m Message<'_>) -> Images<'m> {
    Box::new(message.attachments().flat_map(|part| -> Images<'m> {
        match &part.body {
            PartType::Message(nested) => images_in(nested),
            PartType::Multipart(_) => Box::new(std::iter::empty()),
            _ => Box::new(as_image(part).into_iter()),
        }
    }))
}

fn as_image<'m>(part: &'m MessagePart<'_>) -> Option<ImageAttachment<'m>> {
    if let Some(content_type) = part.content_type() {
        let ctype = content_type.ctype();
        let is_octet_stream = ctype.eq_ignore_ascii_case("application")
            && content_type
                .subtype()
                .is_some_and(|sub| sub.eq_ignore_ascii_case("octet-stream"));
        if !ctype.eq_ignore_ascii_case("image") && !is_octet_stream {
            return None;
        }
    }

    let filename = part.attachment_name()?.trim();
    let format = ImageFormat::from_filename(filename)?;

    Some(ImageAttachment {
        filename: filename.to_string(),
        format,
        data: part.contents(),
    })
}
