//! Raw MIME assembly for `messages.mime`.
//!
//! Mailgun's MIME endpoint takes a complete RFC 5322 message plus the
//! envelope recipients as a separate form field, so the Bcc role never
//! appears in the headers built here.
//!
//! Recipients are passed through as given. A role with an address lettre
//! cannot parse is written as a raw header from [`format_recipients`] and
//! left for Mailgun to judge. The sender must parse, since lettre requires
//! a typed `From`.

use lettre::address::Envelope;
use lettre::message::header::{ContentType, HeaderName, HeaderValue};
use lettre::message::{
    Attachment as MimeAttachment, Mailbox, MessageBuilder, MultiPart, SinglePart,
};

use super::recipients::format_recipients;
use crate::address::Address;
use crate::attachment::Attachment;
use crate::error::MailError;
use crate::message::Message;

/// Render `message` to raw MIME bytes.
pub(crate) fn build_mime(message: &Message) -> Result<Vec<u8>, MailError> {
    let from = message
        .from
        .as_ref()
        .ok_or(MailError::MissingField("from"))?;
    let sender = mailbox(from)?;

    // Only the formatted bytes are sent, so the SMTP envelope lettre insists
    // on is the sender alone.
    let envelope = Envelope::new(Some(sender.email.clone()), vec![sender.email.clone()])?;

    let mut builder = lettre::Message::builder()
        .envelope(envelope)
        .from(sender)
        .subject(message.subject.clone());

    builder = address_header(builder, "To", &message.to, MessageBuilder::to);
    builder = address_header(builder, "Cc", &message.cc, MessageBuilder::cc);
    builder = address_header(builder, "Reply-To", &message.reply_to, MessageBuilder::reply_to);

    let content = content_part(message);

    let mime = if message.attachments.is_empty() {
        match content {
            Content::Single(part) => builder.singlepart(part)?,
            Content::Alternative(parts) => builder.multipart(parts)?,
        }
    } else {
        let mut mixed = match content {
            Content::Single(part) => MultiPart::mixed().singlepart(part),
            Content::Alternative(parts) => MultiPart::mixed().multipart(parts),
        };
        for attachment in &message.attachments {
            mixed = mixed.singlepart(attachment_part(attachment)?);
        }
        builder.multipart(mixed)?
    };

    Ok(mime.formatted())
}

/// Add one address header: typed when every address parses, raw otherwise.
fn address_header(
    builder: MessageBuilder,
    name: &'static str,
    addrs: &[Address],
    add: fn(MessageBuilder, Mailbox) -> MessageBuilder,
) -> MessageBuilder {
    match addrs.iter().map(|a| mailbox(a).ok()).collect::<Option<Vec<_>>>() {
        Some(mailboxes) => mailboxes.into_iter().fold(builder, add),
        None => {
            tracing::debug!(header = name, "Passing unparsed addresses through as raw header");
            match format_recipients(addrs) {
                Some(value) => {
                    builder.raw_header(HeaderValue::new(HeaderName::new_from_ascii_str(name), value))
                }
                None => builder,
            }
        }
    }
}

enum Content {
    Single(SinglePart),
    Alternative(MultiPart),
}

fn content_part(message: &Message) -> Content {
    match (&message.text, &message.html) {
        (Some(text), Some(html)) => {
            Content::Alternative(MultiPart::alternative_plain_html(text.clone(), html.clone()))
        }
        (None, Some(html)) => Content::Single(SinglePart::html(html.clone())),
        (Some(text), None) => Content::Single(SinglePart::plain(text.clone())),
        (None, None) => Content::Single(SinglePart::plain(String::new())),
    }
}

fn attachment_part(attachment: &Attachment) -> Result<SinglePart, MailError> {
    let data = attachment
        .get_data()
        .map_err(|e| MailError::AttachmentError(format!("{}: {}", attachment.filename, e)))?;

    let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
        MailError::AttachmentError(format!("{}: {}", attachment.filename, e))
    })?;

    let part = match (attachment.is_inline(), &attachment.content_id) {
        (true, Some(cid)) => MimeAttachment::new_inline(cid.clone()),
        _ => MimeAttachment::new(attachment.filename.clone()),
    };

    Ok(part.body(data, content_type))
}

fn mailbox(addr: &Address) -> Result<Mailbox, MailError> {
    let email: lettre::Address = addr.address.parse()?;
    Ok(Mailbox::new(addr.display_name().map(str::to_string), email))
}
