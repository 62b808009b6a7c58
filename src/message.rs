//! Message struct with builder pattern.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::address::{Address, ToAddress};
use crate::attachment::Attachment;

/// One email, built once by the caller and handed read-only to a driver.
///
/// ```
/// use courier::Message;
///
/// let message = Message::new()
///     .from("sender@example.com")
///     .to(("Mr foo", "foo@bar.com"))
///     .cc("baz@bar.com")
///     .subject("Hello!")
///     .text("Plain text content")
///     .html("<h1>HTML content</h1>");
///
/// assert!(message.is_valid());
/// ```
///
/// ## Fields
///
/// - `from`, `to`, `cc`, `bcc`, `reply_to` - Addresses, in insertion order
/// - `subject`, `text`, `html` - Content
/// - `attachments` - File attachments
/// - `headers` - Custom headers
/// - `extras` - Per-send provider options; override the driver's configured extras
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    pub from: Option<Address>,
    pub to: Vec<Address>,
    pub cc: Vec<Address>,
    pub bcc: Vec<Address>,
    pub reply_to: Vec<Address>,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
    pub attachments: Vec<Attachment>,
    pub headers: BTreeMap<String, String>,
    pub extras: BTreeMap<String, String>,
}

impl Message {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sender.
    ///
    /// Accepts anything that implements `ToAddress`:
    /// - `"foo@bar.com"`
    /// - `("Mr foo", "foo@bar.com")`
    /// - custom types implementing `ToAddress`
    pub fn from(mut self, addr: impl ToAddress) -> Self {
        self.from = Some(addr.to_address());
        self
    }

    /// Add a recipient. Duplicates are kept.
    pub fn to(mut self, addr: impl ToAddress) -> Self {
        self.to.push(addr.to_address());
        self
    }

    /// Replace all recipients.
    pub fn put_to(mut self, addrs: Vec<Address>) -> Self {
        self.to = addrs;
        self
    }

    /// Add a CC recipient.
    pub fn cc(mut self, addr: impl ToAddress) -> Self {
        self.cc.push(addr.to_address());
        self
    }

    /// Replace all CC recipients.
    pub fn put_cc(mut self, addrs: Vec<Address>) -> Self {
        self.cc = addrs;
        self
    }

    /// Add a BCC recipient.
    pub fn bcc(mut self, addr: impl ToAddress) -> Self {
        self.bcc.push(addr.to_address());
        self
    }

    /// Replace all BCC recipients.
    pub fn put_bcc(mut self, addrs: Vec<Address>) -> Self {
        self.bcc = addrs;
        self
    }

    /// Add a reply-to address.
    pub fn reply_to(mut self, addr: impl ToAddress) -> Self {
        self.reply_to.push(addr.to_address());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Set the plain text body.
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.text = Some(body.into());
        self
    }

    /// Set the HTML body.
    pub fn html(mut self, body: impl Into<String>) -> Self {
        self.html = Some(body.into());
        self
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Add a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set a per-send provider option.
    ///
    /// Keys are passed to the provider verbatim, e.g. `o:campaign` or
    /// `v:user-id` for Mailgun. A key also present in the driver's configured
    /// extras takes this value.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Check if the message has a sender and at least one `to` recipient.
    pub fn is_valid(&self) -> bool {
        self.from.is_some() && !self.to.is_empty()
    }

    /// All recipients: to, then cc, then bcc.
    pub fn all_recipients(&self) -> impl Iterator<Item = &Address> {
        self.to.iter().chain(self.cc.iter()).chain(self.bcc.iter())
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// JSON view handed to drivers and loggers.
    ///
    /// Recipient roles are arrays of `{address, name}`; attachments are
    /// summarized as `{filename, content_type, size}`.
    pub fn to_json(&self) -> Value {
        let attachments: Vec<Value> = self
            .attachments
            .iter()
            .map(|a| {
                json!({
                    "filename": a.filename,
                    "content_type": a.content_type,
                    "size": a.get_size().unwrap_or(0),
                })
            })
            .collect();

        json!({
            "from": self.from,
            "to": self.to,
            "cc": self.cc,
            "bcc": self.bcc,
            "subject": self.subject,
            "html": self.html,
            "text": self.text,
            "attachments": attachments,
        })
    }
}
