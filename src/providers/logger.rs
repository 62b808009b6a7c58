//! Logger mailer that only logs messages.
//!
//! Useful for staging environments or when you want to see what would be sent
//! without talking to a provider.

use async_trait::async_trait;

use crate::error::MailError;
use crate::mailer::{Mailer, MailerExt, SendResult};
use crate::message::Message;

/// Logger mailer that emits tracing events for messages.
pub struct LoggerMailer {
    /// If true, log every field. If false, just recipients and subject.
    log_full: bool,
}

impl LoggerMailer {
    /// Create a logger mailer with brief output (just recipients).
    pub fn new() -> Self {
        Self { log_full: false }
    }

    /// Create a logger mailer with full message details.
    pub fn full() -> Self {
        Self { log_full: true }
    }

    pub fn log_full(mut self, full: bool) -> Self {
        self.log_full = full;
        self
    }
}

impl Default for LoggerMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for LoggerMailer {
    async fn send(&self, message: &Message) -> Result<SendResult, MailError> {
        self.validate(message)?;

        let message_id = uuid::Uuid::new_v4().to_string();

        if self.log_full {
            tracing::info!(
                message_id = %message_id,
                content = %message.to_json(),
                extras = ?message.extras,
                headers = ?message.headers,
                "Message logged (full)"
            );

            if let Some(ref text) = message.text {
                tracing::debug!(body = %text, "Text body");
            }
            if let Some(ref html) = message.html {
                tracing::debug!(body = %html, "HTML body");
            }
        } else {
            tracing::info!(
                message_id = %message_id,
                to = ?message.to.iter().map(|a| &a.address).collect::<Vec<_>>(),
                subject = %message.subject,
                "Message logged"
            );
        }

        Ok(SendResult::accepted(
            message_id,
            message.all_recipients().count(),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "logger"
    }
}
