//! Mailer trait and send result types.
//!
//! `#[async_trait]` is used instead of native async traits because the crate
//! keeps drivers behind `Arc<dyn Mailer>` (see the global driver in the crate
//! root), and native async trait methods are not object-safe.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MailError;
use crate::message::Message;

/// Normalized result of a successful send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResult {
    /// Message ID assigned by the provider
    pub message_id: String,
    /// Recipients the provider accepted
    pub accepted_count: usize,
    /// Recipients the provider rejected
    pub rejected_count: usize,
    /// Raw provider response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_response: Option<serde_json::Value>,
}

impl SendResult {
    /// A result where every recipient was accepted.
    pub fn accepted(message_id: impl Into<String>, accepted_count: usize) -> Self {
        Self {
            message_id: message_id.into(),
            accepted_count,
            rejected_count: 0,
            provider_response: None,
        }
    }

    /// Attach the provider's response body.
    pub fn with_response(mut self, response: serde_json::Value) -> Self {
        self.provider_response = Some(response);
        self
    }
}

/// A provider driver.
///
/// ```ignore
/// use courier::{Mailer, Message};
/// use courier::providers::{MailgunConfig, MailgunMailer};
///
/// let mailer = MailgunMailer::new(MailgunConfig::new("mg.example.com", "key-xxx"))?;
///
/// let message = Message::new()
///     .from("sender@example.com")
///     .to("recipient@example.com")
///     .subject("Hello")
///     .text("World");
///
/// let result = mailer.send(&message).await?;
/// println!("Sent with ID: {}", result.message_id);
/// ```
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a single message. Exactly one provider call; no retries.
    async fn send(&self, message: &Message) -> Result<SendResult, MailError>;

    /// Send several messages one after another, stopping at the first failure.
    async fn send_many(&self, messages: &[Message]) -> Result<Vec<SendResult>, MailError> {
        let mut results = Vec::with_capacity(messages.len());
        for message in messages {
            results.push(self.send(message).await?);
        }
        Ok(results)
    }

    /// Provider name (for logging).
    fn provider_name(&self) -> &'static str {
        "unknown"
    }

    /// Check required configuration is present.
    fn validate_config(&self) -> Result<(), MailError> {
        Ok(())
    }
}

/// Extension trait for optional mailer operations.
pub trait MailerExt: Mailer {
    /// Check a message has the fields every driver needs.
    fn validate(&self, message: &Message) -> Result<(), MailError> {
        if message.from.is_none() {
            return Err(MailError::MissingField("from"));
        }
        if message.to.is_empty() {
            return Err(MailError::MissingField("to"));
        }
        Ok(())
    }
}

impl<T: Mailer> MailerExt for T {}
