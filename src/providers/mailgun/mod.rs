//! Mailgun API provider.
//!
//! For reference: [Mailgun MIME sending](https://documentation.mailgun.com/docs/mailgun/api-reference/openapi-final/tag/Messages/)
//!
//! # Example
//!
//! ```rust,ignore
//! use courier::providers::{MailgunConfig, MailgunMailer};
//!
//! let mailer = MailgunMailer::new(
//!     MailgunConfig::new("mg.yourdomain.com", "your-api-key").region("EU"),
//! )?;
//! ```
//!
//! ## Configuration
//!
//! * `domain` - Your sending domain (e.g., "mg.yourdomain.com")
//! * `api_key` - Your Mailgun API key
//! * `region` - Optional region code; `EU` sends through `api.eu.mailgun.net`
//! * `extras` - Provider options sent with every message
//!
//! ## Extras
//!
//! Extras are form fields passed verbatim next to the MIME body, so any
//! Mailgun option works: `o:tag`, `o:campaign`, `o:tracking`, `v:<var>`.
//! Per-message extras override configured ones with the same key:
//!
//! ```rust,ignore
//! let mailer = MailgunMailer::new(
//!     MailgunConfig::new("mg.example.com", key).extra("o:campaign", "marketing"),
//! )?;
//!
//! let message = Message::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .extra("o:campaign", "sales"); // sent as o:campaign=sales
//! ```

mod config;
mod endpoint;
mod extras;
mod mime;
mod recipients;

pub use config::MailgunConfig;
pub use endpoint::{build_endpoint, RegionTable};
pub use extras::merge_extras;
pub use recipients::{envelope_recipients, format_recipients};

use async_trait::async_trait;
use base64::Engine;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::MailError;
use crate::mailer::{Mailer, MailerExt, SendResult};
use crate::message::Message;

/// Mailgun API driver.
///
/// Holds only immutable config and a pooled HTTP client, so one instance can
/// serve concurrent sends.
pub struct MailgunMailer {
    config: MailgunConfig,
    client: Client,
}

impl std::fmt::Debug for MailgunMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailgunMailer")
            .field("domain", &self.config.domain)
            .field("region", &self.config.region)
            .field("endpoint", &self.endpoint())
            .finish_non_exhaustive()
    }
}

impl MailgunMailer {
    /// Create a driver, rejecting an empty domain or API key up front.
    pub fn new(config: MailgunConfig) -> Result<Self, MailError> {
        Self::with_client(config, Client::new())
    }

    /// Create with a custom reqwest client (timeouts, proxies).
    pub fn with_client(config: MailgunConfig, client: Client) -> Result<Self, MailError> {
        config.validate()?;
        Ok(Self { config, client })
    }

    /// Build from `MAILGUN_*` environment variables.
    pub fn from_env() -> Result<Self, MailError> {
        Self::new(MailgunConfig::from_env()?)
    }

    /// Replace the configuration. The old one stays in place if validation fails.
    pub fn set_config(&mut self, config: MailgunConfig) -> Result<(), MailError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &MailgunConfig {
        &self.config
    }

    /// The `messages.mime` URL for the configured domain and region.
    pub fn endpoint(&self) -> String {
        self.config.endpoint()
    }

    /// Configured extras overlaid with `per_send`.
    pub fn extras(&self, per_send: Option<&BTreeMap<String, String>>) -> BTreeMap<String, String> {
        merge_extras(&self.config.extras, per_send)
    }

    fn auth_header(&self) -> String {
        let credentials = format!("api:{}", self.config.api_key);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
        format!("Basic {}", encoded)
    }

    fn build_form(&self, message: &Message, recipients: String) -> Result<Form, MailError> {
        let raw = mime::build_mime(message)?;

        let mut form = Form::new().text("to", recipients).part(
            "message",
            Part::bytes(raw)
                .file_name("message.mime")
                .mime_str("message/rfc822")?,
        );

        // Custom headers
        for (name, value) in &message.headers {
            form = form.text(format!("h:{}", name), value.clone());
        }

        for (key, value) in self.extras(Some(&message.extras)) {
            form = form.text(key, value);
        }

        Ok(form)
    }
}

/// Mailgun wraps ids in angle brackets; callers get the bare id.
fn normalize_message_id(id: &str) -> String {
    id.trim().trim_start_matches('<').trim_end_matches('>').to_string()
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let mut message = format!("Response code {}", status.as_u16());
    if let Some(reason) = status.canonical_reason() {
        message.push_str(&format!(" ({})", reason));
    }

    let detail = serde_json::from_str::<MailgunError>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.trim().to_string());
    if !detail.is_empty() {
        message.push_str(": ");
        message.push_str(&detail);
    }
    message
}

#[async_trait]
impl Mailer for MailgunMailer {
    async fn send(&self, message: &Message) -> Result<SendResult, MailError> {
        self.validate(message)?;

        let recipients = envelope_recipients(message).ok_or(MailError::MissingField("to"))?;
        let recipient_count = message.all_recipients().count();
        let form = self.build_form(message, recipients)?;
        let url = self.endpoint();

        tracing::debug!(
            endpoint = %url,
            recipients = recipient_count,
            attachments = message.attachments.len(),
            "Sending message via Mailgun"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .header("User-Agent", format!("courier/{}", crate::VERSION))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let result: MailgunResponse = response.json().await?;
            Ok(
                SendResult::accepted(normalize_message_id(&result.id), recipient_count)
                    .with_response(serde_json::json!({
                        "provider": "mailgun",
                        "id": result.id,
                        "message": result.message,
                    })),
            )
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(MailError::provider_with_status(
                "mailgun",
                error_message(status, &body),
                status.as_u16(),
            ))
        }
    }

    fn provider_name(&self) -> &'static str {
        "mailgun"
    }

    fn validate_config(&self) -> Result<(), MailError> {
        self.config.validate()
    }
}

// ============================================================================
// Mailgun API Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct MailgunResponse {
    id: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct MailgunError {
    message: String,
}
