//! The one error type every driver returns.
//!
//! Failures fall into three groups. Configuration errors are raised before
//! anything is sent. Transport errors mean no response arrived. Provider
//! errors carry whatever the provider said. Nothing here is retried; the
//! caller decides.

use thiserror::Error;

/// A failed send, or a driver that cannot send at all.
#[derive(Debug, Clone, Error)]
pub enum MailError {
    /// No driver is set and the environment selects none.
    #[error("Mail driver not configured")]
    NotConfigured,

    /// Rejected driver settings, e.g. an empty Mailgun domain or API key.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The message lacks a sender or a `to` recipient.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// An address that had to be parsed and could not be.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// An attachment could not be turned into a MIME part.
    #[error("Attachment error: {0}")]
    AttachmentError(String),

    /// Zero bytes and no backing file.
    #[error("Attachment has no content: {0}")]
    AttachmentMissingContent(String),

    #[error("Attachment file not found: {0}")]
    AttachmentFileNotFound(String),

    /// A lazy attachment's file exists but could not be read.
    #[error("Failed to read attachment: {0}")]
    AttachmentReadError(String),

    /// The raw MIME body could not be assembled.
    #[error("Build error: {0}")]
    BuildError(String),

    /// Provider rejected the request. `message` carries the provider's
    /// diagnostic text unchanged.
    #[error("Provider error ({provider}): {message}")]
    ProviderError {
        provider: &'static str,
        message: String,
        /// HTTP status code, when the provider answered at all
        status: Option<u16>,
    },

    /// The HTTP exchange itself failed, or a success body could not be decoded.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// A JSON payload could not be encoded or decoded.
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl MailError {
    /// Provider error without an HTTP status.
    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider,
            message: message.into(),
            status: None,
        }
    }

    /// Provider error for a non-2xx response.
    pub fn provider_with_status(
        provider: &'static str,
        message: impl Into<String>,
        status: u16,
    ) -> Self {
        Self::ProviderError {
            provider,
            message: message.into(),
            status: Some(status),
        }
    }

    /// HTTP status attached to a provider error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ProviderError { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(feature = "_http")]
impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for MailError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

#[cfg(feature = "mailgun")]
impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        Self::BuildError(err.to_string())
    }
}

#[cfg(feature = "mailgun")]
impl From<lettre::address::AddressError> for MailError {
    fn from(err: lettre::address::AddressError) -> Self {
        Self::InvalidAddress(err.to_string())
    }
}
