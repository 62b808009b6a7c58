//! # Courier
//!
//! Build a message once, send it through any provider driver.
//!
//! ## Quick Start
//!
//! Set environment variables:
//! ```bash
//! EMAIL_PROVIDER=mailgun
//! MAILGUN_DOMAIN=mg.example.com
//! MAILGUN_API_KEY=key-xxxxx
//! EMAIL_FROM=noreply@example.com
//! ```
//!
//! Send from anywhere:
//! ```rust,ignore
//! use courier::{Message, send};
//!
//! let message = Message::new()
//!     .to(("Mr foo", "foo@bar.com"))
//!     .subject("Welcome!")
//!     .html("<h2>Hello</h2>");
//!
//! let result = send(&message).await?;
//! assert_eq!(result.accepted_count, 1);
//! ```
//!
//! ## Per-Call Driver Override
//!
//! ```rust,ignore
//! use courier::{Message, send_with};
//! use courier::providers::{MailgunConfig, MailgunMailer};
//!
//! let mailer = MailgunMailer::new(MailgunConfig::new("mg.other.com", "other-key"))?;
//! send_with(&message, &mailer).await?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `EMAIL_PROVIDER` | `mailgun`, `logger`, `logger_full` (auto-detected when unset) |
//! | `EMAIL_FROM` | Default sender address |
//! | `EMAIL_FROM_NAME` | Default sender name |
//! | `MAILGUN_DOMAIN` | Mailgun sending domain |
//! | `MAILGUN_API_KEY` | Mailgun API key |
//! | `MAILGUN_REGION` | Mailgun region code, e.g. `EU` (optional) |
//! | `MAILGUN_BASE_URL` | Override the Mailgun API origin (optional) |
//!
//! ## Feature Flags
//!
//! - `mailgun` (default) - Mailgun driver

/// The version of the courier crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod address;
mod attachment;
mod error;
mod mailer;
mod message;

pub mod providers;

use parking_lot::RwLock;
use std::env;
use std::sync::Arc;
use tracing::Instrument;

// Re-exports
pub use address::{Address, ToAddress};
pub use attachment::{Attachment, AttachmentType};
pub use error::MailError;
pub use mailer::{Mailer, MailerExt, SendResult};
pub use message::Message;

// ============================================================================
// Global Driver Configuration
// ============================================================================

/// Global driver - swappable for testing
static MAILER: RwLock<Option<Arc<dyn Mailer>>> = RwLock::new(None);

/// Default sender from `EMAIL_FROM` / `EMAIL_FROM_NAME`.
pub fn default_from() -> Option<Address> {
    let address = env::var("EMAIL_FROM").ok()?;
    match env::var("EMAIL_FROM_NAME").ok() {
        Some(name) => Some(Address::with_name(name, address)),
        None => Some(Address::new(address)),
    }
}

/// Pick a provider from the credentials present in the environment.
fn detect_provider() -> Option<&'static str> {
    #[cfg(feature = "mailgun")]
    if env::var("MAILGUN_API_KEY").is_ok() && env::var("MAILGUN_DOMAIN").is_ok() {
        return Some("mailgun");
    }
    None
}

fn selected_provider() -> Option<String> {
    match env::var("EMAIL_PROVIDER") {
        Ok(p) => Some(p.to_lowercase()),
        Err(_) => detect_provider().map(|p| {
            tracing::debug!(provider = p, "Auto-detected mail provider");
            p.to_string()
        }),
    }
}

/// Create a driver from environment variables.
fn create_mailer_from_env() -> Result<Arc<dyn Mailer>, MailError> {
    let provider = selected_provider().ok_or_else(|| {
        MailError::Configuration(
            "EMAIL_PROVIDER not set and could not auto-detect. \
            Set EMAIL_PROVIDER or configure MAILGUN_DOMAIN and MAILGUN_API_KEY."
                .into(),
        )
    })?;

    match provider.as_str() {
        #[cfg(feature = "mailgun")]
        "mailgun" => Ok(Arc::new(providers::MailgunMailer::from_env()?)),
        #[cfg(not(feature = "mailgun"))]
        "mailgun" => Err(MailError::Configuration(
            "EMAIL_PROVIDER=mailgun but 'mailgun' feature is not enabled. \
            Add `features = [\"mailgun\"]` to Cargo.toml"
                .into(),
        )),

        "logger" => Ok(Arc::new(providers::LoggerMailer::new())),
        "logger_full" => Ok(Arc::new(providers::LoggerMailer::full())),

        _ => Err(MailError::Configuration(format!(
            "Unknown EMAIL_PROVIDER: {}. Valid providers are: mailgun, logger, logger_full",
            provider
        ))),
    }
}

/// Get or initialize the global driver.
fn get_mailer() -> Result<Arc<dyn Mailer>, MailError> {
    // Fast path: already configured
    if let Some(ref mailer) = *MAILER.read() {
        return Ok(Arc::clone(mailer));
    }

    let mailer = create_mailer_from_env()?;
    let mut guard = MAILER.write();

    // Another caller may have won the race.
    Ok(Arc::clone(guard.get_or_insert(mailer)))
}

/// Check whether the environment selects a usable driver.
///
/// Logs a warning if the provider is named but its feature is disabled.
pub fn is_configured() -> bool {
    let provider = match selected_provider() {
        Some(p) => p,
        None => return false,
    };

    match provider.as_str() {
        #[cfg(feature = "mailgun")]
        "mailgun" => env::var("MAILGUN_API_KEY").is_ok() && env::var("MAILGUN_DOMAIN").is_ok(),
        #[cfg(not(feature = "mailgun"))]
        "mailgun" => {
            tracing::warn!(
                "EMAIL_PROVIDER=mailgun but 'mailgun' feature is not enabled. \
                Add `features = [\"mailgun\"]` to Cargo.toml"
            );
            false
        }

        "logger" | "logger_full" => true,

        _ => false,
    }
}

/// Initialize the global driver from environment variables.
///
/// Call at startup to surface configuration errors before the first send.
///
/// ```rust,ignore
/// courier::init()?;
/// ```
pub fn init() -> Result<(), MailError> {
    if !is_configured() {
        return Err(MailError::NotConfigured);
    }
    let mailer = get_mailer()?;
    mailer.validate_config()
}

/// Validate a message has required fields.
fn validate(message: &Message) -> Result<(), MailError> {
    if message.from.is_none() && default_from().is_none() {
        return Err(MailError::MissingField("from"));
    }
    if message.to.is_empty() {
        return Err(MailError::MissingField("to"));
    }
    Ok(())
}

/// Fill in the default sender if the message has none.
fn prepare_message(message: &Message) -> Message {
    let mut message = message.clone();
    if message.from.is_none() {
        message.from = default_from();
    }
    message
}

/// Callers run [`validate`] first.
async fn send_via(message: &Message, mailer: &dyn Mailer) -> Result<SendResult, MailError> {
    let provider = mailer.provider_name();
    let message = prepare_message(message);

    let span = tracing::info_span!(
        "courier.send",
        provider = provider,
        to = ?message.to.iter().map(|a| &a.address).collect::<Vec<_>>(),
        subject = %message.subject,
    );

    async {
        tracing::debug!("Sending message");

        let result = mailer.send(&message).await;

        match &result {
            Ok(r) => tracing::info!(
                message_id = %r.message_id,
                accepted = r.accepted_count,
                rejected = r.rejected_count,
                "Message sent"
            ),
            Err(e) => tracing::error!(error = %e, "Message send failed"),
        }

        result
    }
    .instrument(span)
    .await
}

/// Send a message using the global driver.
///
/// Auto-configures from environment variables on first call, validates
/// `from`/`to`, and fills `from` from `EMAIL_FROM` when missing.
///
/// ```rust,ignore
/// use courier::{Message, send};
///
/// let message = Message::new()
///     .to("user@example.com")
///     .subject("Hello!")
///     .text("Hi there");
///
/// send(&message).await?;
/// ```
pub async fn send(message: &Message) -> Result<SendResult, MailError> {
    validate(message)?;
    let mailer = get_mailer()?;
    send_via(message, mailer.as_ref()).await
}

/// Send a message using a specific driver (per-call override).
pub async fn send_with<M: Mailer>(message: &Message, mailer: &M) -> Result<SendResult, MailError> {
    validate(message)?;
    send_via(message, mailer).await
}

/// Send several messages using the global driver.
pub async fn send_many(messages: &[Message]) -> Result<Vec<SendResult>, MailError> {
    for message in messages {
        validate(message)?;
    }

    let mailer = get_mailer()?;
    let provider = mailer.provider_name();
    let messages: Vec<Message> = messages.iter().map(prepare_message).collect();

    let span = tracing::info_span!("courier.send_many", provider = provider, count = messages.len());

    mailer.send_many(&messages).instrument(span).await
}

// ============================================================================
// Manual Configuration (for testing or custom setups)
// ============================================================================

/// Set the global driver used by [`send`]. Later calls replace earlier ones.
///
/// ```rust,ignore
/// use courier::{configure, providers::LoggerMailer};
///
/// configure(LoggerMailer::new());
/// ```
pub fn configure<M: Mailer + 'static>(mailer: M) {
    *MAILER.write() = Some(Arc::new(mailer));
}

/// Configure with an Arc'd driver.
pub fn configure_arc(mailer: Arc<dyn Mailer>) {
    *MAILER.write() = Some(mailer);
}

/// Drop the global driver; the next [`send`] re-reads the environment.
pub fn reset() {
    *MAILER.write() = None;
}

/// The configured global driver, if initialized.
pub fn mailer() -> Option<Arc<dyn Mailer>> {
    MAILER.read().as_ref().cloned()
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::Address;
    pub use crate::Attachment;
    pub use crate::MailError;
    pub use crate::Mailer;
    pub use crate::Message;
    pub use crate::SendResult;
    pub use crate::ToAddress;
    pub use crate::{default_from, is_configured, send, send_many, send_with};
}
