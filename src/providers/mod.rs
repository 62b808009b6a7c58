//! Mail driver implementations.
//!
//! Each driver implements the [`Mailer`](crate::Mailer) trait.
//!
//! ## Available Drivers
//!
//! | Driver | Feature Flag | Description |
//! |----------|-------------|-------------|
//! | [`MailgunMailer`] | `mailgun` | Mailgun `messages.mime` API |
//! | [`LoggerMailer`] | (none) | Logs messages without sending |

#[cfg(feature = "mailgun")]
mod mailgun;
#[cfg(feature = "mailgun")]
pub use mailgun::{
    build_endpoint, envelope_recipients, format_recipients, merge_extras, MailgunConfig,
    MailgunMailer, RegionTable,
};

mod logger;
pub use logger::LoggerMailer;
