//! Recipient list encoding for Mailgun's `to` field.

use crate::address::Address;
use crate::message::Message;

/// Encode one role's recipients as `Name <address>` / `address` entries
/// joined with `,` in input order.
///
/// Returns `None` for an empty list so the field can be left out of the
/// request. Addresses are not validated.
///
/// ```
/// use courier::Address;
/// use courier::providers::format_recipients;
///
/// let to = vec![Address::with_name("Mr foo", "foo@bar.com"), Address::new("baz@bar.com")];
/// assert_eq!(format_recipients(&to).as_deref(), Some("Mr foo <foo@bar.com>,baz@bar.com"));
/// assert_eq!(format_recipients(&[]), None);
/// ```
pub fn format_recipients(recipients: &[Address]) -> Option<String> {
    if recipients.is_empty() {
        return None;
    }

    Some(
        recipients
            .iter()
            .map(Address::formatted)
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// Every recipient of `message`: the non-empty of to, cc and bcc, each
/// formatted with [`format_recipients`] and joined with `,` in that order.
pub fn envelope_recipients(message: &Message) -> Option<String> {
    let roles: Vec<String> = [&message.to, &message.cc, &message.bcc]
        .into_iter()
        .filter_map(|role| format_recipients(role))
        .collect();

    if roles.is_empty() {
        None
    } else {
        Some(roles.join(","))
    }
}
