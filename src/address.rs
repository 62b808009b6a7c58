//! Recipient/sender address with optional display name.

use crate::error::MailError;
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An email address with an optional display name.
///
/// Addresses are trusted as given: [`Address::new`] and
/// [`Address::with_name`] never reject input. Use [`Address::parse`] when the
/// caller wants strict validation.
///
/// # Examples
///
/// ```
/// use courier::Address;
///
/// let addr: Address = "foo@bar.com".into();
/// assert_eq!(addr.address, "foo@bar.com");
/// assert_eq!(addr.name, None);
///
/// let addr: Address = ("Mr foo", "foo@bar.com").into();
/// assert_eq!(addr.formatted(), "Mr foo <foo@bar.com>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Email address (e.g., "foo@bar.com")
    pub address: String,
    /// Optional display name (e.g., "Mr foo")
    pub name: Option<String>,
}

impl Address {
    /// Create an address without a display name.
    ///
    /// Logs a warning for obviously malformed input but keeps it as-is.
    pub fn new(address: impl Into<String>) -> Self {
        let address = address.into();

        if !Self::basic_sanity_check(&address) {
            tracing::warn!(
                address = %address,
                "Creating address with potentially invalid email. Use Address::parse() for strict validation."
            );
        }

        Self {
            address,
            name: None,
        }
    }

    /// Create an address with a display name.
    pub fn with_name(name: impl Into<String>, address: impl Into<String>) -> Self {
        let address = address.into();

        if !Self::basic_sanity_check(&address) {
            tracing::warn!(
                address = %address,
                "Creating address with potentially invalid email. Use Address::parse_with_name() for strict validation."
            );
        }

        Self {
            address,
            name: Some(name.into()),
        }
    }

    // Non-empty and contains @. Not a validator.
    fn basic_sanity_check(address: &str) -> bool {
        !address.is_empty() && address.contains('@')
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parse and validate an email address (RFC 5321/5322).
    ///
    /// ```
    /// use courier::Address;
    ///
    /// assert!(Address::parse("user@example.com").is_ok());
    /// assert!(Address::parse("not-an-email").is_err());
    /// ```
    pub fn parse(address: &str) -> Result<Self, MailError> {
        Self::parse_with_name("", address)
    }

    /// Parse and validate an email address with a display name.
    ///
    /// An empty name is treated as no name.
    pub fn parse_with_name(name: &str, address: &str) -> Result<Self, MailError> {
        if !EmailAddress::is_valid(address) {
            return Err(MailError::InvalidAddress(format!(
                "'{}' is not a valid email address",
                address
            )));
        }

        Ok(Self {
            address: address.to_string(),
            name: if name.is_empty() {
                None
            } else {
                Some(name.to_string())
            },
        })
    }

    /// Display name, treating an empty name as absent.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Format as `Name <address>`, or the bare address if there is no name.
    ///
    /// No quoting or escaping is applied.
    pub fn formatted(&self) -> String {
        match self.display_name() {
            Some(name) => format!("{} <{}>", name, self.address),
            None => self.address.clone(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Address {
    fn from(address: String) -> Self {
        Self::new(address)
    }
}

// (name, address)
impl From<(&str, &str)> for Address {
    fn from((name, address): (&str, &str)) -> Self {
        Self::with_name(name, address)
    }
}

impl From<(String, String)> for Address {
    fn from((name, address): (String, String)) -> Self {
        Self::with_name(name, address)
    }
}

/// Trait for types that can be converted to an address.
///
/// Implement it for your own types to pass them straight to the
/// [`Message`](crate::Message) builder.
///
/// ```rust
/// use courier::{Address, ToAddress};
///
/// struct User {
///     name: String,
///     email: String,
/// }
///
/// impl ToAddress for User {
///     fn to_address(&self) -> Address {
///         Address::with_name(&self.name, &self.email)
///     }
/// }
/// ```
pub trait ToAddress {
    fn to_address(&self) -> Address;
}

impl<T: ToAddress + ?Sized> ToAddress for &T {
    fn to_address(&self) -> Address {
        (*self).to_address()
    }
}

impl ToAddress for Address {
    fn to_address(&self) -> Address {
        self.clone()
    }
}

impl ToAddress for str {
    fn to_address(&self) -> Address {
        Address::new(self)
    }
}

impl ToAddress for String {
    fn to_address(&self) -> Address {
        Address::new(self)
    }
}

// (name, address)
impl<N: AsRef<str>, E: AsRef<str>> ToAddress for (N, E) {
    fn to_address(&self) -> Address {
        Address::with_name(self.0.as_ref(), self.1.as_ref())
    }
}
