//! Mailgun API endpoint construction.
//!
//! Mailgun serves each data-center region from its own host:
//! `api.mailgun.net` for the US region, `api.eu.mailgun.net` for the EU.
//! Regions are resolved through a [`RegionTable`] so new ones are a table
//! row, not a code change.

use std::collections::HashMap;

pub(crate) const MAILGUN_HOST: &str = "mailgun.net";

/// Lookup table from region code to host prefix.
///
/// Codes are matched case-insensitively. The base region maps to an empty
/// prefix. A code missing from the table is used lowercased as its own
/// prefix, so `"AP"` resolves to `api.ap.mailgun.net`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTable {
    prefixes: HashMap<String, String>,
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::empty().with_region("US", "").with_region("EU", "eu")
    }
}

impl RegionTable {
    /// A table with no rows; every code falls back to its lowercased self.
    pub fn empty() -> Self {
        Self {
            prefixes: HashMap::new(),
        }
    }

    /// Add or replace a region row.
    pub fn with_region(mut self, code: impl AsRef<str>, prefix: impl Into<String>) -> Self {
        self.prefixes
            .insert(code.as_ref().to_ascii_uppercase(), prefix.into());
        self
    }

    /// Host prefix for `region`; `None` or a blank code is the base region.
    pub fn prefix(&self, region: Option<&str>) -> String {
        let code = match region.map(str::trim) {
            Some(code) if !code.is_empty() => code,
            _ => return String::new(),
        };

        match self.prefixes.get(&code.to_ascii_uppercase()) {
            Some(prefix) => prefix.clone(),
            None => {
                tracing::warn!(region = code, "Unknown Mailgun region, using it as host prefix");
                code.to_ascii_lowercase()
            }
        }
    }

    /// API origin for `region`, e.g. `https://api.eu.mailgun.net`.
    pub fn origin(&self, region: Option<&str>) -> String {
        let prefix = self.prefix(region);
        if prefix.is_empty() {
            format!("https://api.{}", MAILGUN_HOST)
        } else {
            format!("https://api.{}.{}", prefix, MAILGUN_HOST)
        }
    }

    /// Full `messages.mime` URL for `domain` in `region`.
    pub fn endpoint(&self, domain: &str, region: Option<&str>) -> String {
        messages_mime_url(&self.origin(region), domain)
    }
}

/// Build the `messages.mime` URL using the default region table.
///
/// ```
/// use courier::providers::build_endpoint;
///
/// assert_eq!(
///     build_endpoint("test.domain", None),
///     "https://api.mailgun.net/v3/test.domain/messages.mime"
/// );
/// assert_eq!(
///     build_endpoint("test.domain", Some("EU")),
///     "https://api.eu.mailgun.net/v3/test.domain/messages.mime"
/// );
/// ```
pub fn build_endpoint(domain: &str, region: Option<&str>) -> String {
    RegionTable::default().endpoint(domain, region)
}

/// `<origin>/v3/<domain>/messages.mime`, tolerating a trailing slash on the origin.
pub(crate) fn messages_mime_url(origin: &str, domain: &str) -> String {
    format!("{}/v3/{}/messages.mime", origin.trim_end_matches('/'), domain)
}
