//! Mailgun driver configuration.

use std::collections::BTreeMap;
use std::env;

use super::endpoint::{messages_mime_url, RegionTable};
use crate::error::MailError;

/// Static Mailgun settings: set once, read on every send.
///
/// ```
/// use courier::providers::MailgunConfig;
///
/// let config = MailgunConfig::new("test.domain", "key-xxx")
///     .region("EU")
///     .extra("o:campaign", "marketing");
///
/// assert_eq!(config.endpoint(), "https://api.eu.mailgun.net/v3/test.domain/messages.mime");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailgunConfig {
    /// Sending domain (e.g. "mg.example.com")
    pub domain: String,
    /// Private API key
    pub api_key: String,
    /// Region code (e.g. "EU"); `None` is the US region
    pub region: Option<String>,
    /// Provider options sent with every message
    pub extras: BTreeMap<String, String>,
    /// Region code to host prefix lookup
    pub regions: RegionTable,
    /// Replaces the region-derived origin (proxies, mock servers)
    pub base_url: Option<String>,
}

impl MailgunConfig {
    pub fn new(domain: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            api_key: api_key.into(),
            region: None,
            extras: BTreeMap::new(),
            regions: RegionTable::default(),
            base_url: None,
        }
    }

    /// Read `MAILGUN_DOMAIN`, `MAILGUN_API_KEY` and the optional
    /// `MAILGUN_REGION` / `MAILGUN_BASE_URL`.
    pub fn from_env() -> Result<Self, MailError> {
        let domain = env::var("MAILGUN_DOMAIN")
            .map_err(|_| MailError::Configuration("MAILGUN_DOMAIN not set".into()))?;
        let api_key = env::var("MAILGUN_API_KEY")
            .map_err(|_| MailError::Configuration("MAILGUN_API_KEY not set".into()))?;

        let mut config = Self::new(domain, api_key);
        if let Ok(region) = env::var("MAILGUN_REGION") {
            config = config.region(region);
        }
        if let Ok(base_url) = env::var("MAILGUN_BASE_URL") {
            config = config.base_url(base_url);
        }
        Ok(config)
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Add one provider option sent with every message.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Replace all configured provider options.
    pub fn extras(mut self, extras: BTreeMap<String, String>) -> Self {
        self.extras = extras;
        self
    }

    pub fn region_table(mut self, regions: RegionTable) -> Self {
        self.regions = regions;
        self
    }

    /// Override the API origin, e.g. `http://127.0.0.1:8080`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Fail fast on settings that could never authenticate.
    pub fn validate(&self) -> Result<(), MailError> {
        if self.domain.trim().is_empty() {
            return Err(MailError::Configuration("mailgun domain is empty".into()));
        }
        if self.api_key.trim().is_empty() {
            return Err(MailError::Configuration("mailgun api key is empty".into()));
        }
        Ok(())
    }

    /// The `messages.mime` URL, derived on every call.
    pub fn endpoint(&self) -> String {
        match self.base_url {
            Some(ref origin) => messages_mime_url(origin, &self.domain),
            None => self.regions.endpoint(&self.domain, self.region.as_deref()),
        }
    }
}
