//! Credentials and endpoint for a HoodPay client.

use std::fmt;

use crate::error::ApiError;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.hoodpay.com/v1";

pub const ENV_API_KEY: &str = "HOODPAY_API_KEY";
pub const ENV_BUSINESS_ID: &str = "HOODPAY_BUSINESS_ID";
pub const ENV_BASE_URL: &str = "HOODPAY_BASE_URL";

/// Everything a client needs to address the API. Building one never touches
/// the network.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_key: String,
    business_id: u64,
    base_url: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, business_id: u64) -> Self {
        Self {
            api_key: api_key.into(),
            business_id,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client somewhere other than production, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Read `HOODPAY_API_KEY`, `HOODPAY_BUSINESS_ID` and optionally
    /// `HOODPAY_BASE_URL` from the process environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let api_key = lookup(ENV_API_KEY)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ApiError::ConfigError(format!("{ENV_API_KEY} is not set")))?;
        let raw_id = lookup(ENV_BUSINESS_ID)
            .ok_or_else(|| ApiError::ConfigError(format!("{ENV_BUSINESS_ID} is not set")))?;
        let business_id = raw_id.trim().parse().map_err(|_| {
            ApiError::ConfigError(format!("{ENV_BUSINESS_ID} is not a business id: {raw_id:?}"))
        })?;

        let config = Self::new(api_key, business_id);
        Ok(match lookup(ENV_BASE_URL) {
            Some(base_url) if !base_url.is_empty() => config.with_base_url(&base_url),
            _ => config,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn business_id(&self) -> u64 {
        self.business_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("business_id", &self.business_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn new_uses_production_base_url() {
        let config = ClientConfig::new("key", 7);
        assert_eq!(config.base_url(), "https://api.hoodpay.com/v1");
        assert_eq!(config.business_id(), 7);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("key", 7).with_base_url("http://localhost:3000/v1/");
        assert_eq!(config.base_url(), "http://localhost:3000/v1");
    }

    #[test]
    fn debug_redacts_api_key() {
        let rendered = format!("{:?}", ClientConfig::new("sk_live_secret", 1));
        assert!(!rendered.contains("sk_live_secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn from_env_reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "key"),
            (ENV_BUSINESS_ID, " 42 "),
            (ENV_BASE_URL, "http://127.0.0.1:9000/v1"),
        ]))
        .unwrap();
        assert_eq!(config.api_key(), "key");
        assert_eq!(config.business_id(), 42);
        assert_eq!(config.base_url(), "http://127.0.0.1:9000/v1");
    }

    #[test]
    fn from_env_requires_api_key() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_BUSINESS_ID, "42")])).unwrap_err();
        assert!(matches!(err, ApiError::ConfigError(msg) if msg.contains(ENV_API_KEY)));
    }

    #[test]
    fn from_env_rejects_non_numeric_business_id() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_API_KEY, "key"), (ENV_BUSINESS_ID, "acme")]))
            .unwrap_err();
        assert!(matches!(err, ApiError::ConfigError(msg) if msg.contains("acme")));
    }
}
