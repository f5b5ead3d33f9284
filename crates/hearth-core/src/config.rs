//! Remote service configuration.

use serde::{Deserialize, Serialize};

use crate::util::{is_http_url, normalize_text_option};

/// Connection settings for the remote data service.
///
/// When url or api key is unset the core runs in local-only mode: every
/// store operation works normally, there is just no remote reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the remote service (e.g. `https://sync.example.com`)
    #[serde(default)]
    pub url: Option<String>,
    /// API key sent with every request
    #[serde(default)]
    pub api_key: Option<String>,
}

impl RemoteConfig {
    /// Create a configuration from raw values, trimming whitespace and
    /// trailing slashes.
    #[must_use]
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: normalize_text_option(Some(url.into()))
                .map(|url| url.trim_end_matches('/').to_string()),
            api_key: normalize_text_option(Some(api_key.into())),
        }
    }

    /// Check if remote sync is configured
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.url.as_deref().is_some_and(is_http_url) && self.api_key.is_some()
    }

    /// WebSocket base derived from the HTTP url
    #[must_use]
    pub fn realtime_url(&self) -> Option<String> {
        let url = self.url.as_deref()?;
        url.strip_prefix("https://")
            .map(|rest| format!("wss://{rest}"))
            .or_else(|| url.strip_prefix("http://").map(|rest| format!("ws://{rest}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_url_and_key() {
        let config = RemoteConfig::new(" https://sync.example.com/ ", " key ");
        assert_eq!(config.url.as_deref(), Some("https://sync.example.com"));
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert!(config.is_configured());
    }

    #[test]
    fn default_config_is_local_only() {
        let config = RemoteConfig::default();
        assert!(!config.is_configured());
        assert!(config.realtime_url().is_none());
    }

    #[test]
    fn non_http_url_is_not_configured() {
        let config = RemoteConfig::new("ftp://example.com", "key");
        assert!(!config.is_configured());
    }

    #[test]
    fn realtime_url_swaps_scheme() {
        let secure = RemoteConfig::new("https://sync.example.com", "key");
        assert_eq!(
            secure.realtime_url().as_deref(),
            Some("wss://sync.example.com")
        );

        let plain = RemoteConfig::new("http://localhost:4000", "key");
        assert_eq!(plain.realtime_url().as_deref(), Some("ws://localhost:4000"));
    }
}
