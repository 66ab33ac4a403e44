// Shared transport configuration for building reqwest::Client instances.
//
// Timeout, user agent and the platform's default headers live here so
// the client constructor only deals with auth material.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

/// Media type every iTwin Platform v1 endpoint negotiates on.
pub const ITWIN_ACCEPT: &str = "application/vnd.bentley.itwin-platform.v1+json";

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("twinview/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    /// Config with a custom request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a `reqwest::Client` carrying the platform `Accept` header
    /// plus any additional default headers (e.g. `Authorization`).
    pub fn build_client_with_headers(
        &self,
        mut headers: HeaderMap,
    ) -> Result<reqwest::Client, crate::error::Error> {
        headers
            .entry(ACCEPT)
            .or_insert(HeaderValue::from_static(ITWIN_ACCEPT));

        Ok(reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .default_headers(headers)
            .build()?)
    }
}
