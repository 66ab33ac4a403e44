// ── Runtime configuration ──
//
// These types describe how a session gates tenants and talks to the
// platform. They carry credential data and tuning, but never touch disk.
// The CLI builds them from `twinview-config` and hands them in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use twinview_api::ServerEnvironment;

use crate::tenant::MatchMode;

/// Allow-list configuration for the tenant gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateConfig {
    /// The single primary tenant (iTwin) identifier.
    pub primary_tenant_id: String,
    /// Additional authorised tenants, joined by `,`, `;` or whitespace.
    pub valid_tenant_ids: String,
    pub match_mode: MatchMode,
}

/// How to reach the iTwin Platform.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub environment: ServerEnvironment,
    /// Explicit API root overriding `environment` (proxies, tests).
    pub base_url: Option<Url>,
    /// Bearer token. `None` means the auth client is not signed in.
    pub access_token: Option<SecretString>,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            environment: ServerEnvironment::default(),
            base_url: None,
            access_token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Tuning for a single view session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Upper bound on the named-version lookup.
    pub fetch_timeout: Duration,
    /// Upper bound on the reporting subsystem initialization.
    pub init_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(30),
            init_timeout: Duration::from_secs(30),
        }
    }
}
