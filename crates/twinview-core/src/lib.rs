//! Decision logic of the twinview viewer shell, between `twinview-api`
//! and UI consumers (CLI today).
//!
//! - **[`TenantGate`]**: single-evaluation allow-list check built from an
//!   injected [`GateConfig`]. Exact membership by default; the legacy
//!   substring behavior is available as [`MatchMode::Substring`].
//!
//! - **[`ViewModel`]**: per-view readiness decider. Tracks the
//!   named-version fetch, auth readiness, reporting initialization and
//!   theme, and exposes the resulting [`ViewPhase`] and [`ViewerLaunch`].
//!
//! - **[`ViewSession`]**: async driver for a `ViewModel`: spawns the
//!   version lookup and reporting init as cancellable tasks, follows the
//!   auth and theme `watch` signals, and publishes every change.
//!
//! - **[`ViewerProviderSet`]**, **[`IModelHeader`]**, **[`ViewRoute`]**:
//!   the capability provider sequence, header button model, and route
//!   parsing.

pub mod config;
pub mod error;
pub mod header;
pub mod providers;
pub mod readiness;
pub mod route;
pub mod session;
pub mod tenant;
pub mod theme;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ApiConfig, GateConfig, SessionOptions};
pub use error::CoreError;
pub use header::{IModelHeader, Thumbnail};
pub use providers::{CapabilityProvider, ContentToolsOptions, PropertyGridOptions, ViewerProviderSet};
pub use readiness::{
    FetchStatus, InitStatus, VersionMetadata, ViewModel, ViewPhase, ViewRequest, ViewerLaunch,
    is_ready, resolve_changeset_id,
};
pub use route::{RouteError, ViewRoute};
pub use session::{NoopReporting, ReportingInitializer, SessionDeps, VersionLookup, ViewSession};
pub use tenant::{AllowedTenantSet, AuthorizationError, MatchMode, TenantGate};
pub use theme::{Theme, ThemeSource};

// Transport types consumers need without a direct api dependency.
pub use twinview_api::{IModel, ITwinClient, NamedVersion, ServerEnvironment, TransportConfig};

/// Build an API client from runtime config.
///
/// Fails with [`CoreError::AuthenticationFailed`] when no access token
/// is configured.
pub fn build_client(config: &ApiConfig) -> Result<ITwinClient, CoreError> {
    let token = config
        .access_token
        .as_ref()
        .ok_or_else(|| CoreError::AuthenticationFailed {
            message: "no access token configured".into(),
        })?;
    let transport = TransportConfig::default().with_timeout(config.timeout);
    let client = match config.base_url {
        Some(ref base) => ITwinClient::with_base_url(token, &transport, base.clone())?,
        None => ITwinClient::from_access_token(token, &transport, config.environment)?,
    };
    Ok(client)
}
