//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use twinview_config::ConfigError;
use twinview_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const DENIED: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const UNAVAILABLE: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Access ───────────────────────────────────────────────────────
    #[error("{reason}")]
    #[diagnostic(
        code(twinview::denied),
        help(
            "Add the project to tenants.valid_tenant_ids in the config file,\n\
             or export VALID_TENANT_IDS."
        )
    )]
    Denied { reason: String },

    #[error("No access token configured")]
    #[diagnostic(
        code(twinview::no_access_token),
        help(
            "Pass --access-token, set TWINVIEW_ACCESS_TOKEN, or store a token in the\n\
             system keyring (service 'twinview', entry 'access-token')."
        )
    )]
    NoAccessToken,

    #[error("Access token rejected: {message}")]
    #[diagnostic(
        code(twinview::auth_failed),
        help("The token may have expired. Obtain a fresh one and retry.")
    )]
    AuthFailed { message: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the iTwin Platform")]
    #[diagnostic(
        code(twinview::connection_failed),
        help("Check network access, or the --env / api.base_url setting.\nReason: {reason}")
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(twinview::timeout),
        help("Increase --timeout, or view.fetch_timeout for named versions.")
    )]
    Timeout { seconds: u64 },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource} not found")]
    #[diagnostic(code(twinview::not_found))]
    NotFound { resource: String },

    #[error("View unavailable: {reason}")]
    #[diagnostic(
        code(twinview::unavailable),
        help("The named version could not be resolved. Check the version id.")
    )]
    Unavailable { reason: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(twinview::api_error))]
    ApiError { code: String, message: String },

    // ── Input ────────────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(twinview::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(twinview::config),
        help(
            "Set tenants.primary_tenant_id in {path},\n\
             or export PRIMARY_TENANT_ID."
        )
    )]
    InvalidConfig { message: String, path: String },

    #[error(transparent)]
    #[diagnostic(code(twinview::config_load))]
    Config(Box<figment::Error>),

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    #[diagnostic(code(twinview::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(twinview::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(twinview::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Denied { .. } | Self::NoAccessToken | Self::AuthFailed { .. } => {
                exit_code::DENIED
            }
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Unavailable { .. } => exit_code::UNAVAILABLE,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Authorization(denied) => CliError::Denied {
                reason: denied.to_string(),
            },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::NotFound { resource } => CliError::NotFound { resource },
            CoreError::Route(e) => CliError::Validation {
                field: "route".into(),
                reason: e.to_string(),
            },
            CoreError::Api { message, code, status } => CliError::ApiError {
                code: code
                    .or_else(|| status.map(|s| s.to_string()))
                    .unwrap_or_else(|| "unknown".into()),
                message,
            },
            CoreError::Config { message } => CliError::InvalidConfig {
                message,
                path: twinview_config::config_path().display().to_string(),
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Serialization(e) => CliError::Internal(e.to_string()),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
