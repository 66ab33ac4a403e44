// ── Core error types ──
//
// Domain errors from twinview-core. Consumers never see raw HTTP status
// codes or JSON failures; the `From<twinview_api::Error>` impl translates
// transport-layer errors into domain variants.

use thiserror::Error;

use crate::route::RouteError;
use crate::tenant::AuthorizationError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Access ───────────────────────────────────────────────────────
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error("Access token rejected: {message}")]
    AuthenticationFailed { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the iTwin Platform: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("Invalid route: {0}")]
    Route(#[from] RouteError),

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// The platform error code (e.g., "iModelNotFound").
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<twinview_api::Error> for CoreError {
    fn from(err: twinview_api::Error) -> Self {
        use twinview_api::Error as Api;

        match err {
            Api::Unauthorized { message } | Api::Forbidden { message } => {
                CoreError::AuthenticationFailed { message }
            }
            Api::InvalidToken(reason) => CoreError::AuthenticationFailed { message: reason },
            Api::Transport(ref e) => {
                if e.is_connect() {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("Base URL cannot be used for API paths: {url}"),
            },
            Api::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            Api::NotFound { resource, .. } => CoreError::NotFound { resource },
            Api::RateLimited { retry_after_secs } => CoreError::Api {
                message: format!("Rate limited -- retry after {retry_after_secs}s"),
                code: Some("rate_limited".into()),
                status: Some(429),
            },
            Api::Api {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            Api::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
