// Async HTTP client for the iTwin Platform iModels API.
//
// Base: https://{env-}api.bentley.com/
// Auth: Authorization: Bearer <token>

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::environment::ServerEnvironment;
use crate::error::Error;
use crate::models::{ErrorEnvelope, IModel, IModelEnvelope, NamedVersion, NamedVersionEnvelope};
use crate::transport::TransportConfig;

/// Async client for the iModels REST endpoints.
///
/// Cheap to clone; the inner `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct ITwinClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl ITwinClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an access token, transport config, and environment.
    ///
    /// Injects `Authorization: Bearer` as a sensitive default header on
    /// every request.
    pub fn from_access_token(
        access_token: &SecretString,
        transport: &TransportConfig,
        environment: ServerEnvironment,
    ) -> Result<Self, Error> {
        Self::with_base_url(access_token, transport, environment.api_base_url()?)
    }

    /// Like [`from_access_token`](Self::from_access_token) but against an
    /// explicit API root (proxies, test servers).
    pub fn with_base_url(
        access_token: &SecretString,
        transport: &TransportConfig,
        base_url: Url,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut bearer =
            HeaderValue::from_str(&format!("Bearer {}", access_token.expose_secret()))
                .map_err(|e| Error::InvalidToken(e.to_string()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url),
            timeout: transport.timeout,
        })
    }

    /// Ensure the path ends with `/` so segment joins stay under the root.
    fn normalize_base_url(mut url: Url) -> Url {
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url
    }

    /// The API root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append percent-encoded path segments onto the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, segments: &[&str], resource: &str) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.handle_response(resp, resource).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Timeouts carry the configured limit; everything else stays a
    /// transport error.
    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
        resource: &str,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await.map_err(|e| self.transport_error(e))?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp, resource).await)
        }
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response, resource: &str) -> Error {
        let retry_after = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let raw = resp.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ErrorEnvelope>(&raw) {
            Ok(env) => (env.error.code, env.error.message),
            Err(_) => (None, (!raw.is_empty()).then_some(raw)),
        };
        let message = message.unwrap_or_else(|| status.to_string());

        match status {
            StatusCode::UNAUTHORIZED => Error::Unauthorized { message },
            StatusCode::FORBIDDEN => Error::Forbidden { message },
            StatusCode::NOT_FOUND => Error::NotFound {
                resource: resource.to_owned(),
                code,
            },
            StatusCode::TOO_MANY_REQUESTS => Error::RateLimited {
                retry_after_secs: retry_after.unwrap_or(1),
            },
            _ => Error::Api {
                message,
                code,
                status: status.as_u16(),
            },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── iModels ──────────────────────────────────────────────────────

    /// Fetch metadata (display name, description, ...) of one iModel.
    pub async fn get_imodel(&self, imodel_id: &str) -> Result<IModel, Error> {
        let env: IModelEnvelope = self
            .get(&["imodels", imodel_id], &format!("iModel '{imodel_id}'"))
            .await?;
        Ok(env.imodel)
    }

    // ── Named versions ───────────────────────────────────────────────

    /// Fetch a named version, which resolves to a changeset.
    pub async fn get_named_version(
        &self,
        imodel_id: &str,
        version_id: &str,
    ) -> Result<NamedVersion, Error> {
        let env: NamedVersionEnvelope = self
            .get(
                &["imodels", imodel_id, "namedversions", version_id],
                &format!("named version '{version_id}'"),
            )
            .await?;
        Ok(env.named_version)
    }
}
