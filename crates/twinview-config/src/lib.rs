//! Configuration for twinview.
//!
//! TOML file + environment layering, access-token resolution (env +
//! keyring + plaintext), and translation to the runtime types in
//! `twinview_core::config`. The CLI adds flag-aware wrappers on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

use twinview_core::{ApiConfig, GateConfig, MatchMode, ServerEnvironment, SessionOptions, Theme};

/// Keyring service name for stored secrets.
pub const KEYRING_SERVICE: &str = "twinview";
/// Keyring entry holding the access token.
pub const KEYRING_TOKEN_ENTRY: &str = "access-token";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tenants: TenantSettings,

    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub view: ViewSettings,

    #[serde(default)]
    pub defaults: Defaults,
}

/// The tenant allow-list.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TenantSettings {
    #[serde(default, deserialize_with = "tenant_text")]
    pub primary_tenant_id: String,

    /// Delimited list (`,`, `;` or whitespace).
    #[serde(default, deserialize_with = "tenant_text")]
    pub valid_tenant_ids: String,

    #[serde(default)]
    pub match_mode: MatchMode,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default)]
    pub environment: ServerEnvironment,

    /// API root override (e.g. a local proxy).
    pub base_url: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Access token (plaintext; prefer keyring or env var).
    pub access_token: Option<String>,

    /// Environment variable name containing the access token.
    pub access_token_env: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            environment: ServerEnvironment::default(),
            base_url: None,
            timeout: default_timeout(),
            access_token: None,
            access_token_env: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ViewSettings {
    #[serde(default = "default_timeout")]
    pub fetch_timeout: u64,

    #[serde(default = "default_timeout")]
    pub init_timeout: u64,

    #[serde(default)]
    pub theme: Theme,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            fetch_timeout: default_timeout(),
            init_timeout: default_timeout(),
            theme: Theme::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

/// Tenant ids are opaque text; a bare TOML number or bool keeps its
/// written form.
fn tenant_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(text) => text,
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Signed(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    })
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "twinview", "twinview").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("twinview");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Env vars carrying tenant ids, in increasing precedence, and the key
/// each one sets.
const TENANT_ENV: [(&str, &str); 4] = [
    ("TWINVIEW_TENANTS__PRIMARY_TENANT_ID", "tenants.primary_tenant_id"),
    ("TWINVIEW_TENANTS__VALID_TENANT_IDS", "tenants.valid_tenant_ids"),
    ("PRIMARY_TENANT_ID", "tenants.primary_tenant_id"),
    ("VALID_TENANT_IDS", "tenants.valid_tenant_ids"),
];

/// Layered sources: defaults < TOML file < `TWINVIEW_*` env < raw
/// `PRIMARY_TENANT_ID` / `VALID_TENANT_IDS`.
///
/// Tenant ids bypass figment's env value parsing so `012345` or `true`
/// arrive as the exact text that was set.
pub fn layered(path: &Path) -> Figment {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::prefixed("TWINVIEW_")
                .ignore(&["TENANTS__PRIMARY_TENANT_ID", "TENANTS__VALID_TENANT_IDS"])
                .split("__"),
        );

    TENANT_ENV.into_iter().fold(figment, |figment, (var, key)| {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => {
                figment.merge(Serialized::default(key, value))
            }
            _ => figment,
        }
    })
}

/// Load the full Config from the given file + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = layered(path).extract()?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the access token from the credential chain (no CLI flag step).
///
/// Returns `None` when nothing is configured; the session then treats
/// the auth client as not signed in.
pub fn resolve_access_token(api: &ApiSettings) -> Option<SecretString> {
    // 1. Configured env var name → env var lookup
    if let Some(ref env_name) = api.access_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_TOKEN_ENTRY) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    api.access_token.clone().map(SecretString::from)
}

// ── Translation to runtime types ────────────────────────────────────

impl Config {
    pub fn gate_config(&self) -> GateConfig {
        GateConfig {
            primary_tenant_id: self.tenants.primary_tenant_id.clone(),
            valid_tenant_ids: self.tenants.valid_tenant_ids.clone(),
            match_mode: self.tenants.match_mode,
        }
    }

    /// Runtime API settings with an already-resolved token.
    pub fn api_config(&self, access_token: Option<SecretString>) -> Result<ApiConfig, ConfigError> {
        let base_url = self
            .api
            .base_url
            .as_deref()
            .map(|raw| {
                raw.parse::<url::Url>().map_err(|e| ConfigError::Validation {
                    field: "api.base_url".into(),
                    reason: format!("invalid URL '{raw}': {e}"),
                })
            })
            .transpose()?;

        Ok(ApiConfig {
            environment: self.api.environment,
            base_url,
            access_token,
            timeout: Duration::from_secs(self.api.timeout),
        })
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            fetch_timeout: Duration::from_secs(self.view.fetch_timeout),
            init_timeout: Duration::from_secs(self.view.init_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn load(name: &str) -> Result<Config, figment::Error> {
        load_config_from(Path::new(name)).map_err(|e| figment::Error::from(e.to_string()))
    }

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|_jail| {
            let cfg = load("missing.toml")?;
            assert_eq!(cfg.api.environment, ServerEnvironment::Production);
            assert_eq!(cfg.api.timeout, 30);
            assert_eq!(cfg.tenants.match_mode, MatchMode::Exact);
            assert_eq!(cfg.defaults.output, "table");
            Ok(())
        });
    }

    #[test]
    fn file_values_are_read() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [tenants]
                primary_tenant_id = "tenantA"
                valid_tenant_ids = "tenantB,tenantC"
                match_mode = "substring"

                [api]
                environment = "qa"
                timeout = 10

                [view]
                fetch_timeout = 5
                theme = "dark"
                "#,
            )?;

            let cfg = load("config.toml")?;
            let gate = cfg.gate_config();
            assert_eq!(gate.primary_tenant_id, "tenantA");
            assert_eq!(gate.valid_tenant_ids, "tenantB,tenantC");
            assert_eq!(gate.match_mode, MatchMode::Substring);
            assert_eq!(cfg.api.environment, ServerEnvironment::Qa);
            assert_eq!(cfg.view.theme, Theme::Dark);
            assert_eq!(cfg.session_options().fetch_timeout, Duration::from_secs(5));
            assert_eq!(cfg.session_options().init_timeout, Duration::from_secs(30));
            Ok(())
        });
    }

    #[test]
    fn raw_tenant_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "[tenants]\nprimary_tenant_id = \"fromFile\"\n",
            )?;
            jail.set_env("PRIMARY_TENANT_ID", "fromEnv");
            jail.set_env("VALID_TENANT_IDS", "x;y");

            let cfg = load("config.toml")?;
            assert_eq!(cfg.tenants.primary_tenant_id, "fromEnv");
            assert_eq!(cfg.tenants.valid_tenant_ids, "x;y");
            Ok(())
        });
    }

    #[test]
    fn numeric_tenant_ids_from_env_stay_text() {
        Jail::expect_with(|jail| {
            jail.set_env("PRIMARY_TENANT_ID", "12345");
            jail.set_env("VALID_TENANT_IDS", "true");

            let cfg = load("missing.toml")?;
            assert_eq!(cfg.tenants.primary_tenant_id, "12345");
            assert_eq!(cfg.tenants.valid_tenant_ids, "true");
            Ok(())
        });
    }

    #[test]
    fn prefixed_tenant_env_keeps_leading_zeros() {
        Jail::expect_with(|jail| {
            jail.set_env("TWINVIEW_TENANTS__PRIMARY_TENANT_ID", "042");
            jail.set_env("TWINVIEW_TENANTS__MATCH_MODE", "substring");

            let cfg = load("missing.toml")?;
            assert_eq!(cfg.tenants.primary_tenant_id, "042");
            assert_eq!(cfg.tenants.match_mode, MatchMode::Substring);
            Ok(())
        });
    }

    #[test]
    fn raw_tenant_env_beats_prefixed() {
        Jail::expect_with(|jail| {
            jail.set_env("TWINVIEW_TENANTS__PRIMARY_TENANT_ID", "prefixed");
            jail.set_env("PRIMARY_TENANT_ID", "raw");

            let cfg = load("missing.toml")?;
            assert_eq!(cfg.tenants.primary_tenant_id, "raw");
            Ok(())
        });
    }

    #[test]
    fn bare_numbers_in_file_are_accepted_as_ids() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[tenants]\nprimary_tenant_id = 777\n")?;

            let cfg = load("config.toml")?;
            assert_eq!(cfg.tenants.primary_tenant_id, "777");
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_reaches_nested_sections() {
        Jail::expect_with(|jail| {
            jail.set_env("TWINVIEW_API__ENVIRONMENT", "dev");
            jail.set_env("TWINVIEW_VIEW__INIT_TIMEOUT", "3");

            let cfg = load("missing.toml")?;
            assert_eq!(cfg.api.environment, ServerEnvironment::Dev);
            assert_eq!(cfg.view.init_timeout, 3);
            Ok(())
        });
    }

    #[test]
    fn token_from_named_env_var() {
        Jail::expect_with(|jail| {
            jail.set_env("TWINVIEW_TEST_TOKEN_VAR", "env-token");
            let api = ApiSettings {
                access_token: Some("file-token".into()),
                access_token_env: Some("TWINVIEW_TEST_TOKEN_VAR".into()),
                ..ApiSettings::default()
            };
            let token = resolve_access_token(&api).unwrap();
            assert_eq!(token.expose_secret(), "env-token");
            Ok(())
        });
    }

    #[test]
    fn invalid_base_url_is_a_validation_error() {
        let mut cfg = Config::default();
        cfg.api.base_url = Some("not a url".into());
        assert!(matches!(
            cfg.api_config(None),
            Err(ConfigError::Validation { ref field, .. }) if field == "api.base_url"
        ));
    }

    #[test]
    fn saved_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.tenants.primary_tenant_id = "tenantA".into();
        cfg.api.environment = ServerEnvironment::Qa;
        save_config_to(&cfg, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("primary_tenant_id = \"tenantA\""));
        assert!(written.contains("environment = \"qa\""));
        assert!(!written.contains("access_token"));
    }
}
