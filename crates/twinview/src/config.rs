//! Bridges `twinview-config` with the CLI's global flags.
//!
//! Loading and token lookup live in the shared crate; this module adds
//! the flag overrides and turns the result into the runtime types the
//! commands need.

use std::path::PathBuf;

use clap::ValueEnum;
use secrecy::SecretString;

use twinview_config::Config;
use twinview_core::{ApiConfig, CoreError, MatchMode, ServerEnvironment, TenantGate, Theme};

use crate::cli::{ColorMode, EnvironmentArg, GlobalOpts, MatchModeArg, OutputFormat, ThemeArg};
use crate::error::CliError;

/// The config file in effect: `--config` / `TWINVIEW_CONFIG`, else the
/// platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(twinview_config::config_path)
}

/// Load the layered config and apply flag overrides on top.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = twinview_config::load_config_from(&config_path(global))?;

    if let Some(env) = global.environment {
        cfg.api.environment = env.into();
    }
    if let Some(ref url) = global.api_url {
        cfg.api.base_url = Some(url.clone());
    }
    if let Some(secs) = global.timeout {
        cfg.api.timeout = secs;
    }
    if let Some(mode) = global.match_mode {
        cfg.tenants.match_mode = mode.into();
    }
    Ok(cfg)
}

/// `--access-token` / `TWINVIEW_ACCESS_TOKEN` first, then the shared chain.
pub fn resolve_access_token(global: &GlobalOpts, cfg: &Config) -> Option<SecretString> {
    global
        .access_token
        .clone()
        .filter(|t| !t.trim().is_empty())
        .map(SecretString::from)
        .or_else(|| twinview_config::resolve_access_token(&cfg.api))
}

/// Build the tenant gate, reporting an empty allow-list against the
/// file actually in use.
pub fn gate(global: &GlobalOpts, cfg: &Config) -> Result<TenantGate, CliError> {
    TenantGate::new(&cfg.gate_config()).map_err(|e| match e {
        CoreError::Config { message } => CliError::InvalidConfig {
            message,
            path: config_path(global).display().to_string(),
        },
        other => other.into(),
    })
}

/// Runtime API settings. Fails fast when no token is available.
pub fn api_config(global: &GlobalOpts, cfg: &Config) -> Result<ApiConfig, CliError> {
    let token = resolve_access_token(global, cfg).ok_or(CliError::NoAccessToken)?;
    Ok(cfg.api_config(Some(token))?)
}

pub fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&cfg.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

pub fn color_mode(global: &GlobalOpts, cfg: &Config) -> ColorMode {
    global
        .color
        .or_else(|| ColorMode::from_str(&cfg.defaults.color, true).ok())
        .unwrap_or(ColorMode::Auto)
}

pub fn theme(arg: Option<ThemeArg>, cfg: &Config) -> Theme {
    arg.map_or(cfg.view.theme, Into::into)
}

// ── Flag enum conversions ────────────────────────────────────────────

impl From<EnvironmentArg> for ServerEnvironment {
    fn from(arg: EnvironmentArg) -> Self {
        match arg {
            EnvironmentArg::Production => Self::Production,
            EnvironmentArg::Qa => Self::Qa,
            EnvironmentArg::Dev => Self::Dev,
        }
    }
}

impl From<MatchModeArg> for MatchMode {
    fn from(arg: MatchModeArg) -> Self {
        match arg {
            MatchModeArg::Exact => Self::Exact,
            MatchModeArg::Substring => Self::Substring,
        }
    }
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Self::Light,
            ThemeArg::Dark => Self::Dark,
        }
    }
}
