use serde::{Deserialize, Serialize};
use url::Url;

/// The iTwin Platform deployment a session talks to.
///
/// Determines the host prefix of every REST call and the prefix handed
/// to thumbnail widgets.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ServerEnvironment {
    /// Public production deployment (`api.bentley.com`).
    #[default]
    #[strum(to_string = "production", serialize = "prod")]
    Production,
    /// QA deployment (`qa-api.bentley.com`).
    Qa,
    /// Development deployment (`dev-api.bentley.com`).
    Dev,
}

impl ServerEnvironment {
    /// The bare environment prefix (`""`, `"qa"`, `"dev"`), as consumed
    /// by the thumbnail widget's `serverEnvironmentPrefix` override.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Production => "",
            Self::Qa => "qa",
            Self::Dev => "dev",
        }
    }

    /// The host prefix including the trailing dash (`""`, `"qa-"`, `"dev-"`).
    pub fn url_prefix(self) -> &'static str {
        match self {
            Self::Production => "",
            Self::Qa => "qa-",
            Self::Dev => "dev-",
        }
    }

    /// Root of the REST API for this environment.
    pub fn api_base_url(self) -> Result<Url, crate::Error> {
        Ok(Url::parse(&format!(
            "https://{}api.bentley.com/",
            self.url_prefix()
        ))?)
    }
}
