// ── Tenant authorization gate ──
//
// Restricts viewing to an allow-list of tenant (iTwin) identifiers built
// from two configuration strings. Evaluation is a single pure check; the
// caller decides how to present a denial.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::GateConfig;
use crate::error::CoreError;

/// User-facing text shown when a tenant is rejected.
pub const RESTRICTED_MESSAGE: &str = "This application is restricted to use only authorised \
                                      iTwinId. Please ensure you select the correct one";

/// How a candidate tenant id is compared against the allow-list.
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
pub enum MatchMode {
    /// Exact membership in the parsed token set.
    #[default]
    Exact,
    /// Legacy behavior: the candidate only has to occur somewhere in the
    /// raw concatenation `primary + valid`. Accepts fragments like `"ant"`
    /// for `"tenantA"`; keep for compatibility checks only.
    Substring,
}

/// Why the gate rejected a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("No project id supplied. {}", RESTRICTED_MESSAGE)]
    MissingProjectId,

    #[error("Project '{project_id}' is not authorised. {}", RESTRICTED_MESSAGE)]
    NotAllowed { project_id: String },
}

// ── AllowedTenantSet ─────────────────────────────────────────────────

/// The authorised tenant identifiers.
///
/// Holds both the parsed token set (for [`MatchMode::Exact`]) and the raw
/// concatenation (for [`MatchMode::Substring`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedTenantSet {
    ids: BTreeSet<String>,
    joined: String,
}

impl AllowedTenantSet {
    /// Build from the primary id and the delimited list of valid ids.
    ///
    /// Fails when neither string yields a single identifier: an empty
    /// allow-list would deny everything (or, under substring matching,
    /// accept arbitrary fragments), so it is treated as misconfiguration.
    pub fn from_config(primary: &str, valid: &str) -> Result<Self, CoreError> {
        let ids: BTreeSet<String> = std::iter::once(primary)
            .chain(valid.split(is_delimiter))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .collect();

        if ids.is_empty() {
            return Err(CoreError::Config {
                message: "no authorised tenant ids configured \
                          (set PRIMARY_TENANT_ID and/or VALID_TENANT_IDS)"
                    .into(),
            });
        }

        Ok(Self {
            ids,
            joined: format!("{primary}{valid}"),
        })
    }

    /// Test a candidate under the given match mode.
    ///
    /// Empty or whitespace-only candidates never match, in either mode.
    /// Exact mode trims the candidate; substring mode compares it as given.
    pub fn contains(&self, candidate: &str, mode: MatchMode) -> bool {
        if candidate.trim().is_empty() {
            return false;
        }
        match mode {
            MatchMode::Exact => self.ids.contains(candidate.trim()),
            MatchMode::Substring => self.joined.contains(candidate),
        }
    }

    /// Parsed identifiers in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn is_delimiter(c: char) -> bool {
    c == ',' || c == ';' || c.is_ascii_whitespace()
}

// ── TenantGate ───────────────────────────────────────────────────────

/// Pure allow-list check, constructed once from injected configuration.
#[derive(Debug, Clone)]
pub struct TenantGate {
    allowed: AllowedTenantSet,
    mode: MatchMode,
}

impl TenantGate {
    pub fn new(config: &GateConfig) -> Result<Self, CoreError> {
        let allowed =
            AllowedTenantSet::from_config(&config.primary_tenant_id, &config.valid_tenant_ids)?;
        if config.match_mode == MatchMode::Substring {
            warn!("tenant gate running in substring mode; partial ids will be accepted");
        }
        debug!(tenants = allowed.len(), mode = %config.match_mode, "tenant gate configured");
        Ok(Self {
            allowed,
            mode: config.match_mode,
        })
    }

    pub fn is_authorized(&self, project_id: &str) -> bool {
        self.allowed.contains(project_id, self.mode)
    }

    /// Evaluate a request's project id once.
    pub fn check(&self, project_id: Option<&str>) -> Result<(), AuthorizationError> {
        let project_id = match project_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => return Err(AuthorizationError::MissingProjectId),
        };

        if self.is_authorized(project_id) {
            debug!(project_id, "tenant authorised");
            Ok(())
        } else {
            debug!(project_id, "tenant rejected");
            Err(AuthorizationError::NotAllowed {
                project_id: project_id.to_owned(),
            })
        }
    }

    pub fn allowed(&self) -> &AllowedTenantSet {
        &self.allowed
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    fn gate(mode: MatchMode) -> TenantGate {
        TenantGate::new(&GateConfig {
            primary_tenant_id: "tenantA".into(),
            valid_tenant_ids: "tenantB,tenantC".into(),
            match_mode: mode,
        })
        .unwrap()
    }

    #[test]
    fn listed_tenant_is_authorized_in_both_modes() {
        assert!(gate(MatchMode::Exact).is_authorized("tenantB"));
        assert!(gate(MatchMode::Substring).is_authorized("tenantB"));
        assert!(gate(MatchMode::Exact).is_authorized("tenantA"));
    }

    #[test]
    fn fragment_is_denied_exactly_but_accepted_by_substring() {
        assert!(!gate(MatchMode::Exact).is_authorized("ant"));
        assert!(gate(MatchMode::Substring).is_authorized("ant"));
        // Spans the primary/valid boundary of the raw concatenation.
        assert!(gate(MatchMode::Substring).is_authorized("AtenantB"));
        assert!(!gate(MatchMode::Exact).is_authorized("AtenantB"));
    }

    #[test]
    fn substring_mode_does_not_trim_the_candidate() {
        assert!(!gate(MatchMode::Substring).is_authorized(" tenantB"));
        assert!(gate(MatchMode::Exact).is_authorized(" tenantB"));
        assert!(matches!(
            gate(MatchMode::Substring).check(Some("tenantB ")),
            Err(AuthorizationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn unknown_tenant_is_denied_with_message() {
        let err = gate(MatchMode::Exact).check(Some("tenantZ")).unwrap_err();
        assert_eq!(
            err,
            AuthorizationError::NotAllowed {
                project_id: "tenantZ".into()
            }
        );
        assert!(err.to_string().contains(RESTRICTED_MESSAGE));
    }

    #[test]
    fn absent_or_blank_project_id_is_an_explicit_error() {
        let g = gate(MatchMode::Substring);
        assert_eq!(g.check(None), Err(AuthorizationError::MissingProjectId));
        assert_eq!(g.check(Some("  ")), Err(AuthorizationError::MissingProjectId));
        assert!(!g.is_authorized(""));
    }

    #[test]
    fn list_accepts_mixed_delimiters_and_trims() {
        let set = AllowedTenantSet::from_config(" p1 ", "a, b;c\td\n,,").unwrap();
        let ids: Vec<_> = set.iter().collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "p1"]);
        assert!(set.contains("c", MatchMode::Exact));
        assert!(set.contains(" b ", MatchMode::Exact));
    }

    #[test]
    fn primary_alone_is_enough() {
        let set = AllowedTenantSet::from_config("only", "").unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains("only", MatchMode::Exact));
    }

    #[test]
    fn empty_configuration_is_rejected() {
        let err = AllowedTenantSet::from_config("", " , ").unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));

        let err = TenantGate::new(&GateConfig::default()).unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }

    #[test]
    fn match_mode_parses_from_config_text() {
        assert_eq!("SUBSTRING".parse::<MatchMode>().unwrap(), MatchMode::Substring);
        assert_eq!(MatchMode::Exact.to_string(), "exact");
    }
}
