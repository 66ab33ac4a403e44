// ── View readiness decider ──
//
// Decides, per view request, whether the viewer may launch, which
// changeset it opens, and which capability providers it receives.
// `ViewModel` is the per-view state; every mutator re-evaluates the
// readiness latch so `phase()` stays a pure read.

use secrecy::SecretString;
use serde::Serialize;

use crate::providers::ViewerProviderSet;
use crate::theme::Theme;

/// The input of one view: what the router resolved plus the caller's token.
#[derive(Debug, Clone)]
pub struct ViewRequest {
    pub project_id: Option<String>,
    pub imodel_id: String,
    /// `None` opens the latest state of the iModel.
    pub version_id: Option<String>,
    pub access_token: Option<SecretString>,
}

/// Named-version details the decider needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMetadata {
    pub changeset_id: Option<String>,
}

impl From<twinview_api::NamedVersion> for VersionMetadata {
    fn from(v: twinview_api::NamedVersion) -> Self {
        Self {
            changeset_id: v.changeset_id,
        }
    }
}

// ── Pure decision functions ──────────────────────────────────────────

/// The viewer may launch once auth is ready and, when a version was
/// requested, its metadata has been fetched.
pub fn is_ready(fetch_state: bool, version_id: Option<&str>, auth_ready: bool) -> bool {
    auth_ready && (version_id.is_none() || fetch_state)
}

/// The changeset the viewer opens; `None` means latest.
pub fn resolve_changeset_id<'a>(
    version_id: Option<&str>,
    metadata: Option<&'a VersionMetadata>,
) -> Option<&'a str> {
    version_id?;
    metadata?.changeset_id.as_deref()
}

// ── State ────────────────────────────────────────────────────────────

/// Progress of the named-version lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "kebab-case")]
pub enum FetchStatus {
    /// No version requested, nothing to fetch.
    NotRequested,
    InFlight,
    Loaded(VersionMetadata),
    Failed(String),
}

/// Progress of the reporting subsystem initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "kebab-case")]
pub enum InitStatus {
    Pending,
    Initialized,
    Failed(String),
}

/// Observable phase of a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "reason", rename_all = "kebab-case")]
pub enum ViewPhase {
    /// Waiting on auth and/or the version fetch.
    Pending,
    /// Viewer mounted. Never left once entered.
    Ready,
    /// The tenant gate rejected the project.
    Denied(String),
    /// The version lookup failed or timed out.
    Unavailable(String),
}

impl ViewPhase {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }
}

/// Everything the viewer widget is launched with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerLaunch {
    pub tenant_id: String,
    pub imodel_id: String,
    pub changeset_id: Option<String>,
    pub theme: Theme,
    pub enable_performance_monitors: bool,
    pub ui_providers: ViewerProviderSet,
}

/// Per-view decider state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    project_id: Option<String>,
    imodel_id: String,
    version_id: Option<String>,
    fetch: FetchStatus,
    auth_ready: bool,
    reporting: InitStatus,
    theme: Theme,
    mounted: bool,
    denied: Option<String>,
    warnings: Vec<String>,
}

impl ViewModel {
    pub fn new(request: &ViewRequest, auth_ready: bool, theme: Theme) -> Self {
        let fetch = if request.version_id.is_some() {
            FetchStatus::InFlight
        } else {
            FetchStatus::NotRequested
        };
        let mut model = Self {
            project_id: request.project_id.clone(),
            imodel_id: request.imodel_id.clone(),
            version_id: request.version_id.clone(),
            fetch,
            auth_ready,
            reporting: InitStatus::Pending,
            theme,
            mounted: false,
            denied: None,
            warnings: Vec::new(),
        };
        model.reevaluate();
        model
    }

    /// A view the tenant gate already rejected; it can never mount.
    pub fn rejected(request: &ViewRequest, theme: Theme, reason: impl Into<String>) -> Self {
        let mut model = Self::new(request, false, theme);
        model.deny(reason);
        model
    }

    // ── Mutators ─────────────────────────────────────────────────

    /// Reject the view. Only effective before the viewer has mounted.
    pub fn deny(&mut self, reason: impl Into<String>) {
        if !self.mounted {
            self.denied = Some(reason.into());
        }
    }

    pub fn record_fetch(&mut self, outcome: Result<VersionMetadata, String>) {
        if !matches!(self.fetch, FetchStatus::InFlight) {
            return;
        }
        self.fetch = match outcome {
            Ok(meta) => FetchStatus::Loaded(meta),
            Err(reason) => FetchStatus::Failed(reason),
        };
        self.reevaluate();
    }

    pub fn set_auth_ready(&mut self, ready: bool) {
        self.auth_ready = ready;
        self.reevaluate();
    }

    pub fn record_reporting(&mut self, outcome: Result<(), String>) {
        self.reporting = match outcome {
            Ok(()) => InitStatus::Initialized,
            Err(reason) => {
                self.warnings
                    .push(format!("reporting initialization failed: {reason}"));
                InitStatus::Failed(reason)
            }
        };
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    fn reevaluate(&mut self) {
        if self.denied.is_none() && is_ready(self.fetch_state(), self.version_id(), self.auth_ready)
        {
            self.mounted = true;
        }
    }

    // ── Queries ──────────────────────────────────────────────────

    pub fn phase(&self) -> ViewPhase {
        if self.mounted {
            return ViewPhase::Ready;
        }
        if let Some(ref reason) = self.denied {
            return ViewPhase::Denied(reason.clone());
        }
        if let FetchStatus::Failed(ref reason) = self.fetch {
            return ViewPhase::Unavailable(reason.clone());
        }
        ViewPhase::Pending
    }

    /// Whether the version metadata is available.
    pub fn fetch_state(&self) -> bool {
        matches!(self.fetch, FetchStatus::Loaded(_))
    }

    pub fn fetch(&self) -> &FetchStatus {
        &self.fetch
    }

    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    pub fn imodel_id(&self) -> &str {
        &self.imodel_id
    }

    pub fn auth_ready(&self) -> bool {
        self.auth_ready
    }

    pub fn reporting(&self) -> &InitStatus {
        &self.reporting
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn changeset_id(&self) -> Option<&str> {
        let meta = match self.fetch {
            FetchStatus::Loaded(ref meta) => Some(meta),
            _ => None,
        };
        resolve_changeset_id(self.version_id(), meta)
    }

    pub fn providers(&self) -> ViewerProviderSet {
        ViewerProviderSet::assemble(self.reporting == InitStatus::Initialized)
    }

    /// Launch parameters, present only once the view is ready.
    pub fn launch(&self) -> Option<ViewerLaunch> {
        if !self.mounted {
            return None;
        }
        Some(ViewerLaunch {
            tenant_id: self.project_id.clone().unwrap_or_default(),
            imodel_id: self.imodel_id.clone(),
            changeset_id: self.changeset_id().map(str::to_owned),
            theme: self.theme,
            enable_performance_monitors: true,
            ui_providers: self.providers(),
        })
    }
}
