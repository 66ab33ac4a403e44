// ── View session ──
//
// Drives one `ViewModel` from the outside world: gates the tenant, runs
// the named-version lookup and the reporting initialization as
// independent tasks, and follows the auth and theme signals. All state
// lives in a single `watch` channel; tasks mutate it with `send_modify`.
// The session's cancellation token is keyed to its lifetime, so a
// completion that lands after `close()` (or drop) is discarded.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SessionOptions;
use crate::error::CoreError;
use crate::readiness::{ViewModel, ViewPhase, ViewRequest, VersionMetadata};
use crate::tenant::TenantGate;
use crate::theme::Theme;

// ── Seams ────────────────────────────────────────────────────────────

/// Source of named-version metadata.
pub trait VersionLookup: Send + Sync + 'static {
    fn named_version(
        &self,
        imodel_id: &str,
        version_id: &str,
    ) -> impl Future<Output = Result<VersionMetadata, CoreError>> + Send;
}

impl VersionLookup for twinview_api::ITwinClient {
    async fn named_version(
        &self,
        imodel_id: &str,
        version_id: &str,
    ) -> Result<VersionMetadata, CoreError> {
        Ok(self.get_named_version(imodel_id, version_id).await?.into())
    }
}

/// The reporting subsystem whose startup gates capability providers.
pub trait ReportingInitializer: Send + Sync + 'static {
    fn initialize(&self) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Reporting subsystem with nothing to start; initializes immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporting;

impl ReportingInitializer for NoopReporting {
    async fn initialize(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

// ── ViewSession ──────────────────────────────────────────────────────

/// Collaborators a session is opened with.
pub struct SessionDeps<L, R> {
    pub lookup: Arc<L>,
    pub reporting: Arc<R>,
    /// Auth client readiness (signed in or not).
    pub auth: watch::Receiver<bool>,
    pub theme: watch::Receiver<Theme>,
}

/// One open view. Dropping it cancels every outstanding task.
pub struct ViewSession {
    state: Arc<watch::Sender<ViewModel>>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl ViewSession {
    /// Open a view. Must be called from within a tokio runtime.
    ///
    /// A request the gate rejects settles immediately in
    /// [`ViewPhase::Denied`] without spawning anything.
    pub fn open<L, R>(
        request: &ViewRequest,
        gate: &TenantGate,
        deps: SessionDeps<L, R>,
        options: SessionOptions,
    ) -> Self
    where
        L: VersionLookup,
        R: ReportingInitializer,
    {
        let SessionDeps {
            lookup,
            reporting,
            auth,
            theme,
        } = deps;
        let cancel = CancellationToken::new();
        let initial_theme = *theme.borrow();

        if let Err(denied) = gate.check(request.project_id.as_deref()) {
            info!(imodel_id = %request.imodel_id, "view denied by tenant gate");
            let (tx, _) = watch::channel(ViewModel::rejected(
                request,
                initial_theme,
                denied.to_string(),
            ));
            return Self {
                state: Arc::new(tx),
                cancel,
                tasks: Vec::new(),
            };
        }

        let model = ViewModel::new(request, *auth.borrow(), initial_theme);
        let (tx, _) = watch::channel(model);
        let state = Arc::new(tx);
        let mut tasks = Vec::with_capacity(4);

        if let Some(ref version_id) = request.version_id {
            tasks.push(spawn_fetch(
                lookup,
                request.imodel_id.clone(),
                version_id.clone(),
                options.fetch_timeout,
                Arc::clone(&state),
                cancel.clone(),
            ));
        }
        tasks.push(spawn_reporting(
            reporting,
            options.init_timeout,
            Arc::clone(&state),
            cancel.clone(),
        ));
        tasks.push(spawn_signal(
            auth,
            Arc::clone(&state),
            cancel.clone(),
            ViewModel::set_auth_ready,
        ));
        tasks.push(spawn_signal(
            theme,
            Arc::clone(&state),
            cancel.clone(),
            ViewModel::set_theme,
        ));

        debug!(
            imodel_id = %request.imodel_id,
            version_id = ?request.version_id,
            "view session opened"
        );
        Self {
            state,
            cancel,
            tasks,
        }
    }

    pub fn phase(&self) -> ViewPhase {
        self.state.borrow().phase()
    }

    /// Subscribe to every state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewModel> {
        self.state.subscribe()
    }

    /// Wait until `predicate` holds for the state, returning that state.
    ///
    /// The session owns the sender, so the channel outlives the wait.
    pub async fn wait_until(&self, predicate: impl FnMut(&ViewModel) -> bool) -> ViewModel {
        let mut rx = self.state.subscribe();
        match rx.wait_for(predicate).await {
            Ok(model) => model.clone(),
            Err(_) => self.state.borrow().clone(),
        }
    }

    /// Wait until the view leaves `Pending`, bounded by `timeout`.
    pub async fn settled(&self, timeout: Duration) -> Result<ViewModel, CoreError> {
        tokio::time::timeout(timeout, self.wait_until(|m| m.phase().is_settled()))
            .await
            .map_err(|_| CoreError::Timeout {
                timeout_secs: timeout.as_secs(),
            })
    }

    /// Tear down: cancel outstanding work and wait for tasks to finish.
    pub async fn close(mut self) {
        self.cancel.cancel();
        for handle in self.tasks.drain(..) {
            let _ = handle.await;
        }
        debug!("view session closed");
    }
}

impl Drop for ViewSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Tasks ────────────────────────────────────────────────────────────

fn spawn_fetch<L: VersionLookup>(
    lookup: Arc<L>,
    imodel_id: String,
    version_id: String,
    timeout: Duration,
    state: Arc<watch::Sender<ViewModel>>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let lookup_fut = tokio::time::timeout(timeout, lookup.named_version(&imodel_id, &version_id));
        let outcome = tokio::select! {
            () = cancel.cancelled() => {
                debug!(%version_id, "named version lookup cancelled");
                return;
            }
            res = lookup_fut => match res {
                Ok(Ok(meta)) => Ok(meta),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(format!(
                    "named version lookup timed out after {}s",
                    timeout.as_secs()
                )),
            },
        };

        if cancel.is_cancelled() {
            debug!(%version_id, "discarding late named version result");
            return;
        }
        match outcome {
            Ok(ref meta) => debug!(%version_id, changeset_id = ?meta.changeset_id, "named version resolved"),
            Err(ref reason) => warn!(%version_id, %reason, "named version unavailable"),
        }
        state.send_modify(|m| m.record_fetch(outcome));
    })
}

fn spawn_reporting<R: ReportingInitializer>(
    reporting: Arc<R>,
    timeout: Duration,
    state: Arc<watch::Sender<ViewModel>>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let init_fut = tokio::time::timeout(timeout, reporting.initialize());
        let outcome = tokio::select! {
            () = cancel.cancelled() => return,
            res = init_fut => match res {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(format!("timed out after {}s", timeout.as_secs())),
            },
        };

        if cancel.is_cancelled() {
            debug!("discarding late reporting initialization");
            return;
        }
        if let Err(ref reason) = outcome {
            warn!(%reason, "reporting initialization failed; capability providers disabled");
        }
        state.send_modify(|m| m.record_reporting(outcome));
    })
}

/// Forward every change of an external signal into the model.
fn spawn_signal<T>(
    mut rx: watch::Receiver<T>,
    state: Arc<watch::Sender<ViewModel>>,
    cancel: CancellationToken,
    apply: fn(&mut ViewModel, T),
) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        // Publisher gone; the last value stays in effect.
                        break;
                    }
                    let value = rx.borrow_and_update().clone();
                    state.send_modify(|m| apply(m, value));
                }
            }
        }
    })
}
