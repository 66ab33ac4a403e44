//! `view`: open a view session and report what the viewer launches with.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tabled::Tabled;
use tokio::sync::watch;

use twinview_config::Config;
use twinview_core::{
    CapabilityProvider, CoreError, InitStatus, NoopReporting, SessionDeps, ThemeSource, ViewModel,
    ViewPhase, ViewRoute, ViewSession, ViewerLaunch, build_client,
};

use crate::cli::{GlobalOpts, ViewArgs};
use crate::commands::util::{self, Presentation};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Report types ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewReport {
    route: String,
    launch: ViewerLaunch,
    warnings: Vec<String>,
}

#[derive(Tabled)]
struct ProviderRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Provider")]
    id: &'static str,
    #[tabled(rename = "Options")]
    options: String,
}

fn provider_row(position: usize, provider: &CapabilityProvider) -> ProviderRow {
    let options = match provider {
        CapabilityProvider::ContentTools(opts) => {
            format!("verticalMeasureGroup={}", opts.vertical_measure_group)
        }
        CapabilityProvider::PropertyGrid(opts) => {
            format!("enableCopyingPropertyText={}", opts.enable_copying_property_text)
        }
        _ => "-".into(),
    };
    ProviderRow {
        position: position + 1,
        id: provider.id(),
        options,
    }
}

fn detail(report: &ViewReport, color: bool) -> String {
    let launch = &report.launch;
    let mut out = output::render_detail(&[
        ("Route", report.route.clone()),
        ("Phase", output::verdict("READY", true, color)),
        ("Tenant", launch.tenant_id.clone()),
        ("iModel", launch.imodel_id.clone()),
        (
            "Changeset",
            launch
                .changeset_id
                .clone()
                .unwrap_or_else(|| "latest".into()),
        ),
        ("Theme", launch.theme.to_string()),
        (
            "Performance monitors",
            launch.enable_performance_monitors.to_string(),
        ),
    ]);

    let rows: Vec<ProviderRow> = launch
        .ui_providers
        .iter()
        .enumerate()
        .map(|(i, p)| provider_row(i, p))
        .collect();
    out.push('\n');
    if rows.is_empty() {
        out.push_str("No capability providers");
    } else {
        out.push_str(&output::render_table(&rows));
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

fn resolve_route(args: &ViewArgs) -> Result<ViewRoute, CliError> {
    if let Some(ref raw) = args.route {
        return raw.parse::<ViewRoute>().map_err(|e| CoreError::from(e).into());
    }
    match (&args.project, &args.imodel) {
        (Some(project), Some(imodel)) => {
            let route = ViewRoute::new(project.clone(), imodel.clone());
            Ok(match args.named_version {
                Some(ref version) => route.with_version(version.clone()),
                None => route,
            })
        }
        _ => Err(CliError::Validation {
            field: "view".into(),
            reason: "pass a route, or both --project and --imodel".into(),
        }),
    }
}

/// Settled, and with a mounted viewer also past reporting startup, so
/// the provider list is final.
fn is_final(model: &ViewModel) -> bool {
    match model.phase() {
        ViewPhase::Pending => false,
        ViewPhase::Ready => *model.reporting() != InitStatus::Pending,
        ViewPhase::Denied(_) | ViewPhase::Unavailable(_) => true,
    }
}

pub async fn handle(args: &ViewArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let present = Presentation::new(global, cfg);
    let route = resolve_route(args)?;
    let gate = config::gate(global, cfg)?;

    // Deny before asking for credentials.
    gate.check(Some(&route.project_id)).map_err(CoreError::from)?;

    let api = config::api_config(global, cfg)?;
    let client = build_client(&api)?;

    let route_label = route.to_string();
    let request = route.into_request(api.access_token.clone());
    let (_auth_tx, auth_rx) = watch::channel(request.access_token.is_some());
    let theme = ThemeSource::new(config::theme(args.theme, cfg));
    if let Some(ref classes) = args.theme_classes {
        theme.observe_class_list(classes);
    }

    let session = ViewSession::open(
        &request,
        &gate,
        SessionDeps {
            lookup: Arc::new(client),
            reporting: Arc::new(NoopReporting),
            auth: auth_rx,
            theme: theme.subscribe(),
        },
        cfg.session_options(),
    );

    let bar = util::spinner("Resolving view", present.quiet);
    let wait = Duration::from_secs(args.wait);
    let settled = tokio::time::timeout(wait, session.wait_until(is_final)).await;
    util::finish(bar);
    session.close().await;

    let model = settled.map_err(|_| CliError::Timeout {
        seconds: wait.as_secs(),
    })?;

    for warning in model.warnings() {
        present.notice(&format!("warning: {warning}"));
    }

    match model.phase() {
        ViewPhase::Ready => {
            let launch = model
                .launch()
                .ok_or_else(|| CliError::Internal("ready view without launch parameters".into()))?;
            let report = ViewReport {
                route: route_label,
                launch,
                warnings: model.warnings().to_vec(),
            };
            let rendered = output::render_single(
                present.format,
                &report,
                |r| detail(r, present.color),
                |r| r.launch.ui_providers.ids().join("\n"),
            )?;
            present.print(&rendered);
            Ok(())
        }
        ViewPhase::Denied(reason) => Err(CliError::Denied { reason }),
        ViewPhase::Unavailable(reason) => Err(CliError::Unavailable { reason }),
        ViewPhase::Pending => Err(CliError::Internal("view did not settle".into())),
    }
}
