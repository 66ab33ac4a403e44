//! `check`: evaluate a project id against the tenant allow-list.

use serde::Serialize;

use twinview_config::Config;
use twinview_core::{CoreError, MatchMode};

use crate::cli::{CheckArgs, GlobalOpts};
use crate::commands::util::Presentation;
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckReport {
    project_id: String,
    authorized: bool,
    match_mode: MatchMode,
    allowed_tenants: usize,
    reason: Option<String>,
}

pub fn handle(args: &CheckArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let present = Presentation::new(global, cfg);
    let gate = config::gate(global, cfg)?;
    let outcome = gate.check(Some(&args.project_id));

    let report = CheckReport {
        project_id: args.project_id.clone(),
        authorized: outcome.is_ok(),
        match_mode: gate.mode(),
        allowed_tenants: gate.allowed().len(),
        reason: outcome.as_ref().err().map(ToString::to_string),
    };

    let rendered = output::render_single(
        present.format,
        &report,
        |r| {
            let status = if r.authorized { "ALLOWED" } else { "DENIED" };
            output::render_detail(&[
                ("Project", r.project_id.clone()),
                ("Verdict", output::verdict(status, r.authorized, present.color)),
                ("Match mode", r.match_mode.to_string()),
                ("Allowed tenants", r.allowed_tenants.to_string()),
            ])
        },
        |r| if r.authorized { "allowed".into() } else { "denied".into() },
    )?;
    present.print(&rendered);

    outcome.map_err(|denied| CoreError::from(denied).into())
}
