//! `imodel`: fetch an iModel and show the header button model for it.

use twinview_config::Config;
use twinview_core::{CoreError, IModelHeader, build_client};

use crate::cli::{GlobalOpts, ImodelArgs};
use crate::commands::util::{self, Presentation};
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: &ImodelArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let present = Presentation::new(global, cfg);

    // A denied project never gets a header.
    let gate = config::gate(global, cfg)?;
    gate.check(Some(&args.project)).map_err(CoreError::from)?;

    let api = config::api_config(global, cfg)?;
    let client = build_client(&api)?;

    let bar = util::spinner("Fetching iModel", present.quiet);
    let fetched = client.get_imodel(&args.imodel_id).await;
    util::finish(bar);
    let imodel = fetched.map_err(CoreError::from)?;

    let header = IModelHeader::build(
        Some(&imodel),
        &args.imodel_id,
        &args.project,
        &args.section,
        api.environment,
    );

    let rendered = output::render_single(
        present.format,
        &header,
        |h| {
            output::render_detail(&[
                ("Name", h.name.clone()),
                ("Description", util::or_dash(h.description.as_deref())),
                ("Active", h.is_active.to_string()),
                ("Navigate to", h.navigate_to.clone()),
                (
                    "Thumbnail",
                    util::or_dash(h.thumbnail.as_ref().map(|t| t.imodel_id.as_str())),
                ),
            ])
        },
        |h| h.name.clone(),
    )?;
    present.print(&rendered);
    Ok(())
}
