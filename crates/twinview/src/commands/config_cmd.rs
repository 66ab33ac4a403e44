//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::commands::util::Presentation;
use crate::config;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let mut cfg = config::load(global)?;
            if cfg.api.access_token.is_some() {
                cfg.api.access_token = Some(REDACTED.into());
            }
            let present = Presentation::new(global, &cfg);

            let rendered = match present.format {
                OutputFormat::Table | OutputFormat::Plain => {
                    toml::to_string_pretty(&cfg).map_err(|e| CliError::Internal(e.to_string()))?
                }
                format => output::render_single(format, &cfg, |_| String::new(), |_| String::new())?,
            };
            present.print(rendered.trim_end());
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path(global).display());
            Ok(())
        }
    }
}
