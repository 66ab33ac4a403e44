//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod check;
pub mod config_cmd;
pub mod imodel;
pub mod util;
pub mod view;

use twinview_config::Config;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a config-bound command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    match cmd {
        Command::Check(args) => check::handle(&args, global, cfg),
        Command::Imodel(args) => imodel::handle(&args, global, cfg).await,
        Command::View(args) => view::handle(&args, global, cfg).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command must be handled before dispatch".into(),
        )),
    }
}
