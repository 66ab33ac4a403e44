//! Clap derive structures for the `twinview` CLI.
//!
//! Only depends on clap + clap_complete so `build.rs` can include it for
//! man page generation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// twinview -- tenant-gated iTwin viewer sessions from the command line
#[derive(Debug, Parser)]
#[command(
    name = "twinview",
    version,
    about = "Gate, inspect and launch iTwin viewer sessions",
    long_about = "Checks projects against the configured tenant allow-list, resolves\n\
        iModel headers and named versions from the iTwin Platform, and reports\n\
        the parameters a viewer would be launched with.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "TWINVIEW_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format [default: table]
    #[arg(long, short = 'o', env = "TWINVIEW_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Platform environment (overrides config)
    #[arg(long = "env", global = true)]
    pub environment: Option<EnvironmentArg>,

    /// API root override
    #[arg(long, env = "TWINVIEW_API_URL", global = true, hide = true)]
    pub api_url: Option<String>,

    /// Bearer access token
    #[arg(long, env = "TWINVIEW_ACCESS_TOKEN", global = true, hide_env = true)]
    pub access_token: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "TWINVIEW_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// How project ids are matched against the allow-list
    #[arg(long, global = true)]
    pub match_mode: Option<MatchModeArg>,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnvironmentArg {
    #[value(alias = "prod")]
    Production,
    Qa,
    Dev,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchModeArg {
    /// Exact membership in the allow-list
    Exact,
    /// Legacy substring containment
    Substring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a project id against the tenant allow-list
    Check(CheckArgs),

    /// Show the header for an iModel
    #[command(alias = "header")]
    Imodel(ImodelArgs),

    /// Resolve a view and print its launch parameters
    View(ViewArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Project (iTwin) id to check
    pub project_id: String,
}

#[derive(Debug, Args)]
pub struct ImodelArgs {
    /// iModel id
    pub imodel_id: String,

    /// Project (iTwin) the iModel belongs to
    #[arg(long, short = 'p')]
    pub project: String,

    /// Section the header is shown in
    #[arg(long, default_value = "browse")]
    pub section: String,
}

#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Route: [section/]project/<id>/imodel/<id>[/version/<id>]
    #[arg(conflicts_with_all = ["project", "imodel", "named_version"])]
    pub route: Option<String>,

    /// Project (iTwin) id
    #[arg(long, short = 'p', requires = "imodel", required_unless_present = "route")]
    pub project: Option<String>,

    /// iModel id
    #[arg(long, short = 'm', requires = "project")]
    pub imodel: Option<String>,

    /// Named version id (omit for the latest state)
    #[arg(long = "named-version", short = 'n', requires = "imodel")]
    pub named_version: Option<String>,

    /// Viewer theme (overrides config)
    #[arg(long)]
    pub theme: Option<ThemeArg>,

    /// Derive the theme from a document class list (`iui-theme-dark` selects dark)
    #[arg(long, value_name = "CLASSES", conflicts_with = "theme")]
    pub theme_classes: Option<String>,

    /// Maximum seconds to wait for the view to settle
    #[arg(long, default_value = "60")]
    pub wait: u64,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration (token redacted)
    Show,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
