//! Output formatting: table, JSON, YAML, plain.
//!
//! Table uses `tabled`, structured formats use serde, plain emits one
//! value per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// A status word, green on success and red otherwise.
pub fn verdict(label: &str, ok: bool, color: bool) -> String {
    match (color, ok) {
        (false, _) => label.to_owned(),
        (true, true) => label.green().bold().to_string(),
        (true, false) => label.red().bold().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a single item. `detail_fn` produces the table view.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Two-column key/value table for detail views.
pub fn render_detail(pairs: &[(&str, String)]) -> String {
    #[derive(Tabled)]
    struct Field {
        #[tabled(rename = "Field")]
        key: String,
        #[tabled(rename = "Value")]
        value: String,
    }

    let rows: Vec<Field> = pairs
        .iter()
        .map(|(key, value)| Field {
            key: (*key).to_owned(),
            value: value.clone(),
        })
        .collect();
    render_table(&rows)
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(rendered)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        id: &'static str,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: &'static str,
    }

    fn single(format: OutputFormat) -> String {
        render_single(format, &Item { id: "a" }, |_| "detail".into(), |i| i.id.into()).unwrap()
    }

    #[test]
    fn plain_emits_the_id() {
        assert_eq!(single(OutputFormat::Plain), "a");
        assert_eq!(single(OutputFormat::Table), "detail");
    }

    #[test]
    fn compact_json_is_single_line() {
        assert_eq!(single(OutputFormat::JsonCompact), r#"{"id":"a"}"#);
        assert!(single(OutputFormat::Json).contains('\n'));
    }

    #[test]
    fn table_has_rounded_borders_and_headers() {
        let out = render_table(&[ItemRow { id: "a" }, ItemRow { id: "b" }]);
        assert!(out.contains("ID"));
        assert!(out.contains('╭'));
    }

    #[test]
    fn detail_lists_fields_in_order() {
        let out = render_detail(&[("Name", "Bridge".into()), ("Active", "true".into())]);
        let name = out.find("Bridge").unwrap();
        let active = out.find("true").unwrap();
        assert!(name < active);
    }

    #[test]
    fn verdict_without_color_is_plain() {
        assert_eq!(verdict("ALLOWED", true, false), "ALLOWED");
        assert!(verdict("DENIED", false, true).contains("\u{1b}["));
    }
}
