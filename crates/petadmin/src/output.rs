//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

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

/// Builds `Label: value` detail views, coloring labels when enabled.
pub struct Detail {
    color: bool,
    lines: Vec<String>,
}

impl Detail {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            lines: Vec::new(),
        }
    }

    pub fn field(mut self, label: &str, value: impl std::fmt::Display) -> Self {
        let padded = format!("{:<9}", format!("{label}:"));
        let label = if self.color {
            padded.cyan().bold().to_string()
        } else {
            padded
        };
        self.lines.push(format!("{label} {value}"));
        self
    }

    pub fn optional(self, label: &str, value: Option<&str>) -> Self {
        self.field(label, value.unwrap_or("-"))
    }

    /// Append a nested table under a heading.
    pub fn section<R: Tabled>(mut self, heading: &str, rows: &[R]) -> Self {
        self.lines.push(String::new());
        let heading = if self.color {
            heading.magenta().bold().to_string()
        } else {
            heading.to_owned()
        };
        self.lines.push(heading);
        if rows.is_empty() {
            self.lines.push("(none)".into());
        } else {
            self.lines.push(render_table(rows));
        }
        self
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single-item views are
/// key/value listings rather than tables.
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

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Render(e.to_string()))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        id: u64,
        name: &'static str,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Name")]
        name: &'static str,
    }

    const ITEMS: [Item; 2] = [Item { id: 1, name: "Rex" }, Item { id: 2, name: "Mia" }];

    #[test]
    fn plain_emits_one_id_per_line() {
        let out = render_list(OutputFormat::Plain, &ITEMS, |i| Row { name: i.name }, |i| {
            i.id.to_string()
        })
        .unwrap();
        assert_eq!(out, "1\n2");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_list(OutputFormat::JsonCompact, &ITEMS, |i| Row { name: i.name }, |i| {
            i.id.to_string()
        })
        .unwrap();
        assert_eq!(out, r#"[{"id":1,"name":"Rex"},{"id":2,"name":"Mia"}]"#);
    }

    #[test]
    fn table_has_header_and_rows() {
        let out = render_list(OutputFormat::Table, &ITEMS, |i| Row { name: i.name }, |i| {
            i.id.to_string()
        })
        .unwrap();
        assert!(out.contains("Name"));
        assert!(out.contains("Mia"));
    }

    #[test]
    fn detail_without_color_aligns_labels() {
        let out = Detail::new(false)
            .field("ID", 3)
            .optional("Email", None)
            .finish();
        assert_eq!(out, "ID:       3\nEmail:    -");
    }
}
