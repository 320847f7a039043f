//! Terminal and JSON-lines output for CLI handlers.
//!
//! Every human-readable line has a JSON counterpart of the form
//! `{"type": ..., "payload": ...}` so scripts can consume a run with
//! `--json`. Quiet mode drops everything except warnings and errors.

use std::fmt::Display;

use owo_colors::OwoColorize;
use parking_lot::RwLock;
use serde_json::{json, Value};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Output flags taken from the global CLI arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    /// Count of `-v` flags.
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static OUTPUT: RwLock<OutputConfig> = RwLock::new(OutputConfig::new(false, false, 0));

/// Install the flags for the rest of the process.
pub fn configure(config: OutputConfig) {
    *OUTPUT.write() = config;
}

fn current() -> OutputConfig {
    *OUTPUT.read()
}

#[must_use]
pub fn is_json() -> bool {
    current().json
}

#[must_use]
pub fn is_quiet() -> bool {
    current().quiet
}

#[must_use]
pub fn verbosity() -> u8 {
    current().verbose
}

/// Whether a line survives quiet mode.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Level {
    Regular,
    Important,
}

/// Print one line, either as a JSON record or as rendered text.
fn emit(kind: &str, level: Level, payload: Value, render: impl FnOnce() -> String) {
    let config = current();
    if config.json {
        println!("{}", json!({ "type": kind, "payload": payload }));
        return;
    }
    if config.quiet && level == Level::Regular {
        return;
    }
    println!("{}", render());
}

/// Program name and version.
pub fn header(version: &str) {
    emit(
        "header",
        Level::Regular,
        json!({ "app": "rosterforge", "version": version }),
        || format!("{} {}\n", "rosterforge".bold(), version.dimmed()),
    );
}

pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit(
        "field",
        Level::Regular,
        json!({ "label": label, "value": value }),
        || format!("  {:<12} {}", label.dimmed(), value),
    );
}

pub fn section(title: &str) {
    emit("section", Level::Regular, json!({ "title": title }), || {
        format!("\n{}", title.bold())
    });
}

pub fn success(message: &str) {
    emit(
        "success",
        Level::Regular,
        json!({ "message": message }),
        || format!("  {} {}", "✓".green(), message),
    );
}

pub fn warning(message: &str) {
    emit(
        "warning",
        Level::Important,
        json!({ "message": message }),
        || format!("  {} {}", "⚠".yellow(), message),
    );
}

pub fn note(message: &str) {
    emit("note", Level::Regular, json!({ "message": message }), || {
        format!("  {}", message.dimmed())
    });
}

pub fn hint(message: &str) {
    emit("hint", Level::Regular, json!({ "message": message }), || {
        format!("  {}: {}", "hint".cyan().dimmed(), message.dimmed())
    });
}

/// Errors always go to stderr.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        eprintln!("  {} {}", "×".red(), message);
    }
}

/// Render rows as an indented table. In JSON mode the rows are emitted
/// as a list of `{header: cell}` objects.
pub fn table<R: Tabled>(rows: &[R]) {
    let headers: Vec<String> = R::headers().into_iter().map(|h| h.to_string()).collect();
    let records: Vec<Value> = rows
        .iter()
        .map(|row| {
            let cells = row.fields();
            let record: serde_json::Map<String, Value> = headers
                .iter()
                .zip(cells)
                .map(|(h, c)| (h.clone(), Value::String(c.to_string())))
                .collect();
            Value::Object(record)
        })
        .collect();

    emit("table", Level::Regular, json!({ "rows": records }), || {
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        table
            .to_string()
            .lines()
            .map(|line| format!("  {line}"))
            .collect::<Vec<_>>()
            .join("\n")
    });
}

/// Print a complete JSON document on its own line.
pub fn document(value: &Value) {
    println!("{value}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configure_replaces_flags() {
        configure(OutputConfig::new(false, true, 2));
        assert!(is_quiet());
        assert!(!is_json());
        assert_eq!(verbosity(), 2);
        configure(OutputConfig::default());
        assert!(!is_quiet());
        assert_eq!(verbosity(), 0);
    }
}
