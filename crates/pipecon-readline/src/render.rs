//! Terminal output.

use colored::Colorize;
use serde_json::Value;

use pipecon_application::overview::Metrics;
use pipecon_core::{AuditEntry, LogLevel, Outcome};

use crate::commands::COMMANDS;

const CELL_WIDTH: usize = 36;

pub fn success(message: impl AsRef<str>) {
    println!("{}", message.as_ref().green());
}

pub fn note(message: impl AsRef<str>) {
    println!("{}", message.as_ref().bright_black());
}

pub fn warning(message: impl AsRef<str>) {
    println!("{}", message.as_ref().yellow());
}

pub fn error(err: &anyhow::Error) {
    eprintln!("{}", format!("Error: {err:#}").red());
}

/// Prints a completed outcome with `describe`, or the skip reason.
pub fn outcome<T>(outcome: Outcome<T>, describe: impl FnOnce(T) -> String) {
    match outcome {
        Outcome::Completed(value) => success(describe(value)),
        Outcome::Skipped { reason } => warning(reason),
    }
}

pub fn help() {
    println!("{}", "Commands".bright_magenta().bold());
    for (name, about) in COMMANDS {
        println!("  {:<12} {}", name.bright_cyan(), about);
    }
}

pub fn metrics(metrics: &Metrics) {
    println!("{}", "Overview".bright_magenta().bold());
    println!("  Crawler batches    {}", metrics.crawler_batches);
    println!("  Posts parsed       {}", metrics.posts_parsed);
    println!("  Vectors staged     {}", metrics.vectors_staged);
    println!("  Reports generated  {}", metrics.reports_generated);
}

pub fn json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}

pub fn table(records: &[Value]) {
    if records.is_empty() {
        note("(empty)");
        return;
    }
    for line in format_table(records) {
        println!("{line}");
    }
}

pub fn log_entries(entries: &[AuditEntry]) {
    if entries.is_empty() {
        note("No log entries.");
        return;
    }
    for entry in entries {
        let level = match &entry.level {
            LogLevel::Warn => entry.level.as_str().yellow(),
            LogLevel::Error => entry.level.as_str().red(),
            LogLevel::Info => entry.level.as_str().green(),
            LogLevel::Custom(_) => entry.level.as_str().normal(),
        };
        println!(
            "{} {:<5} {} {} {}",
            entry.ts.bright_black(),
            level,
            entry.event.bright_cyan(),
            entry.trace_id.as_str().bright_black(),
            entry.data
        );
    }
}

fn cell(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    let text = text.replace('\n', " ");
    if text.chars().count() > CELL_WIDTH {
        let head: String = text.chars().take(CELL_WIDTH - 3).collect();
        format!("{head}...")
    } else {
        text
    }
}

/// Lays records out as columns keyed by the first record's fields.
///
/// Non-object records are printed one per row as JSON.
pub fn format_table(records: &[Value]) -> Vec<String> {
    let Some(Value::Object(first)) = records.first() else {
        return records.iter().map(|r| cell(Some(r))).collect();
    };
    let columns: Vec<&String> = first.keys().collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| columns.iter().map(|col| cell(record.get(col.as_str()))).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(col.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render_row = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render_row(columns.iter().map(|c| c.to_string()).collect()));
    lines.extend(rows.into_iter().map(render_row));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_table_aligns_columns() {
        let lines = format_table(&[
            json!({"doc_id": "d1", "vector": "[embedding]"}),
            json!({"doc_id": "d10", "vector": "[embedding]"}),
        ]);
        assert_eq!(
            lines,
            vec![
                "doc_id  vector",
                "d1      [embedding]",
                "d10     [embedding]",
            ]
        );
    }

    #[test]
    fn test_format_table_truncates_long_cells() {
        let long = "x".repeat(100);
        let lines = format_table(&[json!({ "body": long })]);
        assert_eq!(lines[1].chars().count(), CELL_WIDTH);
        assert!(lines[1].ends_with("..."));
    }

    #[test]
    fn test_format_table_missing_fields_are_blank() {
        let lines = format_table(&[json!({"a": 1, "b": 2}), json!({"a": 3})]);
        assert_eq!(lines[2], "3");
    }
}
