//! CSV spreadsheet output.
//!
//! One header row (`team`, derived columns, equation names) and one row per
//! team, quoted per RFC 4180.

use std::path::Path;

use anyhow::{Context, Result};

use scoutsheet_core::report::{ScoreReport, TeamRow};

/// Quote a field if it contains a delimiter, quote or line break.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_record<I, S>(out: &mut String, fields: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let line: Vec<String> = fields.into_iter().map(|f| csv_escape(f.as_ref())).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

/// Render the report as CSV, rows in the given order.
pub fn generate_csv(report: &ScoreReport, rows: &[&TeamRow]) -> String {
    let mut csv = String::new();
    push_record(&mut csv, report.headers());

    for row in rows {
        let fields = std::iter::once(row.team.clone())
            .chain(row.cells.iter().cloned())
            .chain(row.scores.iter().map(|s| s.to_string()));
        push_record(&mut csv, fields);
    }

    csv
}

/// Write a CSV report, ranked by `sort_by` when it names an equation.
pub fn write_csv_report(report: &ScoreReport, sort_by: Option<&str>, path: &Path) -> Result<()> {
    let rows = match sort_by {
        Some(equation) => report.ranked_by(equation),
        None => report.rows.iter().collect(),
    };
    let csv = generate_csv(report, &rows);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, csv)
        .with_context(|| format!("failed to write CSV report to {}", path.display()))?;
    Ok(())
}
