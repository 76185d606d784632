//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use scoutsheet_core::report::ScoreReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report, ranking rows by `sort_by` when given.
pub fn generate_html(report: &ScoreReport, sort_by: Option<&str>) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>scoutsheet scores</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>scoutsheet scores</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{} teams | {} equations | {} diagnostics | {}</p>\n",
        report.rows.len(),
        report.equations.len(),
        report.diagnostics.len(),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Score table
    let rows = match sort_by {
        Some(equation) => report.ranked_by(equation),
        None => report.rows.iter().collect(),
    };

    html.push_str("<section class=\"scores\">\n");
    html.push_str("<h2>Scores</h2>\n");
    html.push_str("<table id=\"scores\">\n<thead><tr>");
    for (col, header) in report.headers().iter().enumerate() {
        let class = if col > report.columns.len() {
            " class=\"score\""
        } else {
            ""
        };
        html.push_str(&format!(
            "<th{class} onclick=\"sortTable({col})\">{}</th>",
            html_escape(header)
        ));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in rows {
        html.push_str("<tr>");
        html.push_str(&format!("<td>{}</td>", html_escape(&row.team)));
        for cell in &row.cells {
            html.push_str(&format!("<td>{}</td>", html_escape(cell)));
        }
        for score in &row.scores {
            html.push_str(&format!("<td class=\"score\">{score}</td>"));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Diagnostics
    if !report.diagnostics.is_empty() {
        html.push_str("<section class=\"diagnostics\">\n");
        html.push_str("<h2>Diagnostics</h2>\n<ul>\n");
        for d in &report.diagnostics {
            let equation = d
                .equation
                .as_deref()
                .map(|e| format!(" [{}]", html_escape(e)))
                .unwrap_or_default();
            html.push_str(&format!(
                "<li class=\"fail\">team {}{}: {}</li>\n",
                html_escape(&d.team),
                equation,
                html_escape(&d.message)
            ));
        }
        html.push_str("</ul>\n</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &ScoreReport, sort_by: Option<&str>, path: &Path) -> Result<()> {
    let html = generate_html(report, sort_by);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.score { font-weight: bold; text-align: right; }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('scores');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = parseFloat(va), nb = parseFloat(vb);
    const cmp = !isNaN(na) && !isNaN(nb) ? na - nb : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use scoutsheet_core::report::*;

    fn make_test_report() -> ScoreReport {
        ScoreReport {
            id: uuid::Uuid::nil(),
            created_at: chrono::Utc::now(),
            columns: vec!["auto_points".into()],
            equations: vec!["Total Score".into()],
            rows: vec![
                TeamRow {
                    team: "254".into(),
                    cells: vec!["12".into()],
                    scores: vec![17.0],
                },
                TeamRow {
                    team: "<script>".into(),
                    cells: vec!["N/A".into()],
                    scores: vec![0.0],
                },
            ],
            diagnostics: vec![ScoreDiagnostic {
                team: "<script>".into(),
                equation: Some("Total Score".into()),
                message: "auto_points does not have a numeric value".into(),
            }],
            duration_ms: 12,
        }
    }

    #[test]
    fn html_report_contains_required_elements() {
        let report = make_test_report();
        let html = generate_html(&report, Some("Total Score"));

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Total Score"));
        assert!(html.contains("auto_points does not have a numeric value"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<td><script>"));
    }

    #[test]
    fn html_report_write_to_file() {
        let report = make_test_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");

        write_html_report(&report, None, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
