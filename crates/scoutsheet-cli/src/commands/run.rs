//! The `scoutsheet run` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use scoutsheet_core::config::load_config as load_form_config;
use scoutsheet_core::engine::{ScoringEngine, ScoringReporter};
use scoutsheet_core::report::{ScoreDiagnostic, ScoreReport, TeamRow};
use scoutsheet_ingest::{load_config_from, load_team_directory};
use scoutsheet_report::csv::write_csv_report;
use scoutsheet_report::html::write_html_report;

/// Console progress reporter.
struct ConsoleReporter;

impl ScoringReporter for ConsoleReporter {
    fn on_team_scored(&self, row: &TeamRow) {
        let scores: Vec<String> = row.scores.iter().map(|s| s.to_string()).collect();
        eprintln!("  Scored: team {} [{}]", row.team, scores.join(", "));
    }

    fn on_diagnostic(&self, diagnostic: &ScoreDiagnostic) {
        match &diagnostic.equation {
            Some(eq) => eprintln!(
                "  WARNING: team {} :: {eq}: {}",
                diagnostic.team, diagnostic.message
            ),
            None => eprintln!(
                "  WARNING: team {}: {}",
                diagnostic.team, diagnostic.message
            ),
        }
    }

    fn on_complete(&self, teams: usize, equations: usize, diagnostics: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {teams} teams x {equations} equations, {diagnostics} warnings ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub fn execute(
    teams_dir: PathBuf,
    form_config: Option<PathBuf>,
    settings_path: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<String>,
    sort_by: Option<String>,
) -> Result<()> {
    let settings = load_config_from(settings_path.as_deref())?;
    tracing::debug!("settings: {settings:?}");

    let form_path = form_config.unwrap_or(settings.form_config);
    let output = output.unwrap_or(settings.output_dir);
    let sort_by = sort_by.or(settings.sort_by);

    let formats: Vec<String> = match format {
        Some(f) if f == "all" => vec!["csv".into(), "html".into(), "json".into()],
        Some(f) => f.split(',').map(|s| s.trim().to_string()).collect(),
        None => settings.formats,
    };

    let form = load_form_config(&form_path)?;
    if !form.diagnostics.is_empty() {
        eprintln!(
            "Warning: {} line(s) of {} could not be loaded; run `scoutsheet validate` for details.",
            form.diagnostics.len(),
            form_path.display()
        );
    }
    if form.equations.is_empty() {
        eprintln!(
            "Warning: no equations found in {}; only field columns will be reported.",
            form_path.display()
        );
    }

    let teams = load_team_directory(&teams_dir, &settings.team_number_key)?;

    let sort_by = sort_by.or_else(|| form.equations.first().map(|e| e.display_name()));

    eprintln!(
        "scoutsheet v{} - Scoring {} teams x {} equations",
        env!("CARGO_PKG_VERSION"),
        teams.len(),
        form.equations.len()
    );
    eprintln!();

    let engine = ScoringEngine::new(form.schema, form.equations);
    let report = engine.run(&teams, &ConsoleReporter);

    if let Some(name) = &sort_by {
        if report.equation_index(name).is_none() {
            eprintln!("Warning: no equation named '{name}', keeping input order.");
        }
    }

    print_summary(&report, sort_by.as_deref());

    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    for fmt in &formats {
        match fmt.as_str() {
            "csv" => {
                let path = output.join(format!("scores-{timestamp}.csv"));
                write_csv_report(&report, sort_by.as_deref(), &path)?;
                eprintln!("CSV report: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("scores-{timestamp}.html"));
                write_html_report(&report, sort_by.as_deref(), &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            "json" => {
                let path = output.join(format!("scores-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

fn print_summary(report: &ScoreReport, sort_by: Option<&str>) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    let mut header = vec!["Rank".to_string(), "Team".to_string()];
    header.extend(report.equations.iter().cloned());
    table.set_header(header);

    let rows = match sort_by {
        Some(name) => report.ranked_by(name),
        None => report.rows.iter().collect(),
    };

    for (rank, row) in rows.iter().enumerate() {
        let mut cells = vec![Cell::new(rank + 1), Cell::new(&row.team)];
        cells.extend(row.scores.iter().map(|s| Cell::new(format!("{s:.2}"))));
        table.add_row(cells);
    }

    println!("{table}");
}
