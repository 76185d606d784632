//! The `scoutsheet explain` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use scoutsheet_core::config::load_config;
use scoutsheet_ingest::load_team_file;

pub fn execute(config_path: PathBuf, team_path: PathBuf, team_number_key: String) -> Result<()> {
    let config = load_config(&config_path)?;
    let teams = load_team_file(&team_path, &team_number_key)
        .with_context(|| format!("failed to load team record: {}", team_path.display()))?;
    let team = teams
        .first()
        .with_context(|| format!("no team records in {}", team_path.display()))?;

    println!("Team {}", team.number);

    for equation in &config.equations {
        let evaluation = equation.evaluate(&config.schema, team);
        println!("\n{}", equation.display_name());
        println!("  template:   {}", equation.template());
        println!("  expression: {}", evaluation.expression);
        println!("  score:      {}", evaluation.value);
        for d in &evaluation.diagnostics {
            println!("  WARNING: {d}");
        }
    }

    if teams.len() > 1 {
        eprintln!(
            "\n{} more record(s) in {} not shown.",
            teams.len() - 1,
            team_path.display()
        );
    }

    Ok(())
}
