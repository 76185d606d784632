//! Batch scoring orchestrator.
//!
//! Scores every team against every equation. Nothing in a batch is fatal:
//! coercion and expression errors become diagnostics and the batch moves on.

use std::time::{Duration, Instant};

use chrono::Utc;
use uuid::Uuid;

use crate::equation::Equation;
use crate::report::{ScoreDiagnostic, ScoreReport, TeamRow};
use crate::schema::Schema;
use crate::team::TeamRecord;

/// Progress reporting trait.
pub trait ScoringReporter {
    fn on_team_scored(&self, row: &TeamRow);
    fn on_diagnostic(&self, diagnostic: &ScoreDiagnostic);
    fn on_complete(&self, teams: usize, equations: usize, diagnostics: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ScoringReporter for NoopReporter {
    fn on_team_scored(&self, _: &TeamRow) {}
    fn on_diagnostic(&self, _: &ScoreDiagnostic) {}
    fn on_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// Scores teams against a fixed schema and set of equations.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    schema: Schema,
    equations: Vec<Equation>,
}

impl ScoringEngine {
    pub fn new(schema: Schema, equations: Vec<Equation>) -> Self {
        Self { schema, equations }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// Score one team: raw column cells plus one score per equation.
    pub fn score_team(&self, team: &TeamRecord) -> (TeamRow, Vec<ScoreDiagnostic>) {
        let mut scores = Vec::with_capacity(self.equations.len());
        let mut diagnostics = Vec::new();

        for equation in &self.equations {
            let evaluation = equation.evaluate(&self.schema, team);
            diagnostics.extend(evaluation.diagnostics.iter().map(|e| ScoreDiagnostic {
                team: team.number.clone(),
                equation: Some(equation.display_name()),
                message: e.to_string(),
            }));
            scores.push(evaluation.value);
        }

        let row = TeamRow {
            team: team.number.clone(),
            cells: self.schema.column_cells(team),
            scores,
        };
        (row, diagnostics)
    }

    /// Score every team and collect the results into a report.
    pub fn run(&self, teams: &[TeamRecord], progress: &dyn ScoringReporter) -> ScoreReport {
        let start = Instant::now();
        let mut rows = Vec::with_capacity(teams.len());
        let mut diagnostics = Vec::new();

        for team in teams {
            let (row, team_diagnostics) = self.score_team(team);
            for d in &team_diagnostics {
                progress.on_diagnostic(d);
            }
            progress.on_team_scored(&row);
            diagnostics.extend(team_diagnostics);
            rows.push(row);
        }

        let elapsed = start.elapsed();
        progress.on_complete(rows.len(), self.equations.len(), diagnostics.len(), elapsed);
        tracing::info!(
            "scored {} teams with {} equations ({} diagnostics)",
            rows.len(),
            self.equations.len(),
            diagnostics.len()
        );

        ScoreReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            columns: self.schema.column_headers(),
            equations: self.equations.iter().map(Equation::display_name).collect(),
            rows,
            diagnostics,
            duration_ms: elapsed.as_millis() as u64,
        }
    }
}
