//! Score report types with JSON persistence.

use std::cmp::Ordering;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A complete scoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Derived column headers, in schema order.
    pub columns: Vec<String>,
    /// Formatted equation names, one scored column each.
    pub equations: Vec<String>,
    /// One row per team.
    pub rows: Vec<TeamRow>,
    /// Recoverable problems hit while scoring.
    #[serde(default)]
    pub diagnostics: Vec<ScoreDiagnostic>,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// One team's row: derived column cells then equation scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRow {
    pub team: String,
    /// Aligned with [`ScoreReport::columns`].
    pub cells: Vec<String>,
    /// Aligned with [`ScoreReport::equations`].
    pub scores: Vec<f64>,
}

/// A non-fatal problem attributed to a team (and equation, if any).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDiagnostic {
    pub team: String,
    #[serde(default)]
    pub equation: Option<String>,
    pub message: String,
}

impl ScoreReport {
    /// Full header row: `team`, derived columns, then equation names.
    pub fn headers(&self) -> Vec<String> {
        std::iter::once("team".to_string())
            .chain(self.columns.iter().cloned())
            .chain(self.equations.iter().cloned())
            .collect()
    }

    /// Index of an equation by name, matched case-insensitively.
    pub fn equation_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.equations
            .iter()
            .position(|e| e.eq_ignore_ascii_case(name))
    }

    /// Rows ordered by the given equation's score, highest first. Ties keep
    /// their input order. Unknown equations return rows unchanged.
    pub fn ranked_by(&self, equation: &str) -> Vec<&TeamRow> {
        let mut rows: Vec<&TeamRow> = self.rows.iter().collect();
        if let Some(index) = self.equation_index(equation) {
            rows.sort_by(|a, b| {
                let a = a.scores.get(index).copied().unwrap_or(0.0);
                let b = b.scores.get(index).copied().unwrap_or(0.0);
                b.partial_cmp(&a).unwrap_or(Ordering::Equal)
            });
        }
        rows
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: ScoreReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_report() -> ScoreReport {
        ScoreReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            columns: vec!["auto_points".into()],
            equations: vec!["Total Score".into(), "Auto".into()],
            rows: vec![
                TeamRow {
                    team: "1".into(),
                    cells: vec!["4".into()],
                    scores: vec![9.0, 4.0],
                },
                TeamRow {
                    team: "2".into(),
                    cells: vec!["8".into()],
                    scores: vec![20.0, 8.0],
                },
                TeamRow {
                    team: "3".into(),
                    cells: vec!["1".into()],
                    scores: vec![9.0, 1.0],
                },
            ],
            diagnostics: vec![],
            duration_ms: 3,
        }
    }

    #[test]
    fn headers_combine_columns_and_equations() {
        assert_eq!(
            make_report().headers(),
            vec!["team", "auto_points", "Total Score", "Auto"]
        );
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let report = make_report();
        let teams: Vec<&str> = report
            .ranked_by("total score")
            .iter()
            .map(|r| r.team.as_str())
            .collect();
        assert_eq!(teams, vec!["2", "1", "3"]);

        let unranked: Vec<&str> = report
            .ranked_by("missing")
            .iter()
            .map(|r| r.team.as_str())
            .collect();
        assert_eq!(unranked, vec!["1", "2", "3"]);
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = ScoreReport::load_json(&path).unwrap();

        assert_eq!(loaded.equations, report.equations);
        assert_eq!(loaded.rows, report.rows);
    }
}
