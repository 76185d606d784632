//! Team record files.
//!
//! Each `.json` or `.toml` file in the data directory holds one flat record,
//! an array of records, or a table with a `teams` array. Scalar values become
//! the raw answer strings the scorer reads.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use scoutsheet_core::team::TeamRecord;

use crate::error::IngestError;

/// Load every record file in a directory, sorted by file name.
///
/// The directory itself must exist: without a data location there is nothing
/// to score. Individual files that fail to load are logged and skipped.
pub fn load_team_directory(dir: &Path, team_number_key: &str) -> Result<Vec<TeamRecord>> {
    if !dir.is_dir() {
        anyhow::bail!("team data directory not found: {}", dir.display());
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    paths.retain(|p| p.is_file() && is_record_file(p));
    paths.sort();

    let mut teams = Vec::new();
    for path in &paths {
        match load_team_file(path, team_number_key) {
            Ok(records) => teams.extend(records),
            Err(e) => tracing::warn!("skipping {}: {}", path.display(), e),
        }
    }

    tracing::info!("{} teams loaded from {} files", teams.len(), paths.len());
    Ok(teams)
}

/// Load the records in one file. Records without a team number are skipped.
pub fn load_team_file(path: &Path, team_number_key: &str) -> Result<Vec<TeamRecord>, IngestError> {
    let content = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value = parse_value(path, &content)?;
    let records = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("teams") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                map.insert("teams".to_string(), other);
                vec![Value::Object(map)]
            }
            None => vec![Value::Object(map)],
        },
        _ => {
            return Err(IngestError::UnsupportedShape {
                path: path.to_path_buf(),
            })
        }
    };

    let mut teams = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let Value::Object(map) = record else {
            return Err(IngestError::UnsupportedShape {
                path: path.to_path_buf(),
            });
        };

        let values: BTreeMap<String, String> = map
            .into_iter()
            .filter_map(|(key, value)| match coerce(&value) {
                Some(text) => Some((key, text)),
                None => {
                    tracing::debug!("{}: ignoring non-scalar value for `{key}`", path.display());
                    None
                }
            })
            .collect();

        let number = values
            .get(team_number_key)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        match number {
            Some(number) => teams.push(TeamRecord { number, values }),
            None => {
                let err = IngestError::MissingTeamNumber {
                    path: path.to_path_buf(),
                    index,
                    key: team_number_key.to_string(),
                };
                tracing::warn!("{err}");
            }
        }
    }

    Ok(teams)
}

fn is_record_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "json" || ext == "toml")
}

fn parse_value(path: &Path, content: &str) -> Result<Value, IngestError> {
    let unparseable = |message: String| IngestError::Unparseable {
        path: path.to_path_buf(),
        message,
    };

    if path.extension().is_some_and(|ext| ext == "toml") {
        let table: toml::Table = toml::from_str(content).map_err(|e| unparseable(e.to_string()))?;
        serde_json::to_value(table).map_err(|e| unparseable(e.to_string()))
    } else {
        serde_json::from_str(content).map_err(|e| unparseable(e.to_string()))
    }
}

/// Scalar answer text; booleans become `yes`/`no` to match switch answers.
fn coerce(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(String::from(if *b { "yes" } else { "no" })),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
