//! Tool settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level scoutsheet settings, read from `scoutsheet.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutsheetConfig {
    /// Form configuration file (fields and equations).
    #[serde(default = "default_form_config")]
    pub form_config: PathBuf,
    /// Record key holding the team number.
    #[serde(default = "default_team_number_key")]
    pub team_number_key: String,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Report formats to write: csv, html, json.
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    /// Equation to rank the summary table by (defaults to the first).
    #[serde(default)]
    pub sort_by: Option<String>,
}

fn default_form_config() -> PathBuf {
    PathBuf::from("config.txt")
}
fn default_team_number_key() -> String {
    "team_num".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./scoutsheet-results")
}
fn default_formats() -> Vec<String> {
    vec!["csv".to_string()]
}

impl Default for ScoutsheetConfig {
    fn default() -> Self {
        Self {
            form_config: default_form_config(),
            team_number_key: default_team_number_key(),
            output_dir: default_output_dir(),
            formats: default_formats(),
            sort_by: None,
        }
    }
}

/// Expand `${VAR}` references from the environment. Unset variables expand
/// to nothing; expanded values are not themselves expanded.
fn resolve_env_vars(s: &str) -> String {
    let mut resolved = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(open) = rest.find("${") {
        let Some(len) = rest[open..].find('}') else {
            break;
        };
        resolved.push_str(&rest[..open]);
        let var_name = &rest[open + 2..open + len];
        resolved.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[open + len + 1..];
    }
    resolved.push_str(rest);
    resolved
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load settings from well-known paths.
///
/// Search order:
/// 1. `scoutsheet.toml` in the current directory
/// 2. `~/.config/scoutsheet/config.toml`
///
/// Environment variable overrides: `SCOUTSHEET_OUTPUT_DIR`, `SCOUTSHEET_TEAM_NUMBER_KEY`.
pub fn load_config() -> Result<ScoutsheetConfig> {
    load_config_from(None)
}

/// Load settings from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ScoutsheetConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("settings file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("scoutsheet.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading settings from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings: {}", path.display()))?;
            toml::from_str::<ScoutsheetConfig>(&content)
                .with_context(|| format!("failed to parse settings: {}", path.display()))?
        }
        None => ScoutsheetConfig::default(),
    };

    if let Ok(dir) = std::env::var("SCOUTSHEET_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }
    if let Ok(key) = std::env::var("SCOUTSHEET_TEAM_NUMBER_KEY") {
        config.team_number_key = key;
    }

    config.form_config = resolve_path(&config.form_config);
    config.output_dir = resolve_path(&config.output_dir);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("scoutsheet"))
}
