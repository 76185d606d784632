//! Form configuration loader.
//!
//! One directive per line. Field lines use the `;;` segment grammar, equation
//! lines use `Name = expression`. Blank lines and `#` comments are skipped.
//! A bad line is recorded as a diagnostic and the rest of the file still loads.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};

use crate::equation::Equation;
use crate::error::ScoutError;
use crate::field::{split_arguments, FieldDescriptor, FieldKind, FieldType, SEGMENT_DELIMITER};
use crate::schema::Schema;

/// A configuration line that could not be loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDiagnostic {
    /// 1-based line number.
    pub line: usize,
    pub error: ScoutError,
}

/// Everything loaded from one configuration source.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub schema: Schema,
    pub equations: Vec<Equation>,
    pub diagnostics: Vec<ConfigDiagnostic>,
}

/// What kind of directive a line holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Field,
    Equation,
}

/// Classify a configuration line.
///
/// A line is a field if it contains `;;` or if its type segment names a
/// registered field type (so a bare `SPACE` is a field). Anything else is an
/// equation.
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return LineKind::Blank;
    }
    if trimmed.contains(SEGMENT_DELIMITER) {
        return LineKind::Field;
    }
    let (label, _) = split_arguments(trimmed);
    if FieldType::lookup(&label).is_some() {
        LineKind::Field
    } else {
        LineKind::Equation
    }
}

/// Parse configuration text into a schema and equations.
pub fn parse_config_str(content: &str) -> LoadedConfig {
    let mut fields = Vec::new();
    let mut equations = Vec::new();
    let mut diagnostics = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let parsed = match classify_line(line) {
            LineKind::Blank => continue,
            LineKind::Field => FieldDescriptor::parse(line).map(|f| {
                tracing::debug!("{} field loaded", f.field_type());
                fields.push(f);
            }),
            LineKind::Equation => Equation::parse(line).map(|e| {
                tracing::debug!("equation {} loaded", e.name());
                equations.push(e);
            }),
        };

        if let Err(error) = parsed {
            tracing::warn!("config line {}: {}", index + 1, error);
            diagnostics.push(ConfigDiagnostic {
                line: index + 1,
                error,
            });
        }
    }

    tracing::info!(
        "{} fields and {} equations loaded ({} lines skipped)",
        fields.len(),
        equations.len(),
        diagnostics.len()
    );

    LoadedConfig {
        schema: Schema::new(fields),
        equations,
        diagnostics,
    }
}

/// Read and parse a configuration file.
pub fn load_config(path: &Path) -> Result<LoadedConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read form config: {}", path.display()))?;
    Ok(parse_config_str(&content))
}

/// A warning from configuration validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The key, column or equation the warning is about.
    pub subject: Option<String>,
    pub message: String,
}

impl ValidationWarning {
    fn about(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            message: message.into(),
        }
    }
}

/// Check a loaded configuration for problems that parse cleanly but will
/// produce surprising scores.
pub fn validate_config(config: &LoadedConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let fields = config.schema.fields();

    for field in fields {
        let Some(inputs) = field.inputs() else {
            continue;
        };
        let subject = inputs.keys.join(",");

        if inputs.descriptions.len() != inputs.keys.len() {
            warnings.push(ValidationWarning::about(
                &subject,
                format!(
                    "{} descriptions but {} keys",
                    inputs.descriptions.len(),
                    inputs.keys.len()
                ),
            ));
        }

        if field.field_type().uses_arguments() && inputs.arguments.is_empty() {
            let message = match field.kind() {
                FieldKind::SegmentedControl(_) => "segmented control has no segments",
                _ => "text field has no format argument and will be treated as text",
            };
            warnings.push(ValidationWarning::about(&subject, message));
        }
    }

    // Keys claimed by more than one field
    let mut key_owners: HashMap<String, usize> = HashMap::new();
    for field in fields {
        let unique: HashSet<String> = field.keys().iter().map(|k| k.to_lowercase()).collect();
        for key in unique {
            *key_owners.entry(key).or_default() += 1;
        }
    }
    let mut shared: Vec<_> = key_owners.into_iter().filter(|(_, n)| *n > 1).collect();
    shared.sort();
    for (key, count) in shared {
        warnings.push(ValidationWarning::about(
            &key,
            format!("key is used by {count} fields; only the first is scored"),
        ));
    }

    // Derived column collisions
    let mut seen_columns = HashSet::new();
    for column in config.schema.column_headers() {
        if !seen_columns.insert(column.clone()) {
            warnings.push(ValidationWarning::about(column, "duplicate derived column"));
        }
    }

    // Equations
    let mut seen_names = HashSet::new();
    for eq in &config.equations {
        let name = eq.display_name();
        if name.trim().is_empty() {
            warnings.push(ValidationWarning::about(eq.to_string(), "equation has no name"));
        } else if !seen_names.insert(name.clone()) {
            warnings.push(ValidationWarning::about(&name, "duplicate equation name"));
        }

        for identifier in eq.identifiers() {
            if !config.schema.knows_identifier(identifier) {
                warnings.push(ValidationWarning::about(
                    &name,
                    format!("`{identifier}` does not match any field key or column"),
                ));
            } else if !config.schema.binds(identifier) {
                warnings.push(ValidationWarning::about(
                    &name,
                    format!("`{identifier}` is never substituted and will score 0"),
                ));
            }
        }
    }

    warnings
}
