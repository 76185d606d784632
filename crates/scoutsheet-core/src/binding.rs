//! Identifier bindings from the schema to a team's answers.
//!
//! Each key (and each derived column that names a single answer) becomes an
//! identifier that formulas may reference. Resolving a binding against a team
//! yields the literal text spliced into the expression.

use std::collections::HashMap;

use crate::columns::{normalize_column_key, segment_column, switch_columns};
use crate::error::ScoutError;
use crate::field::{FieldDescriptor, FieldKind};
use crate::team::TeamValues;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Binding {
    /// Text field answer parsed as a decimal.
    Decimal { key: String },
    /// Stepper count parsed as an integer.
    Integer { key: String },
    /// `1` when the switch answer is yes.
    SwitchYes { key: String },
    /// `1` when the switch answer is no.
    SwitchNo { key: String },
    /// 1-based position of the selected segment, `0` when none matches.
    SegmentPosition { key: String, segments: Vec<String> },
    /// `1` when this particular segment is the selected one.
    SegmentSelected { key: String, segment: String },
}

impl Binding {
    /// The data key whose answer this binding reads.
    pub(crate) fn key(&self) -> &str {
        match self {
            Binding::Decimal { key }
            | Binding::Integer { key }
            | Binding::SwitchYes { key }
            | Binding::SwitchNo { key }
            | Binding::SegmentPosition { key, .. }
            | Binding::SegmentSelected { key, .. } => key,
        }
    }

    /// Resolve to expression text. On a coercion failure the fallback `0` is
    /// returned alongside the error.
    pub(crate) fn resolve(&self, team: &dyn TeamValues) -> (String, Option<ScoutError>) {
        let raw = team.answer(self.key());
        match self {
            Binding::Decimal { key } => match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => (operand(value.to_string()), None),
                _ => ("0".into(), Some(coercion_failure(key, raw))),
            },
            Binding::Integer { key } => match raw.trim().parse::<i64>() {
                Ok(value) => (operand(value.to_string()), None),
                Err(_) => ("0".into(), Some(coercion_failure(key, raw))),
            },
            Binding::SwitchYes { .. } => (flag(is_answer(raw, "yes")), None),
            Binding::SwitchNo { .. } => (flag(is_answer(raw, "no")), None),
            Binding::SegmentPosition { segments, .. } => {
                let position = segments
                    .iter()
                    .position(|s| is_answer(raw, s))
                    .map_or(0, |p| p + 1);
                (position.to_string(), None)
            }
            Binding::SegmentSelected { segment, .. } => (flag(is_answer(raw, segment)), None),
        }
    }
}

/// Build the identifier table for a schema. Identifiers are normalized column
/// keys; when two fields claim one identifier the earlier field wins.
pub(crate) fn build_bindings(fields: &[FieldDescriptor]) -> HashMap<String, Binding> {
    let mut table = HashMap::new();
    let mut bind = |identifier: String, binding: Binding| {
        table.entry(identifier).or_insert(binding);
    };

    for field in fields {
        match field.kind() {
            FieldKind::TextField { inputs, .. } => {
                for key in &inputs.keys {
                    bind(normalize_column_key(key), Binding::Decimal { key: key.clone() });
                }
            }
            FieldKind::Stepper(inputs) => {
                for key in &inputs.keys {
                    bind(normalize_column_key(key), Binding::Integer { key: key.clone() });
                }
            }
            FieldKind::Switch(inputs) => {
                for key in &inputs.keys {
                    let [yes, no] = switch_columns(key);
                    bind(normalize_column_key(key), Binding::SwitchYes { key: key.clone() });
                    bind(yes, Binding::SwitchYes { key: key.clone() });
                    bind(no, Binding::SwitchNo { key: key.clone() });
                }
            }
            FieldKind::SegmentedControl(inputs) => {
                for key in &inputs.keys {
                    bind(
                        normalize_column_key(key),
                        Binding::SegmentPosition {
                            key: key.clone(),
                            segments: inputs.arguments.clone(),
                        },
                    );
                }
                if let Some(key) = inputs.keys.first() {
                    for segment in &inputs.arguments {
                        bind(
                            segment_column(key, segment),
                            Binding::SegmentSelected {
                                key: key.clone(),
                                segment: segment.clone(),
                            },
                        );
                    }
                }
            }
            // Slider answers are not bound; labels and spaces have no keys.
            FieldKind::Slider(_) | FieldKind::Label { .. } | FieldKind::Space => {}
        }
    }

    table
}

/// Wrap a negative literal in parentheses so it stays a single operand.
fn operand(literal: String) -> String {
    if literal.starts_with('-') {
        format!("({literal})")
    } else {
        literal
    }
}

fn is_answer(raw: &str, expected: &str) -> bool {
    let raw = raw.trim();
    !raw.is_empty() && raw.to_lowercase() == expected.trim().to_lowercase()
}

fn flag(on: bool) -> String {
    String::from(if on { "1" } else { "0" })
}

fn coercion_failure(key: &str, raw: &str) -> ScoutError {
    ScoutError::NumericCoercionFailure {
        key: key.to_string(),
        raw: raw.to_string(),
    }
}
