//! Column-key derivation.
//!
//! The data-collection form stores each answer under a normalized column key.
//! These keys are the join between the schema and a team's raw values, so the
//! normalization here has to match the form byte for byte.

use crate::field::{FieldDescriptor, FieldKind, TextFormat};

/// Normalize a raw key into the form's column-key format.
///
/// Backslashes, slashes and spaces become underscores, then the key is
/// lowercased and trimmed. Normalizing twice is the same as normalizing once.
pub fn normalize_column_key(raw: &str) -> String {
    raw.replace('\\', "_")
        .replace('/', "_")
        .replace(' ', "_")
        .to_lowercase()
        .trim()
        .to_string()
}

/// Column key for one segment of a segmented control.
pub fn segment_column(key: &str, segment: &str) -> String {
    normalize_column_key(&format!("{}_{}", key, segment.trim()))
}

/// Column keys for the two answers of a switch.
pub fn switch_columns(key: &str) -> [String; 2] {
    [
        normalize_column_key(&format!("{key}_yes")),
        normalize_column_key(&format!("{key}_no")),
    ]
}

fn derive_columns(kind: &FieldKind) -> Vec<String> {
    match kind {
        FieldKind::SegmentedControl(inputs) => match inputs.keys.first() {
            Some(key) => inputs
                .arguments
                .iter()
                .map(|segment| segment_column(key, segment))
                .collect(),
            None => Vec::new(),
        },
        FieldKind::TextField { format, inputs } => match (format, inputs.keys.first()) {
            (TextFormat::Number | TextFormat::Decimal, Some(key)) => {
                vec![normalize_column_key(key)]
            }
            _ => Vec::new(),
        },
        FieldKind::Stepper(inputs) | FieldKind::Slider(inputs) => inputs
            .keys
            .first()
            .map(|key| vec![normalize_column_key(key)])
            .unwrap_or_default(),
        FieldKind::Switch(inputs) => inputs.keys.iter().flat_map(|k| switch_columns(k)).collect(),
        FieldKind::Label { .. } | FieldKind::Space => Vec::new(),
    }
}

impl FieldDescriptor {
    /// Column keys the team value store exposes for this field.
    ///
    /// Computed on first access and cached for the descriptor's lifetime.
    pub fn columns(&self) -> &[String] {
        self.columns.get_or_init(|| derive_columns(self.kind()))
    }
}
