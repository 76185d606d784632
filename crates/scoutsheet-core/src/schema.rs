//! The immutable form schema.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::binding::{build_bindings, Binding};
use crate::columns::normalize_column_key;
use crate::field::{FieldDescriptor, FieldKind, TextFormat};
use crate::team::TeamValues;

/// Ordered set of field descriptors loaded from the form configuration.
///
/// Built once at startup and shared read-only by every evaluation.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
    bindings: OnceLock<HashMap<String, Binding>>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            bindings: OnceLock::new(),
        }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Derived column keys of every field, in schema order.
    pub fn column_headers(&self) -> Vec<String> {
        self.fields
            .iter()
            .flat_map(|f| f.columns().iter().cloned())
            .collect()
    }

    /// Cell values for one team, aligned with [`Schema::column_headers`].
    ///
    /// Numeric fields export the raw answer; switch and segment columns export
    /// `1` or `0`.
    pub fn column_cells(&self, team: &dyn TeamValues) -> Vec<String> {
        let mut cells = Vec::new();
        for field in &self.fields {
            match field.kind() {
                FieldKind::TextField {
                    format: TextFormat::Text,
                    ..
                }
                | FieldKind::Label { .. }
                | FieldKind::Space => {}
                FieldKind::TextField { .. } | FieldKind::Stepper(_) | FieldKind::Slider(_) => {
                    if let Some(key) = field.keys().first() {
                        cells.push(team.answer(key).to_string());
                    }
                }
                FieldKind::Switch(_) | FieldKind::SegmentedControl(_) => {
                    for column in field.columns() {
                        let cell = self
                            .binding(column)
                            .map(|b| b.resolve(team).0)
                            .unwrap_or_default();
                        cells.push(cell);
                    }
                }
            }
        }
        cells
    }

    /// True when `identifier` names a key or derived column of some field.
    pub fn knows_identifier(&self, identifier: &str) -> bool {
        let normalized = normalize_column_key(identifier);
        self.binding(&normalized).is_some()
            || self.fields.iter().any(|f| {
                f.columns().contains(&normalized)
                    || f.keys().iter().any(|k| normalize_column_key(k) == normalized)
            })
    }

    /// True when equations substitute a value for `identifier`.
    pub fn binds(&self, identifier: &str) -> bool {
        self.binding(&identifier.to_lowercase()).is_some()
    }

    pub(crate) fn binding(&self, identifier: &str) -> Option<&Binding> {
        self.bindings
            .get_or_init(|| build_bindings(&self.fields))
            .get(identifier)
    }
}

impl FromIterator<FieldDescriptor> for Schema {
    fn from_iter<I: IntoIterator<Item = FieldDescriptor>>(iter: I) -> Self {
        Schema::new(iter.into_iter().collect())
    }
}
