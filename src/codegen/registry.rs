use std::collections::{HashMap, HashSet};

use log::debug;

use crate::core::{FrameError, Result};
use crate::schema::{ColumnSchema, DataFrameSchema};

use super::marker::{FieldDescription, FieldType, Marker, MarkerDescription, MarkerField, MarkerId};
use super::naming;

/// Markers known to one synthesis session, in registration order.
///
/// A registry is the only mutable state of marker synthesis; markers are
/// never removed from it.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    markers: Vec<Marker>,
    by_name: HashMap<String, MarkerId>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an externally defined marker. `schema` is its full schema
    /// and must conform to every base; the fields it declares itself are
    /// derived from what the bases do not already provide.
    pub fn declare(
        &mut self,
        name: &str,
        schema: DataFrameSchema,
        bases: &[MarkerId],
        is_open: bool,
    ) -> Result<MarkerId> {
        if self.by_name.contains_key(name) {
            return Err(FrameError::DuplicateMarker(name.to_string()));
        }
        for &base in bases {
            let base_marker = self.try_get(base)?;
            if !base_marker.schema().generalizes(&schema) {
                return Err(FrameError::InvalidBase {
                    marker: name.to_string(),
                    base: base_marker.name().to_string(),
                    reason: format!(
                        "schema {} does not conform to {}",
                        schema,
                        base_marker.schema()
                    ),
                });
            }
        }

        let column_names = schema.column_names();
        let field_names = naming::normalize_field_names(&column_names);
        let mut fields = Vec::new();
        for ((column_name, column), field_name) in schema.columns().zip(field_names) {
            let inherited: Vec<&ColumnSchema> = bases
                .iter()
                .filter_map(|&b| self.markers[b.0].schema().column(column_name))
                .collect();
            if inherited.iter().any(|c| *c == column) {
                continue;
            }
            let field_type = match column {
                ColumnSchema::Value(t) => FieldType::Value(t.clone()),
                ColumnSchema::Group(s) => FieldType::Group {
                    schema: s.clone(),
                    marker: None,
                },
                ColumnSchema::Frame(s) => FieldType::Frame {
                    schema: s.clone(),
                    marker: None,
                },
            };
            fields.push(MarkerField {
                column_name: column_name.to_string(),
                field_name,
                field_type,
                overrides: !inherited.is_empty(),
            });
        }
        self.register(name.to_string(), schema, fields, bases.to_vec(), is_open)
    }

    /// Adds a marker. No two markers may share both schema and openness.
    pub(crate) fn register(
        &mut self,
        name: String,
        schema: DataFrameSchema,
        fields: Vec<MarkerField>,
        bases: Vec<MarkerId>,
        is_open: bool,
    ) -> Result<MarkerId> {
        if let Some(existing) = self.find_equivalent(&schema, is_open) {
            return Err(FrameError::DuplicateMarkerSchema {
                marker: name,
                existing: existing.name().to_string(),
            });
        }
        let id = MarkerId(self.markers.len());
        debug!(
            "Registering marker '{}' with {} fields and {} bases",
            name,
            fields.len(),
            bases.len()
        );
        self.by_name.insert(name.clone(), id);
        self.markers.push(Marker {
            id,
            name,
            schema,
            fields,
            bases,
            is_open,
        });
        Ok(id)
    }

    /// Marker with exactly this schema and openness, if any.
    pub fn find_equivalent(&self, schema: &DataFrameSchema, is_open: bool) -> Option<&Marker> {
        self.markers
            .iter()
            .find(|m| m.is_open == is_open && m.schema.compare(schema).is_equal())
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(id.0)
    }

    pub(crate) fn try_get(&self, id: MarkerId) -> Result<&Marker> {
        self.get(id).ok_or(FrameError::UnknownMarker(id.0))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Marker> {
        self.by_name.get(name).map(|id| &self.markers[id.0])
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> + '_ {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub(crate) fn unique_name(&self, prefix: &str) -> String {
        naming::unique_name(prefix, |candidate| self.contains_name(candidate))
    }

    /// Every marker `id` inherits from, directly or not, excluding itself.
    pub fn ancestors(&self, id: MarkerId) -> HashSet<MarkerId> {
        let mut seen = HashSet::new();
        let mut pending: Vec<MarkerId> = self.get(id).map(|m| m.bases.clone()).unwrap_or_default();
        while let Some(next) = pending.pop() {
            if seen.insert(next) {
                if let Some(marker) = self.get(next) {
                    pending.extend(marker.bases.iter().copied());
                }
            }
        }
        seen
    }

    /// Whether `id` is `base` or inherits from it.
    pub fn implements(&self, id: MarkerId, base: MarkerId) -> bool {
        id == base || self.ancestors(id).contains(&base)
    }

    pub fn describe(&self, id: MarkerId) -> Result<MarkerDescription> {
        let marker = self.try_get(id)?;
        let fields = marker
            .fields
            .iter()
            .map(|field| FieldDescription {
                column_name: field.column_name.clone(),
                field_name: field.field_name.clone(),
                kind: field.field_type.kind(),
                type_name: self.type_name(&field.field_type),
                overrides: field.overrides,
            })
            .collect();
        let bases = marker
            .bases
            .iter()
            .filter_map(|&b| self.get(b).map(|m| m.name.clone()))
            .collect();
        Ok(MarkerDescription {
            name: marker.name.clone(),
            fields,
            bases,
            open: marker.is_open,
        })
    }

    /// Descriptions of all markers in registration order, which puts nested
    /// markers before the markers that use them.
    pub fn describe_all(&self) -> Vec<MarkerDescription> {
        self.markers
            .iter()
            .filter_map(|m| self.describe(m.id).ok())
            .collect()
    }

    fn type_name(&self, field_type: &FieldType) -> String {
        match field_type {
            FieldType::Value(t) => t.to_string(),
            FieldType::Group { schema, marker } | FieldType::Frame { schema, marker } => marker
                .and_then(|id| self.get(id))
                .map(|m| m.name.clone())
                .unwrap_or_else(|| schema.to_string()),
        }
    }
}
