use std::collections::{BTreeSet, HashSet};

use tracing::{Level, event, info_span};

use crate::core::{FrameError, Result};
use crate::schema::{ColumnSchema, CompareResult, DataFrameSchema};

use super::config::SynthesisConfig;
use super::marker::{FieldType, MarkerField, MarkerId};
use super::naming;
use super::registry::MarkerRegistry;

/// Outcome of one synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisResult {
    /// Marker describing the target schema.
    pub marker: MarkerId,
    /// Markers declared by this call in declaration order, nested markers
    /// first. Empty when an existing marker was reused.
    pub new_markers: Vec<MarkerId>,
}

impl SynthesisResult {
    pub fn is_reused(&self) -> bool {
        self.new_markers.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldMode {
    Declare,
    Override,
    Skip,
}

/// Finds or declares markers for frame schemas.
///
/// A declared marker extends the open markers the target conforms to, plus
/// whatever further conforming markers cover the most of the remaining
/// columns, and declares only the fields those bases do not already provide.
#[derive(Debug, Clone, Default)]
pub struct MarkerSynthesizer {
    config: SynthesisConfig,
}

impl MarkerSynthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    pub fn synthesize(
        &self,
        target: &DataFrameSchema,
        is_open: bool,
        registry: &mut MarkerRegistry,
    ) -> Result<SynthesisResult> {
        self.synthesize_extending(target, is_open, &[], registry)
    }

    /// Like [`synthesize`](Self::synthesize), but the result must also
    /// extend `bases`. A base the target does not conform to is a type
    /// conflict.
    pub fn synthesize_extending(
        &self,
        target: &DataFrameSchema,
        is_open: bool,
        bases: &[MarkerId],
        registry: &mut MarkerRegistry,
    ) -> Result<SynthesisResult> {
        let span = info_span!(
            "synthesize",
            columns = target.len(),
            is_open,
            explicit_bases = bases.len()
        );
        let _enter = span.enter();

        for &base in bases {
            registry.try_get(base)?;
        }
        let mut new_markers = Vec::new();
        let marker = self.synthesize_into(target, is_open, bases, registry, &mut new_markers)?;
        let name = registry.try_get(marker)?.name().to_string();
        event!(
            Level::DEBUG,
            marker = %name,
            declared = new_markers.len(),
            "synthesis finished"
        );
        Ok(SynthesisResult {
            marker,
            new_markers,
        })
    }

    /// Keeps `current` when it is open, still matches `target` exactly and
    /// already extends every open marker `target` conforms to. Otherwise a
    /// new open marker is synthesized.
    pub fn retain_or_synthesize(
        &self,
        current: MarkerId,
        target: &DataFrameSchema,
        registry: &mut MarkerRegistry,
    ) -> Result<SynthesisResult> {
        let marker = registry.try_get(current)?;
        let up_to_date = marker.is_open()
            && marker.schema().compare(target).is_equal()
            && required_bases(registry, target)
                .iter()
                .all(|&base| registry.implements(current, base));
        if up_to_date {
            event!(Level::DEBUG, marker = %marker.name(), "marker is up to date");
            return Ok(SynthesisResult {
                marker: current,
                new_markers: Vec::new(),
            });
        }
        self.synthesize(target, true, registry)
    }

    fn synthesize_into(
        &self,
        target: &DataFrameSchema,
        is_open: bool,
        explicit_bases: &[MarkerId],
        registry: &mut MarkerRegistry,
        new_markers: &mut Vec<MarkerId>,
    ) -> Result<MarkerId> {
        let mut required = required_bases(registry, target);
        for &base in explicit_bases {
            if !required.contains(&base) {
                required.push(base);
            }
        }

        if let Some(existing) = registry.markers().find(|m| {
            (!is_open || m.is_open())
                && m.schema().compare(target).is_equal()
                && required.iter().all(|&r| registry.implements(m.id(), r))
        }) {
            log::debug!("Reusing marker '{}'", existing.name());
            return Ok(existing.id());
        }

        let mut bases = leaf_bases(registry, &required);
        field_modes(target, &bases, registry)?;
        self.cover_greedily(target, &mut bases, registry);
        let bases = leaf_bases(registry, &bases);
        let modes = field_modes(target, &bases, registry)?;

        let column_names = target.column_names();
        let default_names = if self.config.normalize_field_names {
            naming::normalize_field_names(&column_names)
        } else {
            column_names.iter().map(|n| n.to_string()).collect()
        };

        let mut fields = Vec::new();
        for ((name, column, mode), default_name) in modes.into_iter().zip(default_names) {
            if mode == FieldMode::Skip {
                continue;
            }
            let field_name = match mode {
                FieldMode::Override => {
                    inherited_field_name(registry, &bases, name).unwrap_or(default_name)
                }
                _ => default_name,
            };
            let nested_open = self.config.nested_markers_open;
            let field_type = match column {
                ColumnSchema::Value(t) => FieldType::Value(t.clone()),
                ColumnSchema::Group(s) => FieldType::Group {
                    schema: s.clone(),
                    marker: Some(self.synthesize_into(s, nested_open, &[], registry, new_markers)?),
                },
                ColumnSchema::Frame(s) => FieldType::Frame {
                    schema: s.clone(),
                    marker: Some(self.synthesize_into(s, nested_open, &[], registry, new_markers)?),
                },
            };
            fields.push(MarkerField {
                column_name: name.to_string(),
                field_name,
                field_type,
                overrides: mode == FieldMode::Override,
            });
        }

        let name = registry.unique_name(&self.config.marker_prefix);
        event!(
            Level::DEBUG,
            marker = %name,
            fields = fields.len(),
            bases = bases.len(),
            "declaring marker"
        );
        let id = registry.register(name, target.clone(), fields, bases, is_open)?;
        new_markers.push(id);
        Ok(id)
    }

    /// Adds conforming markers one at a time, each time the one sharing the
    /// most still-uncovered target columns with an identical type (ties to
    /// the smallest name), until no candidate covers anything new.
    fn cover_greedily(
        &self,
        target: &DataFrameSchema,
        bases: &mut Vec<MarkerId>,
        registry: &MarkerRegistry,
    ) {
        let mut remaining: BTreeSet<&str> = target
            .column_names()
            .into_iter()
            .filter(|name| {
                !bases
                    .iter()
                    .any(|&b| registry.get(b).is_some_and(|m| covers(m.schema(), target, name)))
            })
            .collect();
        let candidates: Vec<MarkerId> = registry
            .markers()
            .filter(|m| !bases.contains(&m.id()) && m.schema().generalizes(target))
            .map(|m| m.id())
            .collect();

        while !remaining.is_empty() {
            let best = candidates
                .iter()
                .filter(|c| !bases.contains(c))
                .filter_map(|&c| {
                    let marker = registry.get(c)?;
                    let covered = remaining
                        .iter()
                        .filter(|name| covers(marker.schema(), target, name))
                        .count();
                    (covered > 0).then_some((marker, covered))
                })
                .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.name().cmp(a.name())));
            let Some((marker, _)) = best else {
                break;
            };
            remaining.retain(|name| !covers(marker.schema(), target, name));
            bases.push(marker.id());
        }
    }
}

/// Whether `schema` declares `column` with exactly the target's type.
fn covers(schema: &DataFrameSchema, target: &DataFrameSchema, column: &str) -> bool {
    match (schema.column(column), target.column(column)) {
        (Some(own), Some(wanted)) => own.compare(wanted).is_equal(),
        _ => false,
    }
}

/// Open markers whose schema the target conforms to.
fn required_bases(registry: &MarkerRegistry, target: &DataFrameSchema) -> Vec<MarkerId> {
    registry
        .markers()
        .filter(|m| m.is_open() && m.schema().generalizes(target))
        .map(|m| m.id())
        .collect()
}

/// Drops bases that another selected base already inherits from, and
/// duplicates, keeping the original order.
fn leaf_bases(registry: &MarkerRegistry, bases: &[MarkerId]) -> Vec<MarkerId> {
    let inherited: HashSet<MarkerId> = bases
        .iter()
        .flat_map(|&b| registry.ancestors(b))
        .collect();
    let mut seen = HashSet::new();
    bases
        .iter()
        .copied()
        .filter(|b| !inherited.contains(b) && seen.insert(*b))
        .collect()
}

/// How each target column relates to the chosen bases: identical to an
/// inherited column (skip), narrower than one (override) or new.
fn field_modes<'t>(
    target: &'t DataFrameSchema,
    bases: &[MarkerId],
    registry: &MarkerRegistry,
) -> Result<Vec<(&'t str, &'t ColumnSchema, FieldMode)>> {
    for &base in bases {
        let marker = registry.try_get(base)?;
        if let Some((name, inherited)) = marker
            .schema()
            .columns()
            .find(|(name, _)| !target.contains(name))
        {
            return Err(FrameError::TypeConflict {
                column: name.to_string(),
                target: "no such column".to_string(),
                base: inherited.to_string(),
                marker: marker.name().to_string(),
            });
        }
    }

    let mut modes = Vec::with_capacity(target.len());
    for (name, column) in target.columns() {
        let mut mode = FieldMode::Declare;
        for &base in bases {
            let marker = registry.try_get(base)?;
            let Some(inherited) = marker.schema().column(name) else {
                continue;
            };
            match column.compare(inherited) {
                CompareResult::Equal => {
                    if mode == FieldMode::Declare {
                        mode = FieldMode::Skip;
                    }
                }
                CompareResult::Supertype => {
                    mode = FieldMode::Override;
                    break;
                }
                CompareResult::Subtype | CompareResult::Unrelated => {
                    return Err(FrameError::TypeConflict {
                        column: name.to_string(),
                        target: column.to_string(),
                        base: inherited.to_string(),
                        marker: marker.name().to_string(),
                    });
                }
            }
        }
        modes.push((name, column, mode));
    }
    Ok(modes)
}

/// Field name the closest declaring base uses for `column`.
fn inherited_field_name(
    registry: &MarkerRegistry,
    bases: &[MarkerId],
    column: &str,
) -> Option<String> {
    bases.iter().find_map(|&base| {
        let mut lineage: Vec<MarkerId> = registry.ancestors(base).into_iter().collect();
        lineage.sort();
        std::iter::once(base)
            .chain(lineage)
            .find_map(|id| registry.get(id)?.field(column).map(|f| f.field_name.clone()))
    })
}
