//! Type inference for heterogeneous value sequences.

pub mod lattice;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::{DataType, ScalarClass, Value};
use crate::frame::{DataFrame, DataRow, builder};
use crate::schema::{ColumnSchema, DataFrameSchema};

/// How the nullability of an inferred value type is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nullability {
    /// Nullable exactly when a null was observed.
    #[default]
    Infer,
    Nullable,
    NotNullable,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceOptions {
    pub nullability: Nullability,
}

impl InferenceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nullability(mut self, nullability: Nullability) -> Self {
        self.nullability = nullability;
        self
    }

    fn resolve_nullable(&self, observed_nulls: bool) -> bool {
        match self.nullability {
            Nullability::Infer => observed_nulls,
            Nullability::Nullable => true,
            Nullability::NotNullable => false,
        }
    }
}

/// Narrowest column schema that accepts every value in `values`.
pub fn infer_type(values: &[Value]) -> ColumnSchema {
    infer_type_with(values, &InferenceOptions::default())
}

pub fn infer_type_with(values: &[Value], options: &InferenceOptions) -> ColumnSchema {
    let observed = Observed::collect(values);

    if observed.has_nested() {
        if !observed.classes.is_empty() || !observed.lists.is_empty() {
            log::debug!("Rows or frames mixed with plain values, inferring Any");
            return value_schema(DataType::any(), observed.has_nulls, options);
        }
        if observed.frames.is_empty() && observed.row_lists.is_empty() {
            return ColumnSchema::Group(group_schema(&observed.rows));
        }
        return ColumnSchema::Frame(frame_schema(&observed));
    }

    if !observed.lists.is_empty() {
        if !observed.classes.is_empty() {
            log::debug!("Lists mixed with scalars, inferring Any");
            return value_schema(DataType::any(), observed.has_nulls, options);
        }
        let items: Vec<Value> = observed.lists.iter().flat_map(|l| l.iter().cloned()).collect();
        let element = match infer_type(&items) {
            ColumnSchema::Value(t) => t,
            _ => DataType::any(),
        };
        return value_schema(DataType::list(element), observed.has_nulls, options);
    }

    if observed.classes.is_empty() {
        return value_schema(DataType::nothing(), observed.has_nulls, options);
    }
    let class = lattice::common_class(&observed.classes);
    value_schema(DataType::scalar(class), observed.has_nulls, options)
}

fn value_schema(data_type: DataType, has_nulls: bool, options: &InferenceOptions) -> ColumnSchema {
    ColumnSchema::Value(data_type.with_nullability(options.resolve_nullable(has_nulls)))
}

/// Single pass over the input, sorting values by shape.
#[derive(Default)]
struct Observed<'a> {
    classes: BTreeSet<ScalarClass>,
    has_nulls: bool,
    rows: Vec<Option<&'a DataRow>>,
    frames: Vec<&'a DataFrame>,
    row_lists: Vec<&'a [Value]>,
    lists: Vec<&'a [Value]>,
}

impl<'a> Observed<'a> {
    fn collect(values: &'a [Value]) -> Self {
        let mut observed = Self::default();
        for value in values {
            match value {
                Value::Null => observed.has_nulls = true,
                Value::Row(row) => observed.rows.push(Some(row)),
                Value::Frame(frame) => observed.frames.push(frame),
                Value::List(items) if !items.is_empty() && items.iter().all(|v| v.as_row().is_some()) => {
                    observed.row_lists.push(items)
                }
                Value::List(items) => observed.lists.push(items),
                scalar => {
                    if let Some(class) = scalar.scalar_class() {
                        observed.classes.insert(class);
                    }
                }
            }
        }
        if observed.has_nulls && !observed.rows.is_empty() {
            let nulls = values.iter().filter(|v| v.is_null()).count();
            observed.rows.extend(std::iter::repeat_n(None, nulls));
        }
        observed
    }

    fn has_nested(&self) -> bool {
        !self.rows.is_empty() || !self.frames.is_empty() || !self.row_lists.is_empty()
    }
}

/// Schema of the frame the rows would form together: the union of their
/// columns, with missing cells filled by nulls.
fn group_schema(rows: &[Option<&DataRow>]) -> DataFrameSchema {
    match builder::rows_to_frame(rows) {
        Ok(frame) => frame.schema().clone(),
        Err(e) => {
            log::debug!("Could not merge rows: {}", e);
            DataFrameSchema::empty()
        }
    }
}

/// Columns shared by every non-null, non-empty nested frame. A lone row
/// counts as a one-row frame and a list of rows as the frame they form.
fn frame_schema(observed: &Observed<'_>) -> DataFrameSchema {
    let mut schemas: Vec<DataFrameSchema> = observed
        .frames
        .iter()
        .filter(|f| f.rows_count() > 0)
        .map(|f| f.schema().clone())
        .collect();
    schemas.extend(observed.rows.iter().flatten().map(|r| r.frame().schema().clone()));
    for items in &observed.row_lists {
        let rows: Vec<Option<&DataRow>> = items.iter().map(Value::as_row).collect();
        if let Ok(frame) = builder::rows_to_frame(&rows) {
            schemas.push(frame.schema().clone());
        }
    }
    let refs: Vec<&DataFrameSchema> = schemas.iter().collect();
    DataFrameSchema::intersect_all(&refs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_type(values: &[Value]) -> DataType {
        match infer_type(values) {
            ColumnSchema::Value(t) => t,
            other => panic!("expected a value type, got {}", other),
        }
    }

    #[test]
    fn test_scalars() {
        assert_eq!(value_type(&[1.into(), 2i64.into()]), DataType::long());
        assert_eq!(value_type(&[1.into(), 2.0.into()]), DataType::double());
        assert_eq!(value_type(&[1.into(), Value::Null]), DataType::int().nullable());
        assert_eq!(
            value_type(&[1.into(), "a".into()]),
            DataType::scalar(ScalarClass::Comparable)
        );
    }

    #[test]
    fn test_empty_and_null_only() {
        assert_eq!(value_type(&[]), DataType::nothing());
        assert_eq!(value_type(&[Value::Null, Value::Null]), DataType::nothing().nullable());
    }

    #[test]
    fn test_lists() {
        let values = [Value::from(vec![1, 2]), Value::from(vec![3i64])];
        assert_eq!(value_type(&values), DataType::list(DataType::long()));
        let mixed = [Value::from(vec![1]), Value::Int(2)];
        assert_eq!(value_type(&mixed), DataType::any());
    }

    #[test]
    fn test_nullability_override() {
        let options = InferenceOptions::new().nullability(Nullability::Nullable);
        assert_eq!(
            infer_type_with(&[1.into()], &options),
            ColumnSchema::Value(DataType::int().nullable())
        );
        let options = InferenceOptions::new().nullability(Nullability::NotNullable);
        assert_eq!(
            infer_type_with(&[1.into(), Value::Null], &options),
            ColumnSchema::Value(DataType::int())
        );
    }
}
