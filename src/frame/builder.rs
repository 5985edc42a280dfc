//! Column construction from raw values, with type inference.

use std::collections::HashSet;

use crate::core::{DataType, FrameError, Result, Value};
use crate::inference::{self, InferenceOptions, Nullability, lattice};
use crate::schema::ColumnSchema;

use super::{Column, DataFrame, DataRow};

impl Column {
    /// Builds a column from raw values.
    ///
    /// With a declared type the values are validated against it. Otherwise
    /// the type is inferred: rows become a group column, frames (and lists of
    /// rows) a frame column, anything else a value column whose numbers are
    /// widened to the inferred type.
    pub fn create(
        name: impl Into<String>,
        values: Vec<Value>,
        declared: Option<DataType>,
        options: &InferenceOptions,
    ) -> Result<Column> {
        let name = super::column::require_name(name.into())?;
        if let Some(data_type) = declared {
            let data_type = match options.nullability {
                Nullability::Infer => data_type,
                Nullability::Nullable => data_type.nullable(),
                Nullability::NotNullable => data_type.with_nullability(false),
            };
            return Column::value(name, data_type, values);
        }

        match inference::infer_type_with(&values, options) {
            ColumnSchema::Value(data_type) => {
                if !data_type.is_nullable() && values.iter().any(Value::is_null) {
                    return Err(FrameError::TypeMismatch(format!(
                        "Column '{}' is not nullable but holds nulls",
                        name
                    )));
                }
                let data = values
                    .into_iter()
                    .map(|v| lattice::conform(v, &data_type))
                    .collect();
                Ok(Column::value_unchecked(name, data_type, data))
            }
            ColumnSchema::Group(_) => {
                let rows: Vec<Option<&DataRow>> = values.iter().map(Value::as_row).collect();
                Column::group(name, rows_to_frame(&rows)?)
            }
            ColumnSchema::Frame(schema) => {
                let frames = values
                    .iter()
                    .map(|v| nested_frame(&name, v))
                    .collect::<Result<Vec<_>>>()?;
                Column::frame_with_schema(name, frames, schema)
            }
        }
    }
}

impl DataFrame {
    /// Frame from `(name, values)` pairs, each column built with
    /// [`Column::create`] and no declared type.
    pub fn from_values<N: Into<String>>(columns: Vec<(N, Vec<Value>)>) -> Result<DataFrame> {
        let options = InferenceOptions::default();
        let columns = columns
            .into_iter()
            .map(|(name, values)| Column::create(name, values, None, &options))
            .collect::<Result<Vec<_>>>()?;
        DataFrame::new(columns)
    }

    /// Frame holding the given rows, possibly taken from different frames.
    pub fn from_rows(rows: &[DataRow]) -> Result<DataFrame> {
        let rows: Vec<Option<&DataRow>> = rows.iter().map(Some).collect();
        rows_to_frame(&rows)
    }
}

/// Merges rows into one frame. Columns are the union of the rows' columns in
/// first-seen order; cells a row lacks, and every cell of a `None` row, are
/// null.
pub(crate) fn rows_to_frame(rows: &[Option<&DataRow>]) -> Result<DataFrame> {
    let mut seen = HashSet::new();
    let mut names: Vec<&str> = Vec::new();
    for row in rows.iter().flatten() {
        for column in row.frame().columns() {
            if !column.is_placeholder() && seen.insert(column.name()) {
                names.push(column.name());
            }
        }
    }
    let options = InferenceOptions::default();
    let columns = names
        .iter()
        .map(|&name| {
            let values = rows
                .iter()
                .map(|row| row.and_then(|r| r.get(name)).unwrap_or(Value::Null))
                .collect();
            Column::create(name, values, None, &options)
        })
        .collect::<Result<Vec<_>>>()?;
    DataFrame::with_row_count(columns, rows.len())
}

fn nested_frame(column: &str, value: &Value) -> Result<DataFrame> {
    match value {
        Value::Null => Ok(DataFrame::empty()),
        Value::Frame(frame) => Ok(frame.clone()),
        Value::Row(row) => row.to_frame(),
        Value::List(items) => {
            let rows: Vec<Option<&DataRow>> = items.iter().map(Value::as_row).collect();
            rows_to_frame(&rows)
        }
        other => Err(FrameError::TypeMismatch(format!(
            "Column '{}' holds frames, got {}",
            column,
            other.type_name()
        ))),
    }
}
