use std::collections::HashSet;
use std::ops::Range;

use crate::core::{ColumnKind, DataType, FrameError, Memo, Result, Value};
use crate::schema::{ColumnSchema, DataFrameSchema};
use crate::storage::ColumnData;

use super::{DataFrame, DataRow, equality};

/// Leaf column: one typed value per row.
#[derive(Debug, Clone)]
pub struct ValueColumn {
    name: String,
    data_type: DataType,
    data: ColumnData,
}

impl ValueColumn {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }
}

/// Column whose cells are the rows of a nested frame, one nested row per
/// outer row.
#[derive(Debug, Clone)]
pub struct ColumnGroup {
    name: String,
    frame: DataFrame,
}

impl ColumnGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn columns(&self) -> &[Column] {
        self.frame.columns()
    }
}

/// Column whose cells are independent nested frames of any size.
#[derive(Debug, Clone)]
pub struct FrameColumn {
    name: String,
    frames: ColumnData,
    schema: Memo<DataFrameSchema>,
}

impl FrameColumn {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame_at(&self, index: usize) -> Option<&DataFrame> {
        self.frames.get(index).and_then(Value::as_frame)
    }

    pub fn frames(&self) -> impl Iterator<Item = &DataFrame> + '_ {
        self.frames.iter().filter_map(Value::as_frame)
    }

    /// Columns shared by every non-empty nested frame, computed on first use.
    /// Zero-row frames stand in for absent cells and do not narrow the schema.
    pub fn schema(&self) -> &DataFrameSchema {
        self.schema.get_or_init(|| {
            let schemas: Vec<&DataFrameSchema> = self
                .frames()
                .filter(|f| f.rows_count() > 0)
                .map(DataFrame::schema)
                .collect();
            DataFrameSchema::intersect_all(&schemas)
        })
    }

    pub(crate) fn data(&self) -> &ColumnData {
        &self.frames
    }
}

#[derive(Debug, Clone)]
pub enum Column {
    Value(ValueColumn),
    Group(ColumnGroup),
    Frame(FrameColumn),
}

impl Column {
    /// Value column with a declared type; every value must be compatible with it.
    pub fn value(name: impl Into<String>, data_type: DataType, values: Vec<Value>) -> Result<Self> {
        let name = require_name(name.into())?;
        if let Some(bad) = values.iter().find(|v| !data_type.is_compatible(v)) {
            return Err(FrameError::TypeMismatch(format!(
                "Column '{}' expects type {}, got {}",
                name,
                data_type,
                bad.type_name()
            )));
        }
        Ok(Self::value_unchecked(name, data_type, ColumnData::new(values)))
    }

    pub(crate) fn value_unchecked(name: String, data_type: DataType, data: ColumnData) -> Self {
        Self::Value(ValueColumn {
            name,
            data_type,
            data,
        })
    }

    pub fn group(name: impl Into<String>, frame: DataFrame) -> Result<Self> {
        Ok(Self::Group(ColumnGroup {
            name: require_name(name.into())?,
            frame,
        }))
    }

    pub fn frame(name: impl Into<String>, frames: Vec<DataFrame>) -> Result<Self> {
        Ok(Self::Frame(FrameColumn {
            name: require_name(name.into())?,
            frames: frames.into_iter().map(Value::Frame).collect(),
            schema: Memo::new(),
        }))
    }

    /// Frame column whose nested schema is already known.
    pub fn frame_with_schema(
        name: impl Into<String>,
        frames: Vec<DataFrame>,
        schema: DataFrameSchema,
    ) -> Result<Self> {
        Ok(Self::Frame(FrameColumn {
            name: require_name(name.into())?,
            frames: frames.into_iter().map(Value::Frame).collect(),
            schema: Memo::ready(schema),
        }))
    }

    /// Zero-row value column, used when a lookup under the create policy
    /// finds nothing.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::value_unchecked(name.into(), DataType::nothing().nullable(), ColumnData::empty())
    }

    /// The anonymous empty column. It is the only column allowed to have an
    /// empty name.
    pub fn placeholder() -> Self {
        Self::empty(String::new())
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Value(c) => &c.name,
            Self::Group(c) => &c.name,
            Self::Frame(c) => &c.name,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.name().is_empty() && self.size() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Value(_) => ColumnKind::Value,
            Self::Group(_) => ColumnKind::Group,
            Self::Frame(_) => ColumnKind::Frame,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Self::Value(c) => c.data.len(),
            Self::Group(c) => c.frame.rows_count(),
            Self::Frame(c) => c.frames.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn as_value(&self) -> Option<&ValueColumn> {
        match self {
            Self::Value(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&ColumnGroup> {
        match self {
            Self::Group(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_frame_column(&self) -> Option<&FrameColumn> {
        match self {
            Self::Frame(c) => Some(c),
            _ => None,
        }
    }

    pub fn data_type(&self) -> Option<&DataType> {
        self.as_value().map(ValueColumn::data_type)
    }

    /// Cell at `index`. Group cells are lazy row views into the nested frame.
    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Self::Value(c) => c.data.get(index).cloned(),
            Self::Group(c) => (index < c.frame.rows_count())
                .then(|| Value::Row(DataRow::new(c.frame.clone(), index))),
            Self::Frame(c) => c.frames.get(index).cloned(),
        }
    }

    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.size()).filter_map(move |i| self.get(i))
    }

    pub fn rename(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        match self {
            Self::Value(c) => Self::Value(ValueColumn {
                name,
                ..c.clone()
            }),
            Self::Group(c) => Self::Group(ColumnGroup {
                name,
                frame: c.frame.clone(),
            }),
            Self::Frame(c) => Self::Frame(FrameColumn {
                name,
                ..c.clone()
            }),
        }
    }

    pub fn slice(&self, range: Range<usize>) -> Result<Self> {
        if range.start == 0 && range.end == self.size() {
            return Ok(self.clone());
        }
        Ok(match self {
            Self::Value(c) => Self::Value(ValueColumn {
                name: c.name.clone(),
                data_type: c.data_type.clone(),
                data: c.data.slice(range)?,
            }),
            Self::Group(c) => Self::Group(ColumnGroup {
                name: c.name.clone(),
                frame: c.frame.slice_rows(range)?,
            }),
            Self::Frame(c) => Self::Frame(FrameColumn {
                name: c.name.clone(),
                frames: c.frames.slice(range)?,
                schema: Memo::new(),
            }),
        })
    }

    /// Column made of the cells at `indices`, in that order.
    pub fn take(&self, indices: &[usize]) -> Result<Self> {
        let size = self.size();
        if let Some(&bad) = indices.iter().find(|&&i| i >= size) {
            return Err(FrameError::RowIndexOutOfBounds {
                index: bad,
                rows: size,
            });
        }
        Ok(match self {
            Self::Value(c) => Self::value_unchecked(
                c.name.clone(),
                c.data_type.clone(),
                indices.iter().filter_map(|&i| c.data.get(i).cloned()).collect(),
            ),
            Self::Group(c) => Self::Group(ColumnGroup {
                name: c.name.clone(),
                frame: c.frame.take_rows(indices)?,
            }),
            Self::Frame(c) => Self::Frame(FrameColumn {
                name: c.name.clone(),
                frames: indices.iter().filter_map(|&i| c.frames.get(i).cloned()).collect(),
                schema: Memo::new(),
            }),
        })
    }

    pub fn contains(&self, value: &Value) -> bool {
        match self {
            Self::Value(c) => c.data.contains(value),
            Self::Frame(c) => c.frames.contains(value),
            Self::Group(_) => self.values().any(|v| &v == value),
        }
    }

    pub fn distinct_values(&self) -> HashSet<Value> {
        match self {
            Self::Value(c) => c.data.distinct().clone(),
            Self::Frame(c) => c.frames.distinct().clone(),
            Self::Group(_) => self.values().collect(),
        }
    }

    pub fn count_distinct(&self) -> usize {
        match self {
            Self::Value(c) => c.data.distinct().len(),
            Self::Frame(c) => c.frames.distinct().len(),
            Self::Group(_) => self.distinct_values().len(),
        }
    }

    pub fn has_nulls(&self) -> bool {
        match self {
            Self::Value(c) => c.data.has_nulls(),
            Self::Group(_) | Self::Frame(_) => false,
        }
    }

    /// Structural description of this column, independent of its name.
    pub fn column_schema(&self) -> ColumnSchema {
        match self {
            Self::Value(c) => ColumnSchema::Value(c.data_type.clone()),
            Self::Group(c) => ColumnSchema::Group(c.frame.schema().clone()),
            Self::Frame(c) => ColumnSchema::Frame(c.schema().clone()),
        }
    }
}

/// Only the anonymous placeholder may go without a name.
pub(super) fn require_name(name: String) -> Result<String> {
    if name.is_empty() {
        return Err(FrameError::EmptyColumnName);
    }
    Ok(name)
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        equality::columns_equal(self, other)
    }
}

impl Eq for Column {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ages() -> Column {
        Column::value("age", DataType::int(), vec![15.into(), 45.into(), 15.into()]).unwrap()
    }

    #[test]
    fn test_value_column_basics() {
        let col = ages();
        assert_eq!(col.name(), "age");
        assert_eq!(col.kind(), ColumnKind::Value);
        assert_eq!(col.size(), 3);
        assert_eq!(col.get(1), Some(Value::Int(45)));
        assert_eq!(col.count_distinct(), 2);
        assert!(col.contains(&Value::Int(15)));
    }

    #[test]
    fn test_declared_type_is_enforced() {
        let err = Column::value("age", DataType::int(), vec![Value::from("x")]).unwrap_err();
        assert!(matches!(err, FrameError::TypeMismatch(_)));
        let err = Column::value("age", DataType::int(), vec![Value::Null]).unwrap_err();
        assert!(matches!(err, FrameError::TypeMismatch(_)));
    }

    #[test]
    fn test_rename_keeps_source() {
        let col = ages();
        let renamed = col.rename("years");
        assert_eq!(col.name(), "age");
        assert_eq!(renamed.name(), "years");
        assert_ne!(col, renamed);
    }

    #[test]
    fn test_slice_and_equality() {
        let col = ages();
        let sliced = col.slice(1..3).unwrap();
        assert_eq!(sliced.values().collect::<Vec<_>>(), vec![Value::Int(45), Value::Int(15)]);
        assert_eq!(sliced.slice(0..2).unwrap(), sliced);
        assert_eq!(col.slice(0..3).unwrap(), col);
    }

    #[test]
    fn test_placeholder() {
        assert!(Column::placeholder().is_placeholder());
        assert!(!Column::empty("x").is_placeholder());
    }
}
