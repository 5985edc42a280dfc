use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::sync::Arc;

use crate::core::{FrameError, Memo, Result};
use crate::schema::DataFrameSchema;
use crate::select::{
    ColumnFilter, ColumnSelector, ColumnSet, IndexSpec, MissingColumnPolicy, ResolutionContext,
    SingleColumn,
};

use super::{Column, ColumnPath, DataRow, equality};

/// Ordered collection of uniquely named, equal-length columns.
///
/// Frames are immutable and cheap to clone; every transformation returns a
/// new frame that shares the columns it did not touch.
#[derive(Clone)]
pub struct DataFrame {
    inner: Arc<FrameInner>,
}

struct FrameInner {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    rows: usize,
    schema: Memo<DataFrameSchema>,
    hash: Memo<u64>,
}

impl DataFrame {
    /// Builds a frame, rejecting duplicate names and columns of different
    /// lengths. The row count is taken from the first column.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map_or(0, Column::size);
        Self::with_row_count(columns, rows)
    }

    /// Like [`new`](Self::new) but with an explicit row count, which allows
    /// frames that have rows but no columns.
    pub fn with_row_count(columns: Vec<Column>, rows: usize) -> Result<Self> {
        let mut index = HashMap::with_capacity(columns.len());
        for (position, column) in columns.iter().enumerate() {
            if column.size() != rows {
                return Err(FrameError::LengthMismatch {
                    column: column.name().to_string(),
                    expected: rows,
                    actual: column.size(),
                });
            }
            if column.is_placeholder() {
                continue;
            }
            if column.name().is_empty() {
                return Err(FrameError::EmptyColumnName);
            }
            if index.insert(column.name().to_string(), position).is_some() {
                return Err(FrameError::DuplicateColumn(column.name().to_string()));
            }
        }
        Ok(Self {
            inner: Arc::new(FrameInner {
                columns,
                index,
                rows,
                schema: Memo::new(),
                hash: Memo::new(),
            }),
        })
    }

    pub fn empty() -> Self {
        Self::empty_with_rows(0)
    }

    pub fn empty_with_rows(rows: usize) -> Self {
        Self {
            inner: Arc::new(FrameInner {
                columns: Vec::new(),
                index: HashMap::new(),
                rows,
                schema: Memo::new(),
                hash: Memo::new(),
            }),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.inner.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.inner.columns.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn rows_count(&self) -> usize {
        self.inner.rows
    }

    pub fn columns_count(&self) -> usize {
        self.inner.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.rows == 0 && self.inner.columns.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.inner.index.get(name).copied()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.inner.columns[i])
    }

    /// Navigates nested groups without applying any missing-column policy.
    pub fn column_at_path(&self, path: &ColumnPath) -> Option<&Column> {
        let (last, parents) = path.names().split_last()?;
        let mut frame = self;
        for name in parents {
            frame = frame.column(name)?.as_group()?.frame();
        }
        frame.column(last)
    }

    pub fn get_column(&self, name: &str, policy: MissingColumnPolicy) -> Result<Option<Column>> {
        self.get_column_at_path(&ColumnPath::from(name), policy)
    }

    pub fn get_column_at_path(
        &self,
        path: &ColumnPath,
        policy: MissingColumnPolicy,
    ) -> Result<Option<Column>> {
        let context = ResolutionContext::new(self, policy);
        let resolved = ColumnSelector::path(path.clone()).resolve_single(&context)?;
        Ok(resolved.map(|r| r.column))
    }

    /// The single top-level column matching `predicate`.
    pub fn get_column_by<F>(&self, predicate: F, policy: MissingColumnPolicy) -> Result<Option<Column>>
    where
        F: Fn(&Column) -> bool + Send + Sync + 'static,
    {
        let context = ResolutionContext::new(self, policy);
        let selector = ColumnSelector::all()
            .filter(ColumnFilter::custom("predicate", move |r| predicate(&r.column)))
            .at(IndexSpec::Single);
        Ok(selector.resolve_single(&context)?.map(|r| r.column))
    }

    pub fn row(&self, index: usize) -> Result<DataRow> {
        if index >= self.rows_count() {
            return Err(FrameError::RowIndexOutOfBounds {
                index,
                rows: self.rows_count(),
            });
        }
        Ok(DataRow::new(self.clone(), index))
    }

    /// Lazy row views; nothing is materialized up front.
    pub fn rows(&self) -> impl Iterator<Item = DataRow> + '_ {
        (0..self.rows_count()).map(move |i| DataRow::new(self.clone(), i))
    }

    /// Frame made of the resolved columns of `selector`.
    pub fn select(&self, selector: &dyn ColumnSet) -> Result<DataFrame> {
        let context = ResolutionContext::new(self, MissingColumnPolicy::Fail);
        let resolved = selector.resolve(&context)?;
        let columns = resolved.into_iter().map(|r| r.column).collect();
        Self::with_row_count(columns, self.rows_count())
    }

    pub fn slice_rows(&self, range: Range<usize>) -> Result<DataFrame> {
        if range.start > range.end || range.end > self.rows_count() {
            return Err(FrameError::RowIndexOutOfBounds {
                index: range.end.max(range.start),
                rows: self.rows_count(),
            });
        }
        if range.start == 0 && range.end == self.rows_count() {
            return Ok(self.clone());
        }
        let rows = range.end - range.start;
        let columns = self
            .columns()
            .iter()
            .map(|c| c.slice(range.clone()))
            .collect::<Result<Vec<_>>>()?;
        Self::with_row_count(columns, rows)
    }

    pub fn take_rows(&self, indices: &[usize]) -> Result<DataFrame> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.rows_count()) {
            return Err(FrameError::RowIndexOutOfBounds {
                index: bad,
                rows: self.rows_count(),
            });
        }
        let columns = self
            .columns()
            .iter()
            .map(|c| c.take(indices))
            .collect::<Result<Vec<_>>>()?;
        Self::with_row_count(columns, indices.len())
    }

    pub fn filter_rows(&self, predicate: impl Fn(&DataRow) -> bool) -> Result<DataFrame> {
        let keep: Vec<usize> = self
            .rows()
            .filter(|row| predicate(row))
            .map(|row| row.index())
            .collect();
        self.take_rows(&keep)
    }

    pub fn add_column(&self, column: Column) -> Result<DataFrame> {
        let mut columns = self.columns().to_vec();
        columns.push(column);
        Self::with_row_count(columns, self.rows_count())
    }

    pub fn remove_column(&self, name: &str) -> Result<DataFrame> {
        let position = self.require_index(name)?;
        let mut columns = self.columns().to_vec();
        columns.remove(position);
        Self::with_row_count(columns, self.rows_count())
    }

    pub fn rename_column(&self, name: &str, new_name: &str) -> Result<DataFrame> {
        let position = self.require_index(name)?;
        let mut columns = self.columns().to_vec();
        columns[position] = columns[position].rename(new_name);
        Self::with_row_count(columns, self.rows_count())
    }

    /// Moves the named top-level columns into a new group column `into`,
    /// placed where the first of them used to be.
    pub fn group_columns(&self, names: &[&str], into: &str) -> Result<DataFrame> {
        let positions = names
            .iter()
            .map(|name| self.require_index(name))
            .collect::<Result<Vec<_>>>()?;
        let moved: HashSet<usize> = positions.iter().copied().collect();
        let nested = DataFrame::with_row_count(
            positions.iter().map(|&i| self.columns()[i].clone()).collect(),
            self.rows_count(),
        )?;
        let insert_at = positions.iter().copied().min().unwrap_or(self.columns_count());

        let mut columns = Vec::with_capacity(self.columns_count() + 1 - moved.len());
        for (i, column) in self.columns().iter().enumerate() {
            if i == insert_at {
                columns.push(Column::group(into, nested.clone())?);
            }
            if !moved.contains(&i) {
                columns.push(column.clone());
            }
        }
        if insert_at == self.columns_count() {
            columns.push(Column::group(into, nested)?);
        }
        Self::with_row_count(columns, self.rows_count())
    }

    /// Replaces group column `name` with its children.
    pub fn ungroup(&self, name: &str) -> Result<DataFrame> {
        let position = self.require_index(name)?;
        let group = self.columns()[position]
            .as_group()
            .ok_or_else(|| FrameError::NotAGroup(ColumnPath::from(name)))?;
        let mut columns = Vec::with_capacity(self.columns_count() + group.columns().len());
        for (i, column) in self.columns().iter().enumerate() {
            if i == position {
                columns.extend(group.columns().iter().cloned());
            } else {
                columns.push(column.clone());
            }
        }
        Self::with_row_count(columns, self.rows_count())
    }

    /// Structural schema, derived once per frame instance.
    pub fn schema(&self) -> &DataFrameSchema {
        self.inner
            .schema
            .get_or_init(|| DataFrameSchema::extract(self))
    }

    pub fn ptr_eq(&self, other: &DataFrame) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn structural_hash(&self) -> u64 {
        *self.inner.hash.get_or_init(|| equality::hash_frame(self))
    }

    fn require_index(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| FrameError::ColumnNotFound(ColumnPath::from(name)))
    }
}

impl Default for DataFrame {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for DataFrame {
    fn eq(&self, other: &Self) -> bool {
        equality::frames_equal(self, other)
    }
}

impl Eq for DataFrame {}

impl Hash for DataFrame {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.structural_hash().hash(state);
    }
}

impl fmt::Debug for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataFrame")
            .field("columns", &self.column_names())
            .field("rows", &self.rows_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataType, Value};

    fn people() -> DataFrame {
        DataFrame::new(vec![
            Column::value("firstName", DataType::string(), vec!["Alice".into(), "Bob".into()]).unwrap(),
            Column::value("lastName", DataType::string(), vec!["Cooper".into(), "Dylan".into()]).unwrap(),
            Column::value("age", DataType::int(), vec![15.into(), 45.into()]).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_construction_invariants() {
        let a = Column::value("a", DataType::int(), vec![1.into()]).unwrap();
        let b = Column::value("b", DataType::int(), vec![1.into(), 2.into()]).unwrap();
        assert!(matches!(
            DataFrame::new(vec![a.clone(), b]),
            Err(FrameError::LengthMismatch { .. })
        ));
        assert!(matches!(
            DataFrame::new(vec![a.clone(), a]),
            Err(FrameError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn test_placeholders_may_repeat() {
        let frame = DataFrame::new(vec![Column::placeholder(), Column::placeholder()]).unwrap();
        assert_eq!(frame.columns_count(), 2);
    }

    #[test]
    fn test_group_and_ungroup() -> Result<()> {
        let frame = people();
        let grouped = frame.group_columns(&["firstName", "lastName"], "name")?;
        assert_eq!(grouped.column_names(), vec!["name", "age"]);
        let name = grouped.column("name").and_then(Column::as_group).unwrap();
        assert_eq!(name.frame().column_names(), vec!["firstName", "lastName"]);
        assert_eq!(
            grouped.column_at_path(&ColumnPath::from(vec!["name", "lastName"])).map(Column::size),
            Some(2)
        );
        let flat = grouped.ungroup("name")?;
        assert_eq!(flat, frame);
        Ok(())
    }

    #[test]
    fn test_slice_and_filter() -> Result<()> {
        let frame = people();
        let tail = frame.slice_rows(1..2)?;
        assert_eq!(tail.rows_count(), 1);
        assert_eq!(tail.row(0)?.get("age"), Some(Value::Int(45)));
        assert!(frame.slice_rows(0..2)?.ptr_eq(&frame));

        let adults = frame.filter_rows(|row| {
            row.get("age").and_then(|v| v.as_i64()).is_some_and(|age| age >= 18)
        })?;
        assert_eq!(adults.rows_count(), 1);
        Ok(())
    }

    #[test]
    fn test_rename_and_remove() -> Result<()> {
        let frame = people().rename_column("age", "years")?.remove_column("lastName")?;
        assert_eq!(frame.column_names(), vec!["firstName", "years"]);
        assert!(frame.remove_column("missing").is_err());
        Ok(())
    }
}
