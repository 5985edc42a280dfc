use std::fmt;
use std::hash::{Hash, Hasher};

use crate::core::{Result, Value};

use super::{ColumnPath, DataFrame, equality};

/// Lazy view of one row of a frame. Cells are read on demand.
#[derive(Clone)]
pub struct DataRow {
    frame: DataFrame,
    index: usize,
}

impl DataRow {
    pub(crate) fn new(frame: DataFrame, index: usize) -> Self {
        Self { frame, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame.column_names()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.frame.column(name)?.get(self.index)
    }

    pub fn get_at_path(&self, path: &ColumnPath) -> Option<Value> {
        self.frame.column_at_path(path)?.get(self.index)
    }

    pub fn values(&self) -> Vec<Value> {
        self.frame
            .columns()
            .iter()
            .filter_map(|c| c.get(self.index))
            .collect()
    }

    /// One-row frame holding this row.
    pub fn to_frame(&self) -> Result<DataFrame> {
        self.frame.slice_rows(self.index..self.index + 1)
    }
}

impl PartialEq for DataRow {
    fn eq(&self, other: &Self) -> bool {
        equality::rows_equal(self, other)
    }
}

impl Eq for DataRow {}

impl Hash for DataRow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        equality::hash_row(self).hash(state);
    }
}

impl fmt::Display for DataRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, column) in self.frame.columns().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match column.get(self.index) {
                Some(value) => write!(f, "{}: {}", column.name(), value)?,
                None => write!(f, "{}: null", column.name())?,
            }
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for DataRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataRow#{}{}", self.index, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;
    use crate::frame::Column;

    #[test]
    fn test_row_view() -> Result<()> {
        let frame = DataFrame::new(vec![
            Column::value("name", DataType::string(), vec!["Alice".into(), "Bob".into()])?,
            Column::value("age", DataType::int(), vec![15.into(), 45.into()])?,
        ])?;
        let row = frame.row(1)?;
        assert_eq!(row.get("name"), Some(Value::from("Bob")));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.values(), vec![Value::from("Bob"), Value::Int(45)]);
        assert_eq!(row.to_string(), "{name: Bob, age: 45}");
        assert_eq!(row.to_frame()?.rows_count(), 1);
        assert!(frame.row(2).is_err());
        Ok(())
    }

    #[test]
    fn test_rows_from_different_frames_compare_structurally() -> Result<()> {
        let a = DataFrame::new(vec![Column::value("x", DataType::int(), vec![1.into(), 2.into()])?])?;
        let b = DataFrame::new(vec![Column::value("x", DataType::int(), vec![2.into()])?])?;
        assert_eq!(a.row(1)?, b.row(0)?);
        assert_ne!(a.row(0)?, b.row(0)?);
        Ok(())
    }
}
