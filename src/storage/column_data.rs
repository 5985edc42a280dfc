use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;

use crate::core::{FrameError, Memo, Result, Value};

/// Positional storage for the values of one column.
///
/// Values live in a shared immutable buffer; a `ColumnData` is a window into
/// it, so slicing never copies. The distinct-value set is computed lazily on
/// the first membership query and then reused by every clone of this window.
#[derive(Debug, Clone)]
pub struct ColumnData {
    values: Arc<[Value]>,
    start: usize,
    len: usize,
    distinct: Memo<HashSet<Value>>,
}

impl ColumnData {
    pub fn new(values: Vec<Value>) -> Self {
        let len = values.len();
        Self {
            values: values.into(),
            start: 0,
            len,
            distinct: Memo::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn nulls(len: usize) -> Self {
        Self::new(vec![Value::Null; len])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.as_slice().get(index)
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.values[self.start..self.start + self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.as_slice().iter()
    }

    /// Window over `range` (relative to this window). The full range returns
    /// this window unchanged, cache included.
    pub fn slice(&self, range: Range<usize>) -> Result<Self> {
        if range.start > range.end || range.end > self.len {
            return Err(FrameError::RowIndexOutOfBounds {
                index: range.end.max(range.start),
                rows: self.len,
            });
        }
        if range.start == 0 && range.end == self.len {
            return Ok(self.clone());
        }
        Ok(Self {
            values: Arc::clone(&self.values),
            start: self.start + range.start,
            len: range.end - range.start,
            distinct: Memo::new(),
        })
    }

    pub fn distinct(&self) -> &HashSet<Value> {
        self.distinct
            .get_or_init(|| self.as_slice().iter().cloned().collect())
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.distinct().contains(value)
    }

    pub fn has_nulls(&self) -> bool {
        self.iter().any(Value::is_null)
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.as_slice().to_vec()
    }
}

impl FromIterator<Value> for ColumnData {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> ColumnData {
        ColumnData::new(vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(2),
            Value::Null,
        ])
    }

    #[test]
    fn test_positional_access() {
        let data = data();
        assert_eq!(data.len(), 4);
        assert_eq!(data.get(1), Some(&Value::Int(2)));
        assert_eq!(data.get(4), None);
    }

    #[test]
    fn test_distinct_is_cached() {
        let data = data();
        assert!(data.contains(&Value::Int(2)));
        assert!(!data.contains(&Value::Int(5)));
        assert_eq!(data.distinct().len(), 3);
        assert!(data.clone().distinct.is_computed());
    }

    #[test]
    fn test_slice_shares_buffer() -> Result<()> {
        let data = data();
        let slice = data.slice(1..3)?;
        assert_eq!(slice.as_slice(), &[Value::Int(2), Value::Int(2)]);
        let inner = slice.slice(1..2)?;
        assert_eq!(inner.as_slice(), &[Value::Int(2)]);
        assert!(Arc::ptr_eq(&data.values, &inner.values));
        Ok(())
    }

    #[test]
    fn test_full_slice_is_noop() -> Result<()> {
        let data = data();
        let same = data.slice(0..4)?;
        assert_eq!(same.as_slice(), data.as_slice());
        assert!(data.slice(2..5).is_err());
        Ok(())
    }
}
