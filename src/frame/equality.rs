//! Structural equality and hashing for frames, columns, rows and values.
//!
//! Nested data (groups inside groups, frames inside frame columns, rows and
//! lists inside values) is compared with an explicit work stack, so the depth
//! of nesting never turns into call-stack depth.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::core::Value;

use super::{Column, DataFrame, DataRow};

enum Pending<'a> {
    Frames(&'a DataFrame, &'a DataFrame),
    Columns(&'a Column, &'a Column),
    /// Cell `i` of the first column against cell `j` of the second.
    Cells(&'a Column, usize, &'a Column, usize),
    Values(&'a Value, &'a Value),
}

pub(crate) fn frames_equal(a: &DataFrame, b: &DataFrame) -> bool {
    drain(vec![Pending::Frames(a, b)])
}

pub(crate) fn columns_equal(a: &Column, b: &Column) -> bool {
    drain(vec![Pending::Columns(a, b)])
}

pub(crate) fn rows_equal(a: &DataRow, b: &DataRow) -> bool {
    let mut stack = Vec::new();
    if !push_row_cells(&mut stack, a, b) {
        return false;
    }
    drain(stack)
}

pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    drain(vec![Pending::Values(a, b)])
}

fn drain(mut stack: Vec<Pending<'_>>) -> bool {
    while let Some(pending) = stack.pop() {
        let consistent = match pending {
            Pending::Frames(a, b) => push_frames(&mut stack, a, b),
            Pending::Columns(a, b) => push_columns(&mut stack, a, b),
            Pending::Cells(a, i, b, j) => push_cells(&mut stack, a, i, b, j),
            Pending::Values(a, b) => push_values(&mut stack, a, b),
        };
        if !consistent {
            return false;
        }
    }
    true
}

fn push_frames<'a>(stack: &mut Vec<Pending<'a>>, a: &'a DataFrame, b: &'a DataFrame) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    if a.rows_count() != b.rows_count() || a.columns_count() != b.columns_count() {
        return false;
    }
    stack.extend(
        a.columns()
            .iter()
            .zip(b.columns())
            .map(|(x, y)| Pending::Columns(x, y)),
    );
    true
}

fn push_columns<'a>(stack: &mut Vec<Pending<'a>>, a: &'a Column, b: &'a Column) -> bool {
    if a.name() != b.name() || a.kind() != b.kind() || a.size() != b.size() {
        return false;
    }
    match (a, b) {
        (Column::Value(x), Column::Value(y)) => {
            if x.data_type() != y.data_type() {
                return false;
            }
            stack.extend(
                x.data()
                    .iter()
                    .zip(y.data().iter())
                    .map(|(u, v)| Pending::Values(u, v)),
            );
            true
        }
        (Column::Group(x), Column::Group(y)) => {
            stack.push(Pending::Frames(x.frame(), y.frame()));
            true
        }
        (Column::Frame(x), Column::Frame(y)) => {
            stack.extend(
                x.data()
                    .iter()
                    .zip(y.data().iter())
                    .map(|(u, v)| Pending::Values(u, v)),
            );
            true
        }
        _ => false,
    }
}

fn push_cells<'a>(
    stack: &mut Vec<Pending<'a>>,
    a: &'a Column,
    i: usize,
    b: &'a Column,
    j: usize,
) -> bool {
    if a.name() != b.name() {
        return false;
    }
    match (a, b) {
        (Column::Value(x), Column::Value(y)) => match (x.data().get(i), y.data().get(j)) {
            (Some(u), Some(v)) => {
                stack.push(Pending::Values(u, v));
                true
            }
            _ => false,
        },
        (Column::Frame(x), Column::Frame(y)) => match (x.data().get(i), y.data().get(j)) {
            (Some(u), Some(v)) => {
                stack.push(Pending::Values(u, v));
                true
            }
            _ => false,
        },
        (Column::Group(x), Column::Group(y)) => {
            if x.columns().len() != y.columns().len() {
                return false;
            }
            stack.extend(
                x.columns()
                    .iter()
                    .zip(y.columns())
                    .map(|(p, q)| Pending::Cells(p, i, q, j)),
            );
            true
        }
        _ => false,
    }
}

fn push_row_cells<'a>(stack: &mut Vec<Pending<'a>>, a: &'a DataRow, b: &'a DataRow) -> bool {
    let (x, y) = (a.frame(), b.frame());
    if x.columns_count() != y.columns_count() {
        return false;
    }
    stack.extend(
        x.columns()
            .iter()
            .zip(y.columns())
            .map(|(p, q)| Pending::Cells(p, a.index(), q, b.index())),
    );
    true
}

fn push_values<'a>(stack: &mut Vec<Pending<'a>>, a: &'a Value, b: &'a Value) -> bool {
    match (a, b) {
        (Value::List(x), Value::List(y)) => {
            if x.len() != y.len() {
                return false;
            }
            stack.extend(x.iter().zip(y).map(|(u, v)| Pending::Values(u, v)));
            true
        }
        (Value::Row(x), Value::Row(y)) => push_row_cells(stack, x, y),
        (Value::Frame(x), Value::Frame(y)) => {
            stack.push(Pending::Frames(x, y));
            true
        }
        _ => scalars_equal(a, b),
    }
}

fn scalars_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::Byte(x), Value::Byte(y)) => x == y,
        (Value::Short(x), Value::Short(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Long(x), Value::Long(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::Double(x), Value::Double(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::Char(x), Value::Char(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Date(x), Value::Date(y)) => x == y,
        (Value::Timestamp(x), Value::Timestamp(y)) => x == y,
        (Value::Uuid(x), Value::Uuid(y)) => x == y,
        _ => false,
    }
}

/// Bits that agree whenever two floats compare equal (`0.0 == -0.0`, and all
/// NaNs are treated as one value).
pub(crate) fn canonical_f64_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

pub(crate) fn canonical_f32_bits(value: f32) -> u32 {
    if value.is_nan() {
        f32::NAN.to_bits()
    } else if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

enum HashItem<'a> {
    Frame(&'a DataFrame),
    Column(&'a Column),
    /// Cell `index` of a column, as seen through a row.
    Cell(&'a Column, usize),
    Row(&'a DataRow),
    Value(&'a Value),
}

/// Structural hash of a frame. Agrees with [`frames_equal`].
pub(crate) fn hash_frame(frame: &DataFrame) -> u64 {
    hash_items(vec![HashItem::Frame(frame)])
}

pub(crate) fn hash_row(row: &DataRow) -> u64 {
    hash_items(vec![HashItem::Row(row)])
}

pub(crate) fn hash_value(value: &Value) -> u64 {
    hash_items(vec![HashItem::Value(value)])
}

/// Feeds every reachable cell into one hasher, nested structures included,
/// using the same work-stack walk as equality.
fn hash_items(mut stack: Vec<HashItem<'_>>) -> u64 {
    let mut hasher = DefaultHasher::new();
    while let Some(item) = stack.pop() {
        match item {
            HashItem::Frame(frame) => {
                frame.rows_count().hash(&mut hasher);
                frame.columns_count().hash(&mut hasher);
                stack.extend(frame.columns().iter().rev().map(HashItem::Column));
            }
            HashItem::Column(column) => {
                column.name().hash(&mut hasher);
                column.kind().hash(&mut hasher);
                match column {
                    Column::Value(c) => {
                        c.data_type().hash(&mut hasher);
                        c.data().len().hash(&mut hasher);
                        stack.extend(c.data().iter().rev().map(HashItem::Value));
                    }
                    Column::Group(c) => stack.push(HashItem::Frame(c.frame())),
                    Column::Frame(c) => {
                        c.data().len().hash(&mut hasher);
                        stack.extend(c.data().iter().rev().map(HashItem::Value));
                    }
                }
            }
            HashItem::Cell(column, index) => {
                column.name().hash(&mut hasher);
                match column {
                    Column::Value(c) => stack.extend(c.data().get(index).map(HashItem::Value)),
                    Column::Frame(c) => stack.extend(c.data().get(index).map(HashItem::Value)),
                    Column::Group(c) => {
                        c.columns().len().hash(&mut hasher);
                        stack.extend(c.columns().iter().rev().map(|child| HashItem::Cell(child, index)));
                    }
                }
            }
            HashItem::Row(row) => {
                let columns = row.frame().columns();
                columns.len().hash(&mut hasher);
                stack.extend(columns.iter().rev().map(|c| HashItem::Cell(c, row.index())));
            }
            HashItem::Value(value) => match value {
                Value::List(items) => {
                    13u8.hash(&mut hasher);
                    items.len().hash(&mut hasher);
                    stack.extend(items.iter().rev().map(HashItem::Value));
                }
                Value::Row(row) => {
                    14u8.hash(&mut hasher);
                    stack.push(HashItem::Row(row));
                }
                Value::Frame(frame) => {
                    15u8.hash(&mut hasher);
                    stack.push(HashItem::Frame(frame));
                }
                scalar => scalar.hash(&mut hasher),
            },
        }
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;

    fn nested(depth: usize) -> DataFrame {
        let mut frame = DataFrame::new(vec![
            Column::value("leaf", DataType::int(), vec![1.into()]).unwrap(),
        ])
        .unwrap();
        for level in 0..depth {
            frame = DataFrame::new(vec![Column::group(format!("g{}", level), frame).unwrap()]).unwrap();
        }
        frame
    }

    #[test]
    fn test_deep_nesting_compares_without_recursion() {
        let a = nested(1_000);
        let b = nested(1_000);
        assert!(frames_equal(&a, &b));
        assert!(!frames_equal(&a, &nested(999)));
    }

    #[test]
    fn test_equal_frames_hash_equal() {
        assert_eq!(hash_frame(&nested(3)), hash_frame(&nested(3)));
        assert_ne!(hash_frame(&nested(3)), hash_frame(&nested(2)));
    }

    #[test]
    fn test_deep_nesting_hashes_without_recursion() {
        let a = nested(1_000);
        let b = nested(1_000);
        assert_eq!(hash_frame(&a), hash_frame(&b));
        assert_ne!(hash_frame(&a), hash_frame(&nested(999)));

        let row_a = Value::Row(DataRow::new(a.clone(), 0));
        let row_b = Value::Row(DataRow::new(b.clone(), 0));
        assert!(values_equal(&row_a, &row_b));
        assert_eq!(hash_value(&row_a), hash_value(&row_b));
        assert_eq!(hash_value(&Value::Frame(a)), hash_value(&Value::Frame(b)));
    }

    #[test]
    fn test_nested_frame_values() {
        let a = Value::List(vec![Value::Frame(nested(1)), Value::Int(3)]);
        let b = Value::List(vec![Value::Frame(nested(1)), Value::Int(3)]);
        let c = Value::List(vec![Value::Frame(nested(2)), Value::Int(3)]);
        assert!(values_equal(&a, &b));
        assert!(!values_equal(&a, &c));
    }
}
