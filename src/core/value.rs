use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::types::ScalarClass;
use crate::frame::{DataFrame, DataRow, equality};

/// A single cell value.
///
/// `Row` and `Frame` carry nested data for group and frame columns; both are
/// cheap handles over shared immutable frames.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    String(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    List(Vec<Value>),
    Row(DataRow),
    Frame(DataFrame),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::List(_) => "List",
            Self::Row(_) => "Row",
            Self::Frame(_) => "Frame",
            other => other
                .scalar_class()
                .map(ScalarClass::name)
                .unwrap_or("Any"),
        }
    }

    /// Runtime class for scalar values; `None` for nulls and nested values.
    pub fn scalar_class(&self) -> Option<ScalarClass> {
        let class = match self {
            Self::Boolean(_) => ScalarClass::Boolean,
            Self::Byte(_) => ScalarClass::Byte,
            Self::Short(_) => ScalarClass::Short,
            Self::Int(_) => ScalarClass::Int,
            Self::Long(_) => ScalarClass::Long,
            Self::Float(_) => ScalarClass::Float,
            Self::Double(_) => ScalarClass::Double,
            Self::Char(_) => ScalarClass::Char,
            Self::String(_) => ScalarClass::String,
            Self::Date(_) => ScalarClass::Date,
            Self::Timestamp(_) => ScalarClass::Timestamp,
            Self::Uuid(_) => ScalarClass::Uuid,
            Self::Null | Self::List(_) | Self::Row(_) | Self::Frame(_) => return None,
        };
        Some(class)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_numeric(&self) -> bool {
        self.scalar_class().is_some_and(ScalarClass::is_number)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Byte(v) => Some(i64::from(*v)),
            Self::Short(v) => Some(i64::from(*v)),
            Self::Int(v) => Some(i64::from(*v)),
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(f64::from(*f)),
            Self::Double(f) => Some(*f),
            other => other.as_i64().map(|i| i as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_row(&self) -> Option<&DataRow> {
        match self {
            Self::Row(row) => Some(row),
            _ => None,
        }
    }

    pub fn as_frame(&self) -> Option<&DataFrame> {
        match self {
            Self::Frame(frame) => Some(frame),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        equality::values_equal(self, other)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Null => 0u8.hash(state),
            Self::Boolean(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Self::Byte(v) => {
                2u8.hash(state);
                v.hash(state);
            }
            Self::Short(v) => {
                3u8.hash(state);
                v.hash(state);
            }
            Self::Int(v) => {
                4u8.hash(state);
                v.hash(state);
            }
            Self::Long(v) => {
                5u8.hash(state);
                v.hash(state);
            }
            Self::Float(f) => {
                6u8.hash(state);
                equality::canonical_f32_bits(*f).hash(state);
            }
            Self::Double(f) => {
                7u8.hash(state);
                equality::canonical_f64_bits(*f).hash(state);
            }
            Self::Char(c) => {
                8u8.hash(state);
                c.hash(state);
            }
            Self::String(s) => {
                9u8.hash(state);
                s.hash(state);
            }
            Self::Date(d) => {
                10u8.hash(state);
                d.hash(state);
            }
            Self::Timestamp(t) => {
                11u8.hash(state);
                t.hash(state);
            }
            Self::Uuid(u) => {
                12u8.hash(state);
                u.hash(state);
            }
            Self::List(_) | Self::Row(_) | Self::Frame(_) => {
                equality::hash_value(self).hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Byte(v) => write!(f, "{}", v),
            Self::Short(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Long(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::Char(c) => write!(f, "{}", c),
            Self::String(s) => write!(f, "{}", s),
            Self::Date(d) => write!(f, "{}", d),
            Self::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            Self::Uuid(u) => write!(f, "{}", u),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Self::Row(row) => write!(f, "{}", row),
            Self::Frame(frame) => write!(
                f,
                "[{} x {}]",
                frame.rows_count(),
                frame.columns_count()
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Self::Byte(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::Short(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Timestamp(t)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<DataRow> for Value {
    fn from(row: DataRow) -> Self {
        Self::Row(row)
    }
}

impl From<DataFrame> for Value {
    fn from(frame: DataFrame) -> Self {
        Self::Frame(frame)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Int(42), Value::Int(42));
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert_ne!(Value::Int(1), Value::Long(1));
        assert_ne!(Value::Int(1), Value::Int(2));
    }

    #[test]
    fn test_hash_matches_equality() {
        let set: HashSet<Value> = [Value::Double(0.0), Value::Double(-0.0), Value::Int(0)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_scalar_class() {
        assert_eq!(Value::from("a").scalar_class(), Some(ScalarClass::String));
        assert_eq!(Value::Null.scalar_class(), None);
        assert_eq!(Value::from(vec![1, 2]).type_name(), "List");
    }
}
