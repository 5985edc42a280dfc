use std::fmt;

use crate::core::{ColumnKind, DataType};
use crate::frame::{Column, DataFrame};
use crate::inference::lattice;

/// Structural description of one column, without its name or data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSchema {
    Value(DataType),
    Group(DataFrameSchema),
    Frame(DataFrameSchema),
}

impl ColumnSchema {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Value(_) => ColumnKind::Value,
            Self::Group(_) => ColumnKind::Group,
            Self::Frame(_) => ColumnKind::Frame,
        }
    }

    pub fn data_type(&self) -> Option<&DataType> {
        match self {
            Self::Value(t) => Some(t),
            _ => None,
        }
    }

    pub fn nested(&self) -> Option<&DataFrameSchema> {
        match self {
            Self::Value(_) => None,
            Self::Group(s) | Self::Frame(s) => Some(s),
        }
    }
}

impl fmt::Display for ColumnSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(t) => write!(f, "{}", t),
            Self::Group(s) => write!(f, "Group{}", s),
            Self::Frame(s) => write!(f, "Frame{}", s),
        }
    }
}

/// Ordered map from column name to [`ColumnSchema`].
///
/// Column order is kept for reproducible output, but equality and comparison
/// are by name only.
#[derive(Debug, Clone, Default)]
pub struct DataFrameSchema {
    columns: Vec<(String, ColumnSchema)>,
}

impl DataFrameSchema {
    pub fn new(columns: Vec<(String, ColumnSchema)>) -> Self {
        columns
            .into_iter()
            .fold(Self::default(), |schema, (name, column)| {
                schema.with_column(name, column)
            })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a column, replacing any existing column of the same name in place.
    pub fn with_column(mut self, name: impl Into<String>, column: ColumnSchema) -> Self {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = column,
            None => self.columns.push((name, column)),
        }
        self
    }

    /// Walks the frame's columns once. Nested frames contribute their own
    /// memoized schema.
    pub fn extract(frame: &DataFrame) -> Self {
        let columns = frame
            .columns()
            .iter()
            .filter(|c| !c.is_placeholder())
            .map(|column| {
                let schema = match column {
                    Column::Value(c) => ColumnSchema::Value(c.data_type().clone()),
                    Column::Group(c) => ColumnSchema::Group(c.frame().schema().clone()),
                    Column::Frame(c) => ColumnSchema::Frame(c.schema().clone()),
                };
                (column.name().to_string(), schema)
            })
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnSchema)> + '_ {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns present in every schema. Shared value columns get their
    /// common supertype, shared groups and frames are intersected
    /// recursively, and a name used with different kinds becomes `Any`.
    pub fn intersect_all(schemas: &[&DataFrameSchema]) -> Self {
        let Some((first, rest)) = schemas.split_first() else {
            return Self::empty();
        };
        let mut result = Self::empty();
        for (name, column) in first.columns() {
            let mut shared = vec![column];
            for other in rest {
                match other.column(name) {
                    Some(c) => shared.push(c),
                    None => break,
                }
            }
            if shared.len() == schemas.len() {
                result.columns.push((name.to_string(), intersect_columns(&shared)));
            }
        }
        result
    }
}

fn intersect_columns(columns: &[&ColumnSchema]) -> ColumnSchema {
    let kind = columns[0].kind();
    if columns.iter().any(|c| c.kind() != kind) {
        let nullable = columns
            .iter()
            .any(|c| c.data_type().is_some_and(DataType::is_nullable));
        return ColumnSchema::Value(DataType::any().with_nullability(nullable));
    }
    match kind {
        ColumnKind::Value => {
            let types: Vec<&DataType> = columns.iter().filter_map(|c| c.data_type()).collect();
            ColumnSchema::Value(lattice::common_supertype(&types))
        }
        ColumnKind::Group | ColumnKind::Frame => {
            let nested: Vec<&DataFrameSchema> = columns.iter().filter_map(|c| c.nested()).collect();
            let schema = DataFrameSchema::intersect_all(&nested);
            if kind == ColumnKind::Group {
                ColumnSchema::Group(schema)
            } else {
                ColumnSchema::Frame(schema)
            }
        }
    }
}

impl PartialEq for DataFrameSchema {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .columns()
                .all(|(name, column)| other.column(name) == Some(column))
    }
}

impl Eq for DataFrameSchema {}

impl fmt::Display for DataFrameSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, column)) in self.columns().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, column)?;
        }
        write!(f, "}}")
    }
}
