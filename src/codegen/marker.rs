use std::fmt;

use serde::Serialize;

use crate::core::{ColumnKind, DataType};
use crate::schema::DataFrameSchema;

/// Handle of a marker inside the registry that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub(crate) usize);

impl MarkerId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Type of a declared marker field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Value(DataType),
    /// Nested row; `marker` is set when a marker describes the nested schema.
    Group {
        schema: DataFrameSchema,
        marker: Option<MarkerId>,
    },
    Frame {
        schema: DataFrameSchema,
        marker: Option<MarkerId>,
    },
}

impl FieldType {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Value(_) => ColumnKind::Value,
            Self::Group { .. } => ColumnKind::Group,
            Self::Frame { .. } => ColumnKind::Frame,
        }
    }

    pub fn marker(&self) -> Option<MarkerId> {
        match self {
            Self::Value(_) => None,
            Self::Group { marker, .. } | Self::Frame { marker, .. } => *marker,
        }
    }
}

/// Field a marker declares itself, as opposed to one it inherits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerField {
    pub column_name: String,
    pub field_name: String,
    pub field_type: FieldType,
    /// Narrows a field with the same column name inherited from a base.
    pub overrides: bool,
}

/// Named schema that generated code can refer to.
#[derive(Debug, Clone)]
pub struct Marker {
    pub(crate) id: MarkerId,
    pub(crate) name: String,
    pub(crate) schema: DataFrameSchema,
    pub(crate) fields: Vec<MarkerField>,
    pub(crate) bases: Vec<MarkerId>,
    pub(crate) is_open: bool,
}

impl Marker {
    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full schema, inherited columns included.
    pub fn schema(&self) -> &DataFrameSchema {
        &self.schema
    }

    pub fn fields(&self) -> &[MarkerField] {
        &self.fields
    }

    pub fn field(&self, column_name: &str) -> Option<&MarkerField> {
        self.fields.iter().find(|f| f.column_name == column_name)
    }

    /// Directly declared bases.
    pub fn bases(&self) -> &[MarkerId] {
        &self.bases
    }

    /// Open markers may be extended by larger schemas.
    pub fn is_open(&self) -> bool {
        self.is_open
    }
}

/// Language-neutral description of a marker for code emitters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerDescription {
    pub name: String,
    pub fields: Vec<FieldDescription>,
    pub bases: Vec<String>,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescription {
    pub column_name: String,
    pub field_name: String,
    pub kind: ColumnKind,
    /// Value type, or the name of the nested marker for group and frame
    /// fields (the nested schema when there is none).
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(rename = "override")]
    pub overrides: bool,
}
