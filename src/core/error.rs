use thiserror::Error;

use crate::frame::ColumnPath;

/// Broad failure category, used by callers that only care about the class of
/// failure and not the exact column involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Structural,
    Resolution,
    TypeConflict,
    TypeMismatch,
    Serialization,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("Column name must not be empty")]
    EmptyColumnName,

    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Row index {index} is out of bounds for frame with {rows} rows")]
    RowIndexOutOfBounds { index: usize, rows: usize },

    #[error("Column '{0}' is not a column group")]
    NotAGroup(ColumnPath),

    #[error("Column '{0}' not found")]
    ColumnNotFound(ColumnPath),

    #[error("No such element: {selector} resolved to no columns")]
    NoSuchElement { selector: String },

    #[error("Invalid column name pattern {0}")]
    InvalidPattern(String),

    #[error("Ambiguous selection: {selector} resolved to {count} columns, expected exactly one")]
    Ambiguous { selector: String, count: usize },

    #[error(
        "Type conflict for column '{column}' in marker '{marker}': target has {target}, base declares {base}"
    )]
    TypeConflict {
        column: String,
        target: String,
        base: String,
        marker: String,
    },

    #[error("Marker '{0}' is already registered")]
    DuplicateMarker(String),

    #[error("Marker '{marker}' has the same schema and openness as '{existing}'")]
    DuplicateMarkerSchema { marker: String, existing: String },

    #[error("Unknown marker id {0}")]
    UnknownMarker(usize),

    #[error("Marker '{marker}' cannot extend '{base}': {reason}")]
    InvalidBase {
        marker: String,
        base: String,
        reason: String,
    },

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FrameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateColumn(_)
            | Self::LengthMismatch { .. }
            | Self::RowIndexOutOfBounds { .. }
            | Self::NotAGroup(_)
            | Self::EmptyColumnName
            | Self::DuplicateMarker(_)
            | Self::DuplicateMarkerSchema { .. } => ErrorKind::Structural,
            Self::ColumnNotFound(_)
            | Self::NoSuchElement { .. }
            | Self::Ambiguous { .. }
            | Self::InvalidPattern(_)
            | Self::UnknownMarker(_) => ErrorKind::Resolution,
            Self::TypeConflict { .. } | Self::InvalidBase { .. } => ErrorKind::TypeConflict,
            Self::TypeMismatch(_) => ErrorKind::TypeMismatch,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
