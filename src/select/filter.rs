use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::core::{ColumnKind, DataType, FrameError, Result};

use super::ResolvedColumn;

type Predicate = Arc<dyn Fn(&ResolvedColumn) -> bool + Send + Sync>;

/// Predicate over resolved columns, used by the `filter` combinator.
#[derive(Clone)]
pub enum ColumnFilter {
    Kind(ColumnKind),
    NameEquals(String),
    NameStartsWith(String),
    NameContains(String),
    NameMatches(Regex),
    /// Value columns whose type is a subtype of the given one.
    SubtypeOf(DataType),
    Custom { label: String, predicate: Predicate },
}

impl ColumnFilter {
    pub fn kind(kind: ColumnKind) -> Self {
        Self::Kind(kind)
    }

    pub fn name_equals(name: impl Into<String>) -> Self {
        Self::NameEquals(name.into())
    }

    pub fn starts_with(prefix: impl Into<String>) -> Self {
        Self::NameStartsWith(prefix.into())
    }

    pub fn contains(part: impl Into<String>) -> Self {
        Self::NameContains(part.into())
    }

    pub fn matches(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::NameMatches)
            .map_err(|e| FrameError::InvalidPattern(format!("'{}': {}", pattern, e)))
    }

    pub fn subtype_of(data_type: DataType) -> Self {
        Self::SubtypeOf(data_type)
    }

    /// Arbitrary predicate. `label` stands in for it in error messages.
    pub fn custom<F>(label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&ResolvedColumn) -> bool + Send + Sync + 'static,
    {
        Self::Custom {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn test(&self, resolved: &ResolvedColumn) -> bool {
        let name = resolved.name();
        match self {
            Self::Kind(kind) => resolved.column.kind() == *kind,
            Self::NameEquals(expected) => name == expected,
            Self::NameStartsWith(prefix) => name.starts_with(prefix.as_str()),
            Self::NameContains(part) => name.contains(part.as_str()),
            Self::NameMatches(regex) => regex.is_match(name),
            Self::SubtypeOf(expected) => resolved
                .column
                .data_type()
                .is_some_and(|t| t.is_subtype_of(expected)),
            Self::Custom { predicate, .. } => predicate(resolved),
        }
    }
}

impl fmt::Display for ColumnFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kind(kind) => write!(f, "kind == {}", kind),
            Self::NameEquals(name) => write!(f, "name == \"{}\"", name),
            Self::NameStartsWith(prefix) => write!(f, "name startsWith \"{}\"", prefix),
            Self::NameContains(part) => write!(f, "name contains \"{}\"", part),
            Self::NameMatches(regex) => write!(f, "name matches /{}/", regex.as_str()),
            Self::SubtypeOf(t) => write!(f, "type <: {}", t),
            Self::Custom { label, .. } => write!(f, "{}", label),
        }
    }
}

impl fmt::Debug for ColumnFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColumnFilter({})", self)
    }
}
