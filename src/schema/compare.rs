use serde::Serialize;

use super::{ColumnSchema, DataFrameSchema};

/// Outcome of comparing schema `a` against schema `b`.
///
/// `Supertype` means `a` extends `b`: it has every column of `b`, possibly
/// more, and each shared column is the same or narrower. Values conforming
/// to `a` can then be used wherever `b` is expected. `Subtype` is the mirror
/// case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CompareResult {
    Equal,
    Supertype,
    Subtype,
    Unrelated,
}

impl CompareResult {
    /// `Equal` is neutral, `Unrelated` absorbs, opposite directions give
    /// `Unrelated`.
    pub fn combine(self, other: CompareResult) -> CompareResult {
        use CompareResult::*;
        match (self, other) {
            (Equal, r) | (r, Equal) => r,
            (Unrelated, _) | (_, Unrelated) => Unrelated,
            (Supertype, Supertype) => Supertype,
            (Subtype, Subtype) => Subtype,
            _ => Unrelated,
        }
    }

    pub fn mirror(self) -> CompareResult {
        match self {
            Self::Supertype => Self::Subtype,
            Self::Subtype => Self::Supertype,
            r => r,
        }
    }

    pub fn is_equal(self) -> bool {
        self == Self::Equal
    }

    pub fn is_super_or_equal(self) -> bool {
        matches!(self, Self::Equal | Self::Supertype)
    }

    pub fn is_sub_or_equal(self) -> bool {
        matches!(self, Self::Equal | Self::Subtype)
    }
}

impl ColumnSchema {
    pub fn compare(&self, other: &ColumnSchema) -> CompareResult {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => {
                if a == b {
                    CompareResult::Equal
                } else if a.is_subtype_of(b) {
                    CompareResult::Supertype
                } else if b.is_subtype_of(a) {
                    CompareResult::Subtype
                } else {
                    CompareResult::Unrelated
                }
            }
            (Self::Group(a), Self::Group(b)) | (Self::Frame(a), Self::Frame(b)) => a.compare(b),
            _ => CompareResult::Unrelated,
        }
    }
}

impl DataFrameSchema {
    pub fn compare(&self, other: &DataFrameSchema) -> CompareResult {
        let mut result = CompareResult::Equal;
        for (name, column) in self.columns() {
            let step = match other.column(name) {
                Some(theirs) => column.compare(theirs),
                None => CompareResult::Supertype,
            };
            result = result.combine(step);
            if result == CompareResult::Unrelated {
                return result;
            }
        }
        if other.columns().any(|(name, _)| !self.contains(name)) {
            result = result.combine(CompareResult::Subtype);
        }
        result
    }

    /// True when `target` conforms to this schema, i.e. this schema is a
    /// valid base for `target`.
    pub fn generalizes(&self, target: &DataFrameSchema) -> bool {
        target.compare(self).is_super_or_equal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;

    fn value(t: DataType) -> ColumnSchema {
        ColumnSchema::Value(t)
    }

    #[test]
    fn test_combine_table() {
        use CompareResult::*;
        let all = [Equal, Supertype, Subtype, Unrelated];
        for a in all {
            assert_eq!(a.combine(Equal), a);
            assert_eq!(Equal.combine(a), a);
            assert_eq!(a.combine(Unrelated), Unrelated);
            assert_eq!(a.combine(a), a);
            for b in all {
                assert_eq!(a.combine(b), b.combine(a));
            }
        }
        assert_eq!(Supertype.combine(Subtype), Unrelated);
    }

    #[test]
    fn test_value_columns() {
        assert_eq!(
            value(DataType::int()).compare(&value(DataType::int().nullable())),
            CompareResult::Supertype
        );
        assert_eq!(
            value(DataType::int().nullable()).compare(&value(DataType::int())),
            CompareResult::Subtype
        );
        assert_eq!(
            value(DataType::int()).compare(&value(DataType::string())),
            CompareResult::Unrelated
        );
        assert_eq!(
            value(DataType::int()).compare(&ColumnSchema::Group(DataFrameSchema::empty())),
            CompareResult::Unrelated
        );
    }

    #[test]
    fn test_extra_columns() {
        let narrow = DataFrameSchema::new(vec![("a".into(), value(DataType::int()))]);
        let wide = narrow.clone().with_column("b", value(DataType::string()));
        assert_eq!(wide.compare(&narrow), CompareResult::Supertype);
        assert_eq!(narrow.compare(&wide), CompareResult::Subtype);
        assert!(narrow.generalizes(&wide));
        assert!(!wide.generalizes(&narrow));
    }
}
