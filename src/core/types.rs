use std::collections::{BTreeSet, HashMap};
use std::fmt;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize, Serializer};

use super::Value;

/// Structural kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Value,
    Group,
    Frame,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value => write!(f, "value"),
            Self::Group => write!(f, "group"),
            Self::Frame => write!(f, "frame"),
        }
    }
}

/// Runtime class of a scalar value, plus the abstract ancestors that make up
/// the class lattice used for common-type computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScalarClass {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    Date,
    Timestamp,
    Uuid,
    Number,
    Comparable,
    CharSequence,
    Temporal,
    Any,
}

impl ScalarClass {
    pub const ALL: [ScalarClass; 17] = [
        Self::Boolean,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Char,
        Self::String,
        Self::Date,
        Self::Timestamp,
        Self::Uuid,
        Self::Number,
        Self::Comparable,
        Self::CharSequence,
        Self::Temporal,
        Self::Any,
    ];

    pub fn direct_superclasses(self) -> &'static [ScalarClass] {
        use ScalarClass::*;
        match self {
            Byte | Short | Int | Long | Float | Double => &[Number, Comparable],
            String => &[Comparable, CharSequence],
            Date | Timestamp => &[Temporal, Comparable],
            Boolean | Char | Uuid => &[Comparable],
            Number | Comparable | CharSequence | Temporal => &[Any],
            Any => &[],
        }
    }

    /// Transitive closure of [`direct_superclasses`](Self::direct_superclasses),
    /// not including the class itself.
    pub fn all_superclasses(self) -> &'static BTreeSet<ScalarClass> {
        &SUPERCLASSES[&self]
    }

    pub fn is_subclass_of(self, other: ScalarClass) -> bool {
        self == other || self.all_superclasses().contains(&other)
    }

    pub fn is_number(self) -> bool {
        matches!(
            self,
            Self::Byte | Self::Short | Self::Int | Self::Long | Self::Float | Self::Double
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::Short => "Short",
            Self::Int => "Int",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Char => "Char",
            Self::String => "String",
            Self::Date => "Date",
            Self::Timestamp => "Timestamp",
            Self::Uuid => "Uuid",
            Self::Number => "Number",
            Self::Comparable => "Comparable",
            Self::CharSequence => "CharSequence",
            Self::Temporal => "Temporal",
            Self::Any => "Any",
        }
    }
}

lazy_static! {
    static ref SUPERCLASSES: HashMap<ScalarClass, BTreeSet<ScalarClass>> = ScalarClass::ALL
        .iter()
        .map(|&class| {
            let mut closure = BTreeSet::new();
            let mut pending: Vec<ScalarClass> = class.direct_superclasses().to_vec();
            while let Some(next) = pending.pop() {
                if closure.insert(next) {
                    pending.extend_from_slice(next.direct_superclasses());
                }
            }
            (class, closure)
        })
        .collect();
}

impl fmt::Display for ScalarClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeClass {
    /// Type of a column that never held a non-null value.
    Nothing,
    Scalar(ScalarClass),
    List(Box<DataType>),
}

/// Type of a value column: a class plus nullability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataType {
    class: TypeClass,
    nullable: bool,
}

impl DataType {
    pub fn new(class: TypeClass, nullable: bool) -> Self {
        Self { class, nullable }
    }

    pub fn scalar(class: ScalarClass) -> Self {
        Self::new(TypeClass::Scalar(class), false)
    }

    pub fn list(element: DataType) -> Self {
        Self::new(TypeClass::List(Box::new(element)), false)
    }

    pub fn nothing() -> Self {
        Self::new(TypeClass::Nothing, false)
    }

    pub fn any() -> Self {
        Self::scalar(ScalarClass::Any)
    }

    pub fn boolean() -> Self {
        Self::scalar(ScalarClass::Boolean)
    }

    pub fn int() -> Self {
        Self::scalar(ScalarClass::Int)
    }

    pub fn long() -> Self {
        Self::scalar(ScalarClass::Long)
    }

    pub fn double() -> Self {
        Self::scalar(ScalarClass::Double)
    }

    pub fn string() -> Self {
        Self::scalar(ScalarClass::String)
    }

    pub fn class(&self) -> &TypeClass {
        &self.class
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn with_nullability(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn nullable(self) -> Self {
        self.with_nullability(true)
    }

    pub fn is_any(&self) -> bool {
        self.class == TypeClass::Scalar(ScalarClass::Any)
    }

    pub fn scalar_class(&self) -> Option<ScalarClass> {
        match self.class {
            TypeClass::Scalar(class) => Some(class),
            _ => None,
        }
    }

    /// Ordinary subtyping: `Nothing` is below everything, lists are
    /// covariant, and a nullable type is never a subtype of a non-nullable one.
    pub fn is_subtype_of(&self, other: &DataType) -> bool {
        if self.nullable && !other.nullable {
            return false;
        }
        match (&self.class, &other.class) {
            (TypeClass::Nothing, _) => true,
            (_, TypeClass::Nothing) => false,
            (TypeClass::Scalar(a), TypeClass::Scalar(b)) => a.is_subclass_of(*b),
            (TypeClass::List(a), TypeClass::List(b)) => a.is_subtype_of(b),
            (TypeClass::List(_), TypeClass::Scalar(ScalarClass::Any)) => true,
            _ => false,
        }
    }

    pub fn is_compatible(&self, value: &Value) -> bool {
        if value.is_null() {
            return self.nullable;
        }
        match &self.class {
            TypeClass::Nothing => false,
            TypeClass::Scalar(ScalarClass::Any) => true,
            TypeClass::Scalar(expected) => value
                .scalar_class()
                .is_some_and(|actual| actual.is_subclass_of(*expected)),
            TypeClass::List(element) => match value {
                Value::List(items) => items.iter().all(|item| element.is_compatible(item)),
                _ => false,
            },
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.class {
            TypeClass::Nothing => write!(f, "Nothing")?,
            TypeClass::Scalar(class) => write!(f, "{}", class)?,
            TypeClass::List(element) => write!(f, "List<{}>", element)?,
        }
        if self.nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superclass_closure() {
        let supers = ScalarClass::Int.all_superclasses();
        assert!(supers.contains(&ScalarClass::Number));
        assert!(supers.contains(&ScalarClass::Comparable));
        assert!(supers.contains(&ScalarClass::Any));
        assert!(ScalarClass::Any.all_superclasses().is_empty());
    }

    #[test]
    fn test_subtyping() {
        assert!(DataType::int().is_subtype_of(&DataType::int().nullable()));
        assert!(!DataType::int().nullable().is_subtype_of(&DataType::int()));
        assert!(DataType::int().is_subtype_of(&DataType::scalar(ScalarClass::Number)));
        assert!(!DataType::int().is_subtype_of(&DataType::long()));
        assert!(DataType::nothing().nullable().is_subtype_of(&DataType::string().nullable()));
        assert!(DataType::list(DataType::int()).is_subtype_of(&DataType::any()));
        assert!(
            DataType::list(DataType::int())
                .is_subtype_of(&DataType::list(DataType::scalar(ScalarClass::Number)))
        );
    }

    #[test]
    fn test_type_compatibility() {
        let int_type = DataType::int();
        assert!(int_type.is_compatible(&Value::Int(42)));
        assert!(!int_type.is_compatible(&Value::Null));
        assert!(int_type.clone().nullable().is_compatible(&Value::Null));
        assert!(!int_type.is_compatible(&Value::String("hello".into())));
        assert!(DataType::any().is_compatible(&Value::List(vec![Value::Int(1)])));
    }

    #[test]
    fn test_display() {
        assert_eq!(DataType::int().nullable().to_string(), "Int?");
        assert_eq!(DataType::list(DataType::string()).to_string(), "List<String>");
    }
}
