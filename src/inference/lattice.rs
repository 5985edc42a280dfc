//! Common-type computation over the scalar class lattice.

use std::collections::BTreeSet;

use crate::core::{DataType, ScalarClass, TypeClass, Value};

fn integral_rank(class: ScalarClass) -> Option<u8> {
    match class {
        ScalarClass::Byte => Some(0),
        ScalarClass::Short => Some(1),
        ScalarClass::Int => Some(2),
        ScalarClass::Long => Some(3),
        _ => None,
    }
}

/// Widens a set of concrete numeric classes to the one that can hold all of
/// them: integrals widen up to `Long`, any `Double` gives `Double`, `Float`
/// survives only next to `Byte` and `Short` and otherwise becomes `Double`.
/// Returns `None` when the set holds no numeric class.
pub fn unify_numbers(classes: &BTreeSet<ScalarClass>) -> Option<ScalarClass> {
    let numbers: Vec<ScalarClass> = classes.iter().copied().filter(|c| c.is_number()).collect();
    if numbers.is_empty() {
        return None;
    }
    let widest_integral = numbers
        .iter()
        .filter_map(|&c| integral_rank(c).map(|rank| (rank, c)))
        .max()
        .map(|(_, c)| c);
    let has_float = numbers.contains(&ScalarClass::Float);
    if numbers.contains(&ScalarClass::Double) {
        return Some(ScalarClass::Double);
    }
    if has_float {
        return Some(match widest_integral {
            Some(ScalarClass::Int) | Some(ScalarClass::Long) => ScalarClass::Double,
            _ => ScalarClass::Float,
        });
    }
    widest_integral
}

/// Most specific classes that every member of `classes` is a subclass of.
/// The result contains no class that is a superclass of another result
/// entry, and is ordered by name.
pub fn common_parents(classes: &BTreeSet<ScalarClass>) -> Vec<ScalarClass> {
    let mut members = classes.iter();
    let Some(&first) = members.next() else {
        return Vec::new();
    };
    let with_self = |c: ScalarClass| {
        let mut all = c.all_superclasses().clone();
        all.insert(c);
        all
    };
    let mut shared = with_self(first);
    for &class in members {
        let others = with_self(class);
        shared.retain(|c| others.contains(c));
    }
    let redundant: BTreeSet<ScalarClass> = shared
        .iter()
        .flat_map(|c| c.all_superclasses().iter().copied())
        .collect();
    let mut parents: Vec<ScalarClass> = shared.difference(&redundant).copied().collect();
    parents.sort_by_key(|c| c.name());
    parents
}

fn descendant_count(class: ScalarClass) -> usize {
    ScalarClass::ALL
        .iter()
        .filter(|&&c| c != class && c.is_subclass_of(class))
        .count()
}

/// Single most specific common class. Numeric members are widened first.
/// Among several incomparable candidates the one with the most ancestors
/// wins, then the one with the fewest descendants, then the first by name.
/// With no candidate at all the result is `Any`.
pub fn common_class(classes: &BTreeSet<ScalarClass>) -> ScalarClass {
    let mut unified: BTreeSet<ScalarClass> =
        classes.iter().copied().filter(|c| !c.is_number()).collect();
    if let Some(number) = unify_numbers(classes) {
        unified.insert(number);
    }
    let parents = common_parents(&unified);
    match parents
        .iter()
        .copied()
        .max_by(|a, b| {
            a.all_superclasses()
                .len()
                .cmp(&b.all_superclasses().len())
                .then_with(|| descendant_count(*b).cmp(&descendant_count(*a)))
                .then_with(|| b.name().cmp(a.name()))
        }) {
        Some(class) => class,
        None => {
            log::debug!("No common class for {:?}, falling back to Any", classes);
            ScalarClass::Any
        }
    }
}

/// Least common supertype of value column types. `Nothing` contributes only
/// its nullability; a mix of lists and scalars gives `Any`.
pub fn common_supertype(types: &[&DataType]) -> DataType {
    let nullable = types.iter().any(|t| t.is_nullable());
    let mut scalars = BTreeSet::new();
    let mut elements: Vec<&DataType> = Vec::new();
    for t in types {
        match t.class() {
            TypeClass::Nothing => {}
            TypeClass::Scalar(class) => {
                scalars.insert(*class);
            }
            TypeClass::List(element) => elements.push(element),
        }
    }
    let unified = match (scalars.is_empty(), elements.is_empty()) {
        (true, true) => DataType::nothing(),
        (false, true) => DataType::scalar(common_class(&scalars)),
        (true, false) => DataType::list(common_supertype(&elements)),
        (false, false) => DataType::any(),
    };
    unified.with_nullability(nullable)
}

/// Converts `value` so that it conforms to `target`: numbers are widened to
/// the target's numeric class and list items are converted element-wise.
/// Values that already conform are returned unchanged.
pub fn conform(value: Value, target: &DataType) -> Value {
    match (value, target.class()) {
        (Value::List(items), TypeClass::List(element)) => {
            Value::List(items.into_iter().map(|item| conform(item, element)).collect())
        }
        (value, TypeClass::Scalar(class)) if value.is_numeric() => widen_number(value, *class),
        (value, _) => value,
    }
}

fn widen_number(value: Value, target: ScalarClass) -> Value {
    let widened = match (target, &value) {
        (ScalarClass::Short, Value::Byte(v)) => Some(Value::Short(i16::from(*v))),
        (ScalarClass::Int, Value::Byte(v)) => Some(Value::Int(i32::from(*v))),
        (ScalarClass::Int, Value::Short(v)) => Some(Value::Int(i32::from(*v))),
        (ScalarClass::Long, v) => v.as_i64().map(Value::Long),
        (ScalarClass::Float, Value::Byte(v)) => Some(Value::Float(f32::from(*v))),
        (ScalarClass::Float, Value::Short(v)) => Some(Value::Float(f32::from(*v))),
        (ScalarClass::Double, v) => v.as_f64().map(Value::Double),
        _ => None,
    };
    widened.unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(classes: &[ScalarClass]) -> BTreeSet<ScalarClass> {
        classes.iter().copied().collect()
    }

    #[test]
    fn test_numeric_widening() {
        use ScalarClass::*;
        assert_eq!(unify_numbers(&set(&[Int, Long])), Some(Long));
        assert_eq!(unify_numbers(&set(&[Byte, Short])), Some(Short));
        assert_eq!(unify_numbers(&set(&[Float])), Some(Float));
        assert_eq!(unify_numbers(&set(&[Float, Short])), Some(Float));
        assert_eq!(unify_numbers(&set(&[Float, Int])), Some(Double));
        assert_eq!(unify_numbers(&set(&[Long, Double])), Some(Double));
        assert_eq!(unify_numbers(&set(&[String])), None);
    }

    #[test]
    fn test_common_parents() {
        use ScalarClass::*;
        assert_eq!(common_parents(&set(&[Int, Double])), vec![Comparable, Number]);
        assert_eq!(common_parents(&set(&[Int, String])), vec![Comparable]);
        assert_eq!(common_parents(&set(&[Date, Timestamp])), vec![Comparable, Temporal]);
        assert_eq!(common_parents(&set(&[Number, CharSequence])), vec![Any]);
        assert_eq!(common_parents(&set(&[Boolean])), vec![Boolean]);
        assert!(common_parents(&set(&[])).is_empty());
    }

    #[test]
    fn test_common_class() {
        use ScalarClass::*;
        assert_eq!(common_class(&set(&[Int, Long])), Long);
        assert_eq!(common_class(&set(&[Int, String])), Comparable);
        assert_eq!(common_class(&set(&[String, CharSequence])), CharSequence);
        assert_eq!(common_class(&set(&[Date, Timestamp])), Temporal);
        assert_eq!(common_class(&set(&[Number, Int])), Number);
        assert_eq!(common_class(&set(&[])), Any);
    }

    #[test]
    fn test_common_supertype() {
        let int = DataType::int();
        let long = DataType::long().nullable();
        let nothing = DataType::nothing().nullable();
        assert_eq!(common_supertype(&[&int, &long]), DataType::long().nullable());
        assert_eq!(common_supertype(&[&int, &nothing]), DataType::int().nullable());
        let list = DataType::list(DataType::int());
        assert_eq!(common_supertype(&[&int, &list]), DataType::any());
        assert_eq!(common_supertype(&[]), DataType::nothing());
    }

    #[test]
    fn test_conform_widens_numbers() {
        assert_eq!(conform(Value::Int(1), &DataType::long()), Value::Long(1));
        assert_eq!(conform(Value::Int(1), &DataType::double()), Value::Double(1.0));
        assert_eq!(
            conform(Value::from(vec![1i8, 2]), &DataType::list(DataType::int())),
            Value::from(vec![1, 2])
        );
        assert_eq!(conform(Value::from("a"), &DataType::any()), Value::from("a"));
    }
}
