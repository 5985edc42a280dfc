use chrono::{NaiveDate, TimeZone, Utc};

use rustframe::{
    Column, ColumnKind, ColumnSchema, DataFrame, DataFrameSchema, DataType, ErrorKind,
    InferenceOptions, Nullability, Result, ScalarClass, Value, infer_type, infer_type_with,
};

fn value_type(values: &[Value]) -> DataType {
    match infer_type(values) {
        ColumnSchema::Value(t) => t,
        other => panic!("expected a value type, got {}", other),
    }
}

fn schema(columns: &[(&str, DataType)]) -> DataFrameSchema {
    DataFrameSchema::new(
        columns
            .iter()
            .map(|(n, t)| (n.to_string(), ColumnSchema::Value(t.clone())))
            .collect(),
    )
}

#[test]
fn test_numbers_widen() {
    assert_eq!(value_type(&[Value::Byte(1), Value::Short(2)]), DataType::scalar(ScalarClass::Short));
    assert_eq!(value_type(&[Value::Int(1), Value::Long(2)]), DataType::long());
    assert_eq!(value_type(&[Value::Short(1), Value::Float(2.5)]), DataType::scalar(ScalarClass::Float));
    assert_eq!(value_type(&[Value::Int(1), Value::Float(2.5)]), DataType::double());
    assert_eq!(value_type(&[Value::Long(1), Value::Float(2.5)]), DataType::double());
}

#[test]
fn test_order_does_not_matter() {
    let values = [Value::Int(1), Value::Null, Value::Double(2.0), Value::Long(3)];
    let expected = DataType::double().nullable();
    let mut permuted = values.to_vec();
    for _ in 0..values.len() {
        permuted.rotate_left(1);
        assert_eq!(value_type(&permuted), expected);
        let reversed: Vec<Value> = permuted.iter().rev().cloned().collect();
        assert_eq!(value_type(&reversed), expected);
    }
}

#[test]
fn test_unrelated_scalars_meet_in_the_lattice() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap();
    assert_eq!(
        value_type(&[date.into(), timestamp.into()]),
        DataType::scalar(ScalarClass::Temporal)
    );
    assert_eq!(
        value_type(&[Value::Char('a'), "b".into()]),
        DataType::scalar(ScalarClass::Comparable)
    );
    assert_eq!(
        value_type(&[Value::Boolean(true), Value::Int(1)]),
        DataType::scalar(ScalarClass::Comparable)
    );
}

#[test]
fn test_nullability_options() {
    let values = [Value::Int(1), Value::Int(2)];
    let nullable = InferenceOptions::new().nullability(Nullability::Nullable);
    assert_eq!(
        infer_type_with(&values, &nullable),
        ColumnSchema::Value(DataType::int().nullable())
    );

    let with_null = [Value::Int(1), Value::Null];
    let strict = InferenceOptions::new().nullability(Nullability::NotNullable);
    assert_eq!(
        infer_type_with(&with_null, &strict),
        ColumnSchema::Value(DataType::int())
    );

    let err = Column::create("x", with_null.to_vec(), None, &strict).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn test_frames_intersect() -> Result<()> {
    let first = DataFrame::from_values(vec![
        ("a", vec![Value::Int(1)]),
        ("b", vec![Value::from("x")]),
    ])?;
    let second = DataFrame::from_values(vec![
        ("a", vec![Value::Long(2), Value::Long(3)]),
        ("c", vec![Value::Boolean(true), Value::Boolean(false)]),
    ])?;

    let inferred = infer_type(&[Value::Frame(first), Value::Frame(second)]);
    assert_eq!(inferred.kind(), ColumnKind::Frame);
    assert_eq!(inferred.nested(), Some(&schema(&[("a", DataType::long())])));
    Ok(())
}

#[test]
fn test_rows_form_a_group() -> Result<()> {
    let full = DataFrame::from_values(vec![
        ("a", vec![Value::Int(1)]),
        ("b", vec![Value::from("x")]),
    ])?;
    let partial = DataFrame::from_values(vec![("a", vec![Value::Int(2)])])?;

    let inferred = infer_type(&[Value::Row(full.row(0)?), Value::Row(partial.row(0)?)]);
    assert_eq!(inferred.kind(), ColumnKind::Group);
    assert_eq!(
        inferred.nested(),
        Some(&schema(&[("a", DataType::int()), ("b", DataType::string().nullable())]))
    );

    let column = Column::create(
        "nested",
        vec![Value::Row(full.row(0)?), Value::Row(partial.row(0)?)],
        None,
        &InferenceOptions::default(),
    )?;
    assert_eq!(column.kind(), ColumnKind::Group);
    assert_eq!(column.size(), 2);
    Ok(())
}

#[test]
fn test_rows_mixed_with_frames_and_scalars() -> Result<()> {
    let frame = DataFrame::from_values(vec![
        ("a", vec![Value::Int(1), Value::Int(2)]),
        ("b", vec![Value::from("x"), Value::from("y")]),
    ])?;
    let row = DataFrame::from_values(vec![("a", vec![Value::Int(3)])])?.row(0)?;

    let inferred = infer_type(&[Value::Frame(frame.clone()), Value::Row(row.clone())]);
    assert_eq!(inferred.kind(), ColumnKind::Frame);
    assert_eq!(inferred.nested(), Some(&schema(&[("a", DataType::int())])));

    assert_eq!(
        infer_type(&[Value::Row(row), Value::Int(1)]),
        ColumnSchema::Value(DataType::any())
    );
    Ok(())
}

#[test]
fn test_create_conforms_values() -> Result<()> {
    let column = Column::create(
        "n",
        vec![Value::Int(1), Value::Double(2.5)],
        None,
        &InferenceOptions::default(),
    )?;
    assert_eq!(column.data_type(), Some(&DataType::double()));
    assert_eq!(column.get(0), Some(Value::Double(1.0)));

    let declared = Column::create(
        "n",
        vec![Value::Int(1)],
        Some(DataType::scalar(ScalarClass::Number)),
        &InferenceOptions::default(),
    )?;
    assert_eq!(declared.data_type(), Some(&DataType::scalar(ScalarClass::Number)));
    assert!(
        Column::create("s", vec![Value::Int(1)], Some(DataType::string()), &InferenceOptions::default())
            .is_err()
    );
    Ok(())
}
