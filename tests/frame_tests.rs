use std::collections::HashSet;

use rustframe::{
    Column, ColumnKind, ColumnPath, DataFrame, DataType, ErrorKind, FrameError,
    InferenceOptions, Result, Value,
};

fn people() -> Result<DataFrame> {
    DataFrame::from_values(vec![
        ("firstName", vec![Value::from("Alice"), Value::from("Bob"), Value::from("Charlie")]),
        ("lastName", vec![Value::from("Cooper"), Value::from("Dylan"), Value::from("Daniels")]),
        ("age", vec![Value::from(15), Value::from(45), Value::from(20)]),
        ("city", vec![Value::from("London"), Value::from("Dubai"), Value::Null]),
    ])
}

#[test]
fn test_inferred_column_types() -> Result<()> {
    let df = people()?;
    assert_eq!(df.rows_count(), 3);
    assert_eq!(df.columns_count(), 4);
    assert_eq!(df.column("age").and_then(Column::data_type), Some(&DataType::int()));
    assert_eq!(
        df.column("city").and_then(Column::data_type),
        Some(&DataType::string().nullable())
    );
    Ok(())
}

#[test]
fn test_structural_errors() -> Result<()> {
    let a = Column::value("a", DataType::int(), vec![1.into(), 2.into()])?;
    let short = Column::value("b", DataType::int(), vec![1.into()])?;

    let err = DataFrame::new(vec![a.clone(), short]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert!(err.to_string().contains("'b'"));

    let err = DataFrame::new(vec![a.clone(), a]).unwrap_err();
    assert!(matches!(err, FrameError::DuplicateColumn(ref name) if name == "a"));
    Ok(())
}

#[test]
fn test_only_the_placeholder_is_unnamed() -> Result<()> {
    let err = Column::value("", DataType::int(), vec![1.into()]).unwrap_err();
    assert_eq!(err, FrameError::EmptyColumnName);
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert!(Column::group("", DataFrame::empty()).is_err());
    assert!(Column::frame("", vec![]).is_err());

    let df = DataFrame::from_values(vec![("a", vec![Value::from(1)])])?;
    assert_eq!(df.rename_column("a", "").unwrap_err(), FrameError::EmptyColumnName);
    assert_eq!(DataFrame::from_values(vec![("", vec![Value::from(1)])]).unwrap_err(), FrameError::EmptyColumnName);

    let placeholders = DataFrame::new(vec![Column::placeholder(), Column::placeholder()])?;
    assert_eq!(placeholders.columns_count(), 2);
    Ok(())
}

#[test]
fn test_transformations_do_not_touch_source() -> Result<()> {
    let df = people()?;
    let renamed = df.rename_column("age", "years")?;
    let extended = df.add_column(Column::value(
        "score",
        DataType::double(),
        vec![1.0.into(), 2.0.into(), 3.0.into()],
    )?)?;

    assert_eq!(df.column_names(), vec!["firstName", "lastName", "age", "city"]);
    assert_eq!(renamed.column_names(), vec!["firstName", "lastName", "years", "city"]);
    assert_eq!(extended.columns_count(), 5);
    assert!(df.add_column(Column::value("x", DataType::int(), vec![1.into()])?).is_err());
    Ok(())
}

#[test]
fn test_nested_groups() -> Result<()> {
    let df = people()?.group_columns(&["firstName", "lastName"], "name")?;
    let name = df.column("name").unwrap();
    assert_eq!(name.kind(), ColumnKind::Group);
    assert_eq!(name.size(), 3);

    let row = df.row(1)?;
    assert_eq!(
        row.get_at_path(&ColumnPath::from(vec!["name", "lastName"])),
        Some(Value::from("Dylan"))
    );
    let nested = row.get("name").unwrap();
    assert_eq!(nested.as_row().and_then(|r| r.get("firstName")), Some(Value::from("Bob")));
    assert_eq!(row.to_string(), "{name: {firstName: Bob, lastName: Dylan}, age: 45, city: Dubai}");
    Ok(())
}

#[test]
fn test_frame_column_holds_independent_frames() -> Result<()> {
    let small = DataFrame::from_values(vec![("x", vec![Value::from(1)])])?;
    let large = DataFrame::from_values(vec![
        ("x", vec![Value::from(2), Value::from(3)]),
        ("y", vec![Value::from("a"), Value::from("b")]),
    ])?;
    let column = Column::frame("parts", vec![small, large, DataFrame::empty()])?;
    let df = DataFrame::new(vec![column])?;

    let parts = df.column("parts").and_then(Column::as_frame_column).unwrap();
    assert_eq!(parts.frame_at(1).map(DataFrame::rows_count), Some(2));
    assert_eq!(parts.frame_at(2).map(DataFrame::rows_count), Some(0));
    assert_eq!(parts.schema().column_names(), vec!["x"]);
    Ok(())
}

#[test]
fn test_absent_nested_frames_keep_the_schema() -> Result<()> {
    let person = DataFrame::from_values(vec![
        ("name", vec![Value::from("Alice")]),
        ("age", vec![Value::from(15)]),
    ])?;
    let created = Column::create(
        "p",
        vec![Value::Frame(person.clone()), Value::Null, Value::Frame(person.clone())],
        None,
        &InferenceOptions::default(),
    )?;
    let built = Column::frame("p", vec![person.clone(), DataFrame::empty(), person.clone()])?;
    assert_eq!(created, built);
    assert_eq!(created.column_schema(), built.column_schema());
    assert_eq!(
        built.as_frame_column().map(|c| c.schema().column_names()),
        Some(vec!["name", "age"])
    );

    let sliced = created.slice(1..3)?;
    assert_eq!(sliced.column_schema(), created.column_schema());

    let first = DataFrame::new(vec![created])?;
    let second = DataFrame::new(vec![built])?;
    assert_eq!(first, second);
    assert_eq!(first.schema(), second.schema());
    Ok(())
}

#[test]
fn test_structural_equality_and_hash() -> Result<()> {
    let a = people()?;
    let b = people()?;
    assert!(!a.ptr_eq(&b));
    assert_eq!(a, b);

    let set: HashSet<DataFrame> = [a.clone(), b, a.slice_rows(0..2)?].into_iter().collect();
    assert_eq!(set.len(), 2);

    let filtered = a.filter_rows(|r| r.get("city").is_some_and(|c| !c.is_null()))?;
    assert_eq!(filtered, a.slice_rows(0..2)?);
    Ok(())
}

#[test]
fn test_column_queries() -> Result<()> {
    let df = people()?;
    let city = df.column("city").unwrap();
    assert!(city.has_nulls());
    assert!(city.contains(&Value::from("Dubai")));
    assert!(!city.contains(&Value::from("Paris")));
    assert_eq!(city.count_distinct(), 3);
    assert_eq!(city.slice(0..1)?.values().collect::<Vec<_>>(), vec![Value::from("London")]);
    Ok(())
}

#[test]
fn test_rows_are_lazy_views() -> Result<()> {
    let df = people()?;
    let ages: Vec<i64> = df
        .rows()
        .filter_map(|r| r.get("age").and_then(|v| v.as_i64()))
        .collect();
    assert_eq!(ages, vec![15, 45, 20]);
    assert!(df.rows().all(|r| r.frame().ptr_eq(&df)));
    Ok(())
}
