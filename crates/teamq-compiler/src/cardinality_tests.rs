use crate::cardinality::{Cardinality, CardinalityError, QueryOutput, shape_rows};

#[test]
fn parse_tags() {
    assert_eq!("one".parse::<Cardinality>(), Ok(Cardinality::One));
    assert_eq!("many".parse::<Cardinality>(), Ok(Cardinality::Many));
    assert_eq!("exec".parse::<Cardinality>(), Ok(Cardinality::Exec));

    let err = "ONE".parse::<Cardinality>().unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unknown cardinality `ONE`");
}

#[test]
fn one_requires_exactly_one_row() {
    assert_eq!(
        shape_rows(Cardinality::One, vec!["a"], None),
        Ok(QueryOutput::One("a"))
    );
    assert_eq!(
        shape_rows::<&str>(Cardinality::One, vec![], None),
        Err(CardinalityError::NotFound)
    );
    assert_eq!(
        shape_rows(Cardinality::One, vec!["a", "b", "c"], None),
        Err(CardinalityError::TooManyRows(3))
    );
}

#[test]
fn not_found_is_distinct_from_too_many() {
    let none = shape_rows::<u8>(Cardinality::One, vec![], None).unwrap_err();
    let many = shape_rows(Cardinality::One, vec![1, 2], None).unwrap_err();
    assert_ne!(none, many);
    insta::assert_snapshot!(none.to_string(), @"query returned no rows");
    insta::assert_snapshot!(many.to_string(), @"query returned 2 rows where exactly one was expected");
}

#[test]
fn many_keeps_order_and_allows_empty() {
    assert_eq!(
        shape_rows(Cardinality::Many, vec![3, 1, 2], None),
        Ok(QueryOutput::Many(vec![3, 1, 2]))
    );
    assert_eq!(
        shape_rows::<u8>(Cardinality::Many, vec![], None),
        Ok(QueryOutput::Many(vec![]))
    );
}

#[test]
fn exec_drops_rows() {
    assert_eq!(
        shape_rows(Cardinality::Exec, vec![1, 2, 3], Some(3)),
        Ok(QueryOutput::Affected(Some(3)))
    );
    assert_eq!(
        shape_rows::<u8>(Cardinality::Exec, vec![], None),
        Ok(QueryOutput::Affected(None))
    );
}
