use super::*;
use crate::value::Value;

fn row(n: i64) -> Value {
    Value::map([("n", Value::Int(n))])
}

fn ns(rows: &[Value]) -> Vec<i64> {
    rows.iter()
        .map(|row| match row.get_path("n") {
            Some(Value::Int(n)) => *n,
            _ => panic!("row without n: {row:?}"),
        })
        .collect()
}

#[test]
fn sorts_by_single_property() {
    let mut rows = vec![row(3), row(1), row(2)];
    let options = QueryOptions::new().sort_by(vec![SortDirective::new("n")]);

    apply(&mut rows, &options).unwrap();
    assert_eq!(ns(&rows), vec![1, 2, 3]);
}

#[test]
fn paginates_after_sorting() {
    let mut rows = vec![row(3), row(1), row(2)];
    let options = QueryOptions::new()
        .sort_by(vec![SortDirective::new("n")])
        .start(1)
        .count(1);

    apply(&mut rows, &options).unwrap();
    assert_eq!(ns(&rows), vec![2]);
}

#[test]
fn no_directives_skips_sorting() {
    let mut rows = vec![row(3), row(1), row(2)];
    apply(&mut rows, &QueryOptions::new()).unwrap();
    assert_eq!(ns(&rows), vec![3, 1, 2], "input order preserved");

    let mut rows = vec![row(3), row(1)];
    apply(&mut rows, &QueryOptions::new().sort_by(vec![])).unwrap();
    assert_eq!(ns(&rows), vec![3, 1]);
}

#[test]
fn directive_chain_falls_through_on_equality() {
    let a = Value::map([("group", Value::from("x")), ("n", Value::Int(2))]);
    let b = Value::map([("group", Value::from("x")), ("n", Value::Int(1))]);
    let c = Value::map([("group", Value::from("w")), ("n", Value::Int(9))]);

    let mut rows = vec![a, b, c];
    let options = QueryOptions::new().sort_by(vec![
        SortDirective::new("group"),
        SortDirective::new("n"),
    ]);

    apply(&mut rows, &options).unwrap();
    assert_eq!(ns(&rows), vec![9, 1, 2]);
}

#[test]
fn nulls_and_missing_rank_greatest_ascending() {
    let defined = row(1);
    let null = Value::map([("n", Value::Null)]);
    let missing = Value::map([("other", Value::Int(0))]);

    let mut rows = vec![null.clone(), defined.clone(), missing.clone()];
    apply(
        &mut rows,
        &QueryOptions::new().sort_by(vec![SortDirective::new("n")]),
    )
    .unwrap();
    assert_eq!(rows[0], defined);

    // Descending inverts the sense, nulls included.
    let mut rows = vec![defined.clone(), null, missing];
    apply(
        &mut rows,
        &QueryOptions::new().sort_by(vec![SortDirective::new("n").descending()]),
    )
    .unwrap();
    assert_eq!(rows[2], defined);
}

#[test]
fn ignore_case_folds_text() {
    let mut rows = vec![
        Value::map([("name", Value::from("Beta"))]),
        Value::map([("name", Value::from("alpha"))]),
    ];
    let options = QueryOptions::new().sort_by(vec![SortDirective::new("name").ignore_case()]);

    apply(&mut rows, &options).unwrap();
    assert_eq!(rows[0].get_path("name"), Some(&Value::from("alpha")));
}

#[test]
fn custom_comparator_is_used_directly() {
    let mut rows = vec![row(1), row(3), row(2)];
    let options = QueryOptions::new().sort_with(|a, b| {
        let n = |v: &Value| match v.get_path("n") {
            Some(Value::Int(n)) => *n,
            _ => 0,
        };
        n(b).cmp(&n(a))
    });

    apply(&mut rows, &options).unwrap();
    assert_eq!(ns(&rows), vec![3, 2, 1]);
}

#[test]
fn filter_clauses_and_predicate_conjoin() {
    let mut rows = vec![
        Value::map([("group", Value::from("x")), ("n", Value::Int(1))]),
        Value::map([("group", Value::from("x")), ("n", Value::Int(5))]),
        Value::map([("group", Value::from("y")), ("n", Value::Int(5))]),
    ];
    let filter = Filter::new()
        .eq("group", Value::from("x"))
        .matching(|row| matches!(row.get_path("n"), Some(Value::Int(n)) if *n > 2));

    apply(&mut rows, &QueryOptions::new().filter(filter)).unwrap();
    assert_eq!(ns(&rows), vec![5]);
    assert_eq!(rows[0].get_path("group"), Some(&Value::from("x")));
}

#[test]
fn empty_sort_property_is_a_data_error() {
    let mut rows = vec![row(1)];
    let err = apply(
        &mut rows,
        &QueryOptions::new().sort_by(vec![SortDirective::new("")]),
    )
    .unwrap_err();

    assert_eq!(err.class, crate::error::ErrorClass::Data);
}
