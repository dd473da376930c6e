//! Tests for vehicle dataset transforms.

use polars::prelude::{Column, DataFrame, NamedFrom};
use tollgrid_model::Key;
use tollgrid_transform::{
    filter_routes, generate_car_matrix, get_bus_indexes, get_type_count, multiply_matrix, pivot,
    unroll,
};

fn vehicles() -> DataFrame {
    DataFrame::new(vec![
        Column::new("id_1".into(), [1001400i64, 1001400, 1001402, 1001402, 1001404]),
        Column::new("id_2".into(), [1001402i64, 1001404, 1001400, 1001404, 1001400]),
        Column::new("car".into(), [6.0, 3.0, 8.5, 0.0, 12.0]),
        Column::new("bus".into(), [2.0, 4.0, 1.0, 1.0, 2.0]),
        Column::new("truck".into(), [9.0, 7.0, 5.0, 5.0, 8.0]),
        Column::new("route".into(), ["A", "A", "B", "B", "C"]),
    ])
    .unwrap()
}

#[test]
fn car_matrix_indexes_by_id_1_and_id_2() {
    let matrix = generate_car_matrix(&vehicles()).unwrap();

    assert_eq!(
        matrix.row_labels(),
        &[Key::Int(1001400), Key::Int(1001402), Key::Int(1001404)]
    );
    assert_eq!(
        matrix.column_labels(),
        &[Key::Int(1001400), Key::Int(1001402), Key::Int(1001404)]
    );
    assert_eq!(
        matrix.get_by_label(&Key::Int(1001402), &Key::Int(1001400)),
        Some(8.5)
    );
    // No (1001400, 1001400) row: absent, not zero.
    assert_eq!(
        matrix.get_by_label(&Key::Int(1001400), &Key::Int(1001400)),
        None
    );
}

#[test]
fn car_matrix_survives_unroll_and_repivot() {
    let matrix = generate_car_matrix(&vehicles()).unwrap();

    let long = unroll(&matrix, "id_1", "id_2", "car").unwrap();
    let repivoted = pivot(&long, "id_1", "id_2", "car").unwrap();

    assert_eq!(repivoted, matrix);
}

#[test]
fn type_count_orders_by_descending_count() {
    let df = DataFrame::new(vec![Column::new(
        "car".into(),
        ["sedan", "bus", "bus", "van", "sedan", "bus"],
    )])
    .unwrap();

    let counts = get_type_count(&df).unwrap();

    let pairs: Vec<(String, usize)> = counts
        .iter()
        .map(|count| (count.value.to_string(), count.count))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("bus".to_string(), 3),
            ("sedan".to_string(), 2),
            ("van".to_string(), 1)
        ]
    );
    let total: usize = counts.iter().map(|count| count.count).sum();
    assert_eq!(total, df.height());
}

#[test]
fn type_count_ties_keep_first_seen_order() {
    let df = DataFrame::new(vec![Column::new("car".into(), ["van", "bus", "bus", "van"])])
        .unwrap();

    let counts = get_type_count(&df).unwrap();

    assert_eq!(counts[0].value, Key::from("van"));
    assert_eq!(counts[1].value, Key::from("bus"));
}

#[test]
fn bus_indexes_do_not_touch_input() {
    let df = DataFrame::new(vec![
        Column::new("car".into(), ["bus", "car", "bus", "bus"]),
        Column::new("bus".into(), [10.0, 0.0, 1.0, 1.0]),
    ])
    .unwrap();
    let before = df.clone();

    // mean = 3, threshold = 6
    let indexes = get_bus_indexes(&df).unwrap();

    assert_eq!(indexes, vec![0]);
    assert!(df.equals(&before));
}

#[test]
fn routes_above_seven_only() {
    let df = DataFrame::new(vec![
        Column::new("route".into(), ["A", "B", "A", "B"]),
        Column::new("truck".into(), [7.0, 5.0, 9.0, 5.0]),
    ])
    .unwrap();

    assert_eq!(filter_routes(&df).unwrap(), vec![Key::from("A")]);
}

#[test]
fn routes_sorted_and_strictly_above() {
    let routes = filter_routes(&vehicles()).unwrap();
    // A: mean 8, B: mean 5, C: mean 8
    assert_eq!(routes, vec![Key::from("A"), Key::from("C")]);

    let exactly_seven = DataFrame::new(vec![
        Column::new("route".into(), ["Z"]),
        Column::new("truck".into(), [7.0]),
    ])
    .unwrap();
    assert!(filter_routes(&exactly_seven).unwrap().is_empty());
}

#[test]
fn multiply_twice_keeps_doubling() {
    let df = DataFrame::new(vec![
        Column::new("id_1".into(), [1i64, 1, 2]),
        Column::new("id_2".into(), [1i64, 2, 1]),
        Column::new("car".into(), [6.0, 4.0, 5.0]),
    ])
    .unwrap();
    let matrix = generate_car_matrix(&df).unwrap();

    let once = multiply_matrix(&matrix);
    let twice = multiply_matrix(&once);

    assert_eq!(once.row(0), &[Some(12.0), Some(4.0)]);
    assert_eq!(twice.row(0), &[Some(24.0), Some(4.0)]);
    assert_eq!(twice.row(1), &[Some(5.0), None]);
}

#[test]
fn non_numeric_car_cannot_be_pivoted() {
    let df = DataFrame::new(vec![
        Column::new("id_1".into(), [1i64]),
        Column::new("id_2".into(), [2i64]),
        Column::new("car".into(), ["bus"]),
    ])
    .unwrap();

    let err = generate_car_matrix(&df).unwrap_err();

    assert!(err.to_string().contains("cannot parse 'bus' in column 'car'"));
}
