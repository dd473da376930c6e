//! Tests for distance matrix, threshold selection and toll columns.

use polars::prelude::{Column, DataFrame, NamedFrom};
use proptest::prelude::*;
use tollgrid_model::{Key, TollSchedule};
use tollgrid_transform::{
    calculate_distance_matrix, calculate_time_based_toll_rates, calculate_toll_rate,
    find_ids_within_percentage_threshold, find_ids_within_ten_percentage_threshold,
    unroll_distance_matrix,
};

fn distances(starts: &[i64], ends: &[i64], values: &[f64]) -> DataFrame {
    DataFrame::new(vec![
        Column::new("id_start".into(), starts),
        Column::new("id_end".into(), ends),
        Column::new("distance".into(), values),
    ])
    .unwrap()
}

fn unrolled_lookup(df: &DataFrame, start: i64, end: i64) -> Option<f64> {
    let starts = df.column("id_start").unwrap().i64().unwrap();
    let ends = df.column("id_end").unwrap().i64().unwrap();
    let values = df.column("distance").unwrap().f64().unwrap();
    (0..df.height())
        .find(|&idx| starts.get(idx) == Some(start) && ends.get(idx) == Some(end))
        .and_then(|idx| values.get(idx))
}

#[test]
fn unroll_emits_square_of_ids() {
    let df = distances(&[1001400, 1001402], &[1001402, 1001404], &[9.7, 20.2]);

    let matrix = calculate_distance_matrix(&df).unwrap();
    let long = unroll_distance_matrix(&matrix).unwrap();

    assert_eq!(long.height(), 9);
    assert_eq!(
        long.get_column_names_owned()
            .iter()
            .map(|name| name.as_str())
            .collect::<Vec<_>>(),
        vec!["id_start", "id_end", "distance"]
    );
    assert_eq!(unrolled_lookup(&long, 1001404, 1001402), Some(20.2));
    assert_eq!(unrolled_lookup(&long, 1001400, 1001400), Some(0.0));
    assert_eq!(unrolled_lookup(&long, 1001400, 1001404), Some(0.0));
}

#[test]
fn duplicate_directed_pair_is_rejected() {
    let df = distances(&[1, 1], &[2, 2], &[3.0, 3.0]);
    let err = calculate_distance_matrix(&df).unwrap_err();
    assert!(err.to_string().contains("duplicate entry"));
}

#[test]
fn threshold_includes_105_excludes_115() {
    // Reference 1: mean 100. Id 2: mean 105. Id 3: mean 115.
    let df = distances(
        &[1, 1, 2, 2, 3],
        &[10, 11, 10, 11, 10],
        &[90.0, 110.0, 100.0, 110.0, 115.0],
    );

    let result = find_ids_within_ten_percentage_threshold(&df, &Key::Int(1)).unwrap();

    let ids: Vec<Option<i64>> = result
        .column("id_start")
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(ids, vec![Some(1), Some(1), Some(2), Some(2)]);
    assert_eq!(result.width(), 3);
}

#[test]
fn threshold_bounds_are_inclusive() {
    let df = distances(&[1, 2, 3], &[9, 9, 9], &[100.0, 90.0, 89.0]);

    let result = find_ids_within_percentage_threshold(&df, &Key::Int(1), 10.0).unwrap();

    assert_eq!(result.height(), 2);
}

#[test]
fn threshold_reference_from_text_input() {
    let df = distances(&[5, 6], &[1, 1], &[50.0, 500.0]);

    let result = find_ids_within_ten_percentage_threshold(&df, &Key::parse("5")).unwrap();

    assert_eq!(result.height(), 1);
}

#[test]
fn flat_toll_rate_appended() {
    let df = distances(&[1, 2], &[2, 3], &[10.0, 20.0]);

    let result = calculate_toll_rate(&df).unwrap();

    let tolls = result.column("toll_rate").unwrap().f64().unwrap();
    assert_eq!(tolls.get(0), Some(1.0));
    assert_eq!(tolls.get(1), Some(2.0));
}

#[test]
fn time_based_toll_varies_by_window() {
    let df = distances(&[1], &[2], &[100.0]);

    let result = calculate_time_based_toll_rates(&df, &TollSchedule::default()).unwrap();

    assert_eq!(result.height(), 17);
    let days = result.column("start_day").unwrap().str().unwrap();
    let starts = result.column("start_time").unwrap().str().unwrap();
    let tolls = result.column("time_based_toll").unwrap().f64().unwrap();
    // Monday morning, Monday midday, Sunday.
    assert_eq!(days.get(0), Some("Monday"));
    assert_eq!(starts.get(0), Some("00:00:00"));
    assert!((tolls.get(0).unwrap() - 4.0).abs() < 1e-9);
    assert_eq!(starts.get(1), Some("10:00:00"));
    assert!((tolls.get(1).unwrap() - 6.0).abs() < 1e-9);
    assert_eq!(days.get(16), Some("Sunday"));
    assert!((tolls.get(16).unwrap() - 3.5).abs() < 1e-9);
}

#[test]
fn flat_schedule_matches_plain_rate() {
    let df = distances(&[1, 2], &[2, 3], &[10.0, 30.0]);

    let result = calculate_time_based_toll_rates(&df, &TollSchedule::flat()).unwrap();

    assert_eq!(result.height(), 2);
    let tolls = result.column("time_based_toll").unwrap().f64().unwrap();
    assert!((tolls.get(0).unwrap() - 0.5).abs() < 1e-9);
    assert!((tolls.get(1).unwrap() - 1.5).abs() < 1e-9);
    let end_days = result.column("end_day").unwrap().str().unwrap();
    assert_eq!(end_days.get(0), Some("Sunday"));
}

fn unordered_pairs() -> impl Strategy<Value = Vec<(i64, i64, f64)>> {
    prop::collection::btree_map((0i64..12, 0i64..12), 0.5f64..500.0, 0..20).prop_map(|pairs| {
        let mut seen = std::collections::BTreeSet::new();
        pairs
            .into_iter()
            .filter(|((a, b), _)| a != b && seen.insert((*a.min(b), *a.max(b))))
            .map(|((a, b), d)| (a, b, d))
            .collect()
    })
}

proptest! {
    #[test]
    fn unroll_reproduces_every_pair_both_ways(pairs in unordered_pairs()) {
        let starts: Vec<i64> = pairs.iter().map(|p| p.0).collect();
        let ends: Vec<i64> = pairs.iter().map(|p| p.1).collect();
        let values: Vec<f64> = pairs.iter().map(|p| p.2).collect();
        let df = distances(&starts, &ends, &values);

        let matrix = calculate_distance_matrix(&df).unwrap();
        let long = unroll_distance_matrix(&matrix).unwrap();

        let (rows, cols) = matrix.shape();
        prop_assert_eq!(rows, cols);
        prop_assert_eq!(long.height(), rows * cols);
        for (start, end, distance) in &pairs {
            prop_assert_eq!(unrolled_lookup(&long, *start, *end), Some(*distance));
            prop_assert_eq!(unrolled_lookup(&long, *end, *start), Some(*distance));
        }
        for idx in 0..rows {
            prop_assert_eq!(matrix.get(idx, idx), Some(0.0));
            for other in 0..cols {
                prop_assert_eq!(matrix.get(idx, other), matrix.get(other, idx));
            }
        }
    }
}
