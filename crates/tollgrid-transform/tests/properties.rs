//! Property tests for pivots and counts.

use polars::prelude::{Column, DataFrame, NamedFrom};
use proptest::prelude::*;
use tollgrid_transform::{generate_car_matrix, get_type_count, pivot, unroll};

fn car_cells() -> impl Strategy<Value = Vec<((i64, i64), f64)>> {
    prop::collection::btree_map((0i64..8, 0i64..8), 0.0f64..50.0, 0..30)
        .prop_map(|cells| cells.into_iter().collect())
}

proptest! {
    #[test]
    fn car_matrix_repivot_is_stable(cells in car_cells()) {
        let df = DataFrame::new(vec![
            Column::new("id_1".into(), cells.iter().map(|c| c.0.0).collect::<Vec<_>>()),
            Column::new("id_2".into(), cells.iter().map(|c| c.0.1).collect::<Vec<_>>()),
            Column::new("car".into(), cells.iter().map(|c| c.1).collect::<Vec<_>>()),
        ])
        .unwrap();

        let matrix = generate_car_matrix(&df).unwrap();
        let long = unroll(&matrix, "id_1", "id_2", "car").unwrap();
        let repivoted = pivot(&long, "id_1", "id_2", "car").unwrap();

        prop_assert_eq!(matrix.present_count(), cells.len());
        prop_assert_eq!(repivoted, matrix);
    }

    #[test]
    fn type_counts_sum_to_rows(values in prop::collection::vec("[a-d]", 0..40)) {
        let df = DataFrame::new(vec![Column::new("car".into(), values.clone())]).unwrap();

        let counts = get_type_count(&df).unwrap();

        let total: usize = counts.iter().map(|count| count.count).sum();
        prop_assert_eq!(total, values.len());
        prop_assert!(counts.windows(2).all(|pair| pair[0].count >= pair[1].count));
    }
}
