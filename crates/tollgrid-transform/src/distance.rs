//! Transforms over the distance dataset (`id_start`, `id_end`, `distance`).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use tollgrid_model::{Key, Matrix};

use crate::error::{Result, TransformError};
use crate::reshape::{label_positions, unroll};
use crate::values::{RunningMean, key_column, numeric_column};

/// Percentage used by [`find_ids_within_ten_percentage_threshold`].
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 10.0;

fn same_distance(a: f64, b: f64) -> bool {
    (a - b).abs() <= f64::EPSILON * a.abs().max(b.abs()).max(1.0)
}

/// Builds a symmetric distance matrix over every id seen in `id_start` or
/// `id_end`.
///
/// A pair listed in one direction fills both `[i][j]` and `[j][i]`. Unlisted
/// pairs and the diagonal are 0. Rows with a null id or distance are skipped.
///
/// # Errors
///
/// - [`TransformError::DuplicateKey`] if the same directed pair appears twice
/// - [`TransformError::ConflictingDistance`] if a pair appears in both
///   directions with different distances
pub fn calculate_distance_matrix(df: &DataFrame) -> Result<Matrix> {
    let starts = key_column(df, "id_start")?;
    let ends = key_column(df, "id_end")?;
    let distances = numeric_column(df, "distance")?;

    let labels: Vec<Key> = starts
        .iter()
        .chain(&ends)
        .flatten()
        .cloned()
        .collect::<BTreeSet<Key>>()
        .into_iter()
        .collect();
    let positions = label_positions(&labels);
    let mut matrix = Matrix::filled(labels.clone(), labels.clone(), 0.0);

    let mut given: HashMap<(usize, usize), f64> = HashMap::new();
    for ((start, end), distance) in starts.iter().zip(&ends).zip(&distances) {
        let (Some(start), Some(end), Some(distance)) = (start, end, distance) else {
            continue;
        };
        let (i, j) = (positions[start], positions[end]);
        if i == j {
            continue;
        }
        if given.contains_key(&(i, j)) {
            return Err(TransformError::DuplicateKey {
                row: start.clone(),
                column: end.clone(),
            });
        }
        if let Some(&reverse) = given.get(&(j, i))
            && !same_distance(reverse, *distance)
        {
            return Err(TransformError::ConflictingDistance {
                from: start.clone(),
                to: end.clone(),
                forward: *distance,
                reverse,
            });
        }
        given.insert((i, j), *distance);
        matrix.set(i, j, Some(*distance));
        matrix.set(j, i, Some(*distance));
    }

    tracing::debug!(
        ids = labels.len(),
        pairs = given.len(),
        "built distance matrix"
    );
    Ok(matrix)
}

/// Unrolls a distance matrix into `id_start`, `id_end`, `distance` rows.
///
/// Every cell is emitted, including zero and diagonal cells.
pub fn unroll_distance_matrix(matrix: &Matrix) -> Result<DataFrame> {
    unroll(matrix, "id_start", "id_end", "distance")
}

/// Rows whose `id_start` group has a mean distance within 10% of the
/// reference id's mean distance.
pub fn find_ids_within_ten_percentage_threshold(
    df: &DataFrame,
    reference_id: &Key,
) -> Result<DataFrame> {
    find_ids_within_percentage_threshold(df, reference_id, DEFAULT_THRESHOLD_PERCENT)
}

/// Rows whose `id_start` group has a mean distance within `percent` of the
/// reference id's mean distance (inclusive on both sides).
///
/// Returned rows keep their input order and all columns.
///
/// # Errors
///
/// [`TransformError::UndefinedReference`] when the reference id has no row
/// with a distance.
pub fn find_ids_within_percentage_threshold(
    df: &DataFrame,
    reference_id: &Key,
    percent: f64,
) -> Result<DataFrame> {
    let starts = key_column(df, "id_start")?;
    let distances = numeric_column(df, "distance")?;

    let mut groups: BTreeMap<&Key, RunningMean> = BTreeMap::new();
    for (start, distance) in starts.iter().zip(&distances) {
        if let Some(start) = start {
            groups.entry(start).or_default().push(*distance);
        }
    }

    let reference_mean = groups
        .get(reference_id)
        .and_then(|mean| mean.value())
        .ok_or_else(|| TransformError::UndefinedReference {
            reference: reference_id.clone(),
        })?;
    let threshold = percent / 100.0 * reference_mean.abs();

    let within: BTreeSet<&Key> = groups
        .iter()
        .filter(|(_, mean)| {
            mean.value()
                .is_some_and(|mean| (mean - reference_mean).abs() <= threshold)
        })
        .map(|(key, _)| *key)
        .collect();

    let keep: Vec<bool> = starts
        .iter()
        .map(|start| start.as_ref().is_some_and(|start| within.contains(start)))
        .collect();
    let mask = BooleanChunked::from_slice("within_threshold".into(), &keep);
    let result = df.filter(&mask)?;

    tracing::debug!(
        reference = %reference_id,
        reference_mean,
        groups = within.len(),
        rows = result.height(),
        "selected ids within threshold"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn single_direction_is_mirrored_not_doubled() {
        let df = df! {
            "id_start" => [1i64, 2],
            "id_end" => [2i64, 3],
            "distance" => [9.7, 20.2],
        }
        .unwrap();

        let matrix = calculate_distance_matrix(&df).unwrap();

        assert_eq!(matrix.shape(), (3, 3));
        assert_eq!(matrix.get_by_label(&Key::Int(1), &Key::Int(2)), Some(9.7));
        assert_eq!(matrix.get_by_label(&Key::Int(2), &Key::Int(1)), Some(9.7));
        assert_eq!(matrix.get_by_label(&Key::Int(1), &Key::Int(3)), Some(0.0));
        assert_eq!(matrix.get_by_label(&Key::Int(2), &Key::Int(2)), Some(0.0));
    }

    #[test]
    fn agreeing_reverse_pair_is_accepted() {
        let df = df! {
            "id_start" => [1i64, 2],
            "id_end" => [2i64, 1],
            "distance" => [5.0, 5.0],
        }
        .unwrap();

        let matrix = calculate_distance_matrix(&df).unwrap();

        assert_eq!(matrix.get(0, 1), Some(5.0));
        assert_eq!(matrix.get(1, 0), Some(5.0));
    }

    #[test]
    fn conflicting_reverse_pair_is_rejected() {
        let df = df! {
            "id_start" => [1i64, 2],
            "id_end" => [2i64, 1],
            "distance" => [5.0, 6.0],
        }
        .unwrap();

        let err = calculate_distance_matrix(&df).unwrap_err();

        assert!(matches!(err, TransformError::ConflictingDistance { .. }));
    }

    #[test]
    fn self_pairs_keep_zero_diagonal() {
        let df = df! {
            "id_start" => [1i64, 1],
            "id_end" => [1i64, 2],
            "distance" => [3.0, 4.0],
        }
        .unwrap();

        let matrix = calculate_distance_matrix(&df).unwrap();

        assert_eq!(matrix.get(0, 0), Some(0.0));
        assert_eq!(matrix.get(0, 1), Some(4.0));
    }

    #[test]
    fn unknown_reference_is_an_error() {
        let df = df! {
            "id_start" => [1i64],
            "id_end" => [2i64],
            "distance" => [5.0],
        }
        .unwrap();

        let err = find_ids_within_ten_percentage_threshold(&df, &Key::Int(99)).unwrap_err();

        assert!(matches!(
            err,
            TransformError::UndefinedReference { reference } if reference == Key::Int(99)
        ));
    }
}
