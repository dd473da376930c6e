//! Pivot and unroll between long tables and [`Matrix`].

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{Column, DataFrame, NamedFrom};
use tollgrid_model::{Key, Matrix};

use crate::error::{Result, TransformError};
use crate::values::{key_column, keys_to_column, numeric_column};

/// Maps each label to its position in a sorted label list.
pub(crate) fn label_positions(labels: &[Key]) -> BTreeMap<&Key, usize> {
    labels.iter().enumerate().map(|(idx, key)| (key, idx)).collect()
}

/// Pivots a long table into a matrix.
///
/// Rows are the sorted distinct values of `index`, columns the sorted
/// distinct values of `columns`, and each cell holds the `values` entry of the
/// row with that label pair. Pairs without a row stay absent. Rows with a null
/// label are dropped; rows with a null value contribute labels only.
///
/// # Errors
///
/// - [`TransformError::MissingColumn`] if any of the three columns is absent
/// - [`TransformError::ParseFailure`] if a value is not numeric
/// - [`TransformError::DuplicateKey`] if two rows carry a value for the same pair
pub fn pivot(df: &DataFrame, index: &str, columns: &str, values: &str) -> Result<Matrix> {
    let row_keys = key_column(df, index)?;
    let column_keys = key_column(df, columns)?;
    let cells = numeric_column(df, values)?;

    let mut row_set = BTreeSet::new();
    let mut column_set = BTreeSet::new();
    for (row, column) in row_keys.iter().zip(&column_keys) {
        if let (Some(row), Some(column)) = (row, column) {
            row_set.insert(row.clone());
            column_set.insert(column.clone());
        }
    }
    let row_labels: Vec<Key> = row_set.into_iter().collect();
    let column_labels: Vec<Key> = column_set.into_iter().collect();

    let mut matrix = Matrix::new(row_labels.clone(), column_labels.clone());
    let row_pos = label_positions(&row_labels);
    let column_pos = label_positions(&column_labels);

    for ((row, column), value) in row_keys.iter().zip(&column_keys).zip(&cells) {
        let (Some(row), Some(column), Some(value)) = (row, column, value) else {
            continue;
        };
        let (r, c) = (row_pos[row], column_pos[column]);
        if matrix.get(r, c).is_some() {
            return Err(TransformError::DuplicateKey {
                row: row.clone(),
                column: column.clone(),
            });
        }
        matrix.set(r, c, Some(*value));
    }

    tracing::debug!(
        index,
        columns,
        values,
        rows = matrix.shape().0,
        cols = matrix.shape().1,
        cells = matrix.present_count(),
        "pivoted table"
    );
    Ok(matrix)
}

/// Unrolls a matrix into a long table with one row per cell.
///
/// Output columns are `row_name`, `column_name` and `value_name`, in
/// row-major order. Absent cells become null values.
pub fn unroll(
    matrix: &Matrix,
    row_name: &str,
    column_name: &str,
    value_name: &str,
) -> Result<DataFrame> {
    let (rows, cols) = matrix.shape();
    let mut row_keys = Vec::with_capacity(rows * cols);
    let mut column_keys = Vec::with_capacity(rows * cols);
    let mut values = Vec::with_capacity(rows * cols);
    for (row, column, value) in matrix.iter_cells() {
        row_keys.push(Some(row.clone()));
        column_keys.push(Some(column.clone()));
        values.push(value);
    }

    let df = DataFrame::new(vec![
        keys_to_column(row_name, &row_keys),
        keys_to_column(column_name, &column_keys),
        Column::new(value_name.into(), values),
    ])?;
    Ok(df)
}
