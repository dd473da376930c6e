//! Labelled two-dimensional matrix.
//!
//! A [`Matrix`] is the wide form of a long table: one column's distinct values
//! label the rows, another's label the columns, and a third supplies the cell
//! values. Cells are row-major and may be absent.

use serde::Serialize;

use crate::key::Key;

/// A matrix with ordered row and column labels and optional numeric cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matrix {
    row_labels: Vec<Key>,
    column_labels: Vec<Key>,
    cells: Vec<Option<f64>>,
}

impl Matrix {
    /// Create a matrix with every cell absent.
    pub fn new(row_labels: Vec<Key>, column_labels: Vec<Key>) -> Self {
        let cells = vec![None; row_labels.len() * column_labels.len()];
        Self {
            row_labels,
            column_labels,
            cells,
        }
    }

    /// Create a matrix with every cell set to `value`.
    pub fn filled(row_labels: Vec<Key>, column_labels: Vec<Key>, value: f64) -> Self {
        let cells = vec![Some(value); row_labels.len() * column_labels.len()];
        Self {
            row_labels,
            column_labels,
            cells,
        }
    }

    pub fn row_labels(&self) -> &[Key] {
        &self.row_labels
    }

    pub fn column_labels(&self) -> &[Key] {
        &self.column_labels
    }

    /// Returns `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_labels.len(), self.column_labels.len())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn row_position(&self, label: &Key) -> Option<usize> {
        self.row_labels.iter().position(|candidate| candidate == label)
    }

    pub fn column_position(&self, label: &Key) -> Option<usize> {
        self.column_labels
            .iter()
            .position(|candidate| candidate == label)
    }

    /// Cell at a positional `(row, column)`; `None` when absent or out of range.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if row >= self.row_labels.len() || column >= self.column_labels.len() {
            return None;
        }
        self.cells[row * self.column_labels.len() + column]
    }

    /// Cell addressed by labels.
    pub fn get_by_label(&self, row: &Key, column: &Key) -> Option<f64> {
        let row = self.row_position(row)?;
        let column = self.column_position(column)?;
        self.get(row, column)
    }

    /// Sets a positional cell. Out-of-range positions are ignored.
    pub fn set(&mut self, row: usize, column: usize, value: Option<f64>) {
        if row >= self.row_labels.len() || column >= self.column_labels.len() {
            return;
        }
        let width = self.column_labels.len();
        self.cells[row * width + column] = value;
    }

    /// Returns the cells of one row, in column order.
    pub fn row(&self, row: usize) -> &[Option<f64>] {
        let width = self.column_labels.len();
        &self.cells[row * width..(row + 1) * width]
    }

    /// Iterates `(row_label, column_label, cell)` in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (&Key, &Key, Option<f64>)> + '_ {
        let width = self.column_labels.len();
        self.cells.iter().enumerate().map(move |(idx, cell)| {
            (
                &self.row_labels[idx / width],
                &self.column_labels[idx % width],
                *cell,
            )
        })
    }

    /// Applies `f` to every present cell, leaving absent cells absent.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            row_labels: self.row_labels.clone(),
            column_labels: self.column_labels.clone(),
            cells: self.cells.iter().map(|cell| cell.map(&f)).collect(),
        }
    }

    /// Number of present cells.
    pub fn present_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}
