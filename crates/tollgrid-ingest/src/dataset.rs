//! Dataset kinds and their required columns.

use std::fmt;
use std::path::Path;

use polars::prelude::DataFrame;

use crate::csv::read_csv_table;
use crate::error::{IngestError, Result};

/// The input files the transforms are written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// Vehicle counts per id pair and route (`dataset-1`).
    Vehicles,
    /// Weekly time spans per `(id, id_2)` (`dataset-2`).
    Coverage,
    /// Directed distances between toll points (`dataset-3`).
    Distances,
}

impl Dataset {
    pub fn name(self) -> &'static str {
        match self {
            Self::Vehicles => "vehicles",
            Self::Coverage => "coverage",
            Self::Distances => "distances",
        }
    }

    /// Columns every file of this kind must contain.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            Self::Vehicles => &["id_1", "id_2", "car", "bus", "truck", "route"],
            Self::Coverage => &["id", "id_2", "startTime", "endTime"],
            Self::Distances => &["id_start", "id_end", "distance"],
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fails with the first of `columns` missing from `df`.
pub fn require_columns(df: &DataFrame, columns: &[&str], dataset: Dataset) -> Result<()> {
    for column in columns {
        if df.column(column).is_err() {
            return Err(IngestError::MissingColumn {
                column: (*column).to_string(),
                dataset: dataset.name(),
            });
        }
    }
    Ok(())
}

/// Reads a CSV file and checks it against the dataset's required columns.
pub fn read_dataset(path: &Path, dataset: Dataset) -> Result<DataFrame> {
    let df = read_csv_table(path)?;
    require_columns(&df, dataset.required_columns(), dataset)?;
    tracing::debug!(
        dataset = %dataset,
        rows = df.height(),
        "dataset columns verified"
    );
    Ok(df)
}
