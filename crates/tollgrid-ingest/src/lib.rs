//! Dataset ingestion for tollgrid.
//!
//! Loads CSV files into Polars DataFrames and checks that each dataset
//! carries the columns its transforms need.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use tollgrid_ingest::{Dataset, read_dataset};
//!
//! let df = read_dataset(Path::new("data/dataset-3.csv"), Dataset::Distances)?;
//! ```

mod csv;
mod dataset;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use crate::csv::{
    MAX_CSV_FILE_SIZE, check_file_size, check_file_size_with_limit, read_csv_schema,
    read_csv_table, validate_encoding,
};

// === Datasets ===
pub use dataset::{Dataset, read_dataset, require_columns};
