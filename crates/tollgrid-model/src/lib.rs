//! Shared value types for the tollgrid workspace.
//!
//! - [`Key`]: a scalar label used for matrix rows/columns and group keys
//! - [`Matrix`]: a labelled two-dimensional grid of optional numeric cells
//! - [`CategoryCount`], [`RouteCoverage`]: grouped aggregate results
//! - [`TollRates`], [`TollSchedule`], [`TollWindow`]: toll configuration

pub mod key;
pub mod matrix;
pub mod records;
pub mod toll;

pub use key::Key;
pub use matrix::Matrix;
pub use records::{CategoryCount, RouteCoverage};
pub use toll::{TollRates, TollSchedule, TollWindow};
