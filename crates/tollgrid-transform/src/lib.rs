//! Tabular transforms for tollgrid datasets.
//!
//! Every operation takes a borrowed [`DataFrame`](polars::prelude::DataFrame)
//! or [`Matrix`](tollgrid_model::Matrix) and returns a freshly built result;
//! inputs are never modified.
//!
//! - **reshape**: generic pivot (long → matrix) and unroll (matrix → long)
//! - **vehicles**: car matrix, category counts, bus/route threshold filters
//! - **distance**: symmetric distance matrix and percentage-threshold groups
//! - **toll**: flat and time-window toll rate columns
//! - **coverage**: weekly day/time completeness per `(id, id_2)`
//! - **datetime**: timestamp, time-of-day and weekday parsing
//! - **values**: `AnyValue` conversions and column extraction

pub mod coverage;
pub mod datetime;
pub mod distance;
pub mod error;
pub mod reshape;
pub mod toll;
pub mod values;
pub mod vehicles;

pub use coverage::time_check;
pub use distance::{
    DEFAULT_THRESHOLD_PERCENT, calculate_distance_matrix, find_ids_within_percentage_threshold,
    find_ids_within_ten_percentage_threshold, unroll_distance_matrix,
};
pub use error::{Result, TransformError};
pub use reshape::{pivot, unroll};
pub use toll::{
    calculate_time_based_toll_rates, calculate_time_based_toll_rates_with, calculate_toll_rate,
    calculate_toll_rate_with,
};
pub use vehicles::{
    ROUTE_TRUCK_THRESHOLD, filter_routes, filter_routes_above, generate_car_matrix,
    get_bus_indexes, get_type_count, multiply_matrix,
};
