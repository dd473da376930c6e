//! Transforms over the vehicle dataset (`id_1`, `id_2`, `car`, `bus`,
//! `truck`, `route`).

use std::collections::{BTreeMap, HashMap};

use polars::prelude::DataFrame;
use tollgrid_model::{CategoryCount, Key, Matrix};

use crate::error::{Result, TransformError};
use crate::reshape::pivot;
use crate::values::{RunningMean, key_column, numeric_column};

/// Routes whose mean truck count is above this are reported by [`filter_routes`].
pub const ROUTE_TRUCK_THRESHOLD: f64 = 7.0;

/// Cells above this value are doubled by [`multiply_matrix`].
const MULTIPLY_THRESHOLD: f64 = 5.0;

/// Pivots `car` values into an `id_1` × `id_2` matrix.
///
/// Pairs with no row are absent, not zero.
pub fn generate_car_matrix(df: &DataFrame) -> Result<Matrix> {
    pivot(df, "id_1", "id_2", "car")
}

/// Counts rows per distinct `car` value.
///
/// Ordered by descending count; equal counts keep first-seen order. Null
/// values are not counted.
pub fn get_type_count(df: &DataFrame) -> Result<Vec<CategoryCount>> {
    let values = key_column(df, "car")?;
    let mut positions: HashMap<Key, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();
    for value in values.into_iter().flatten() {
        if let Some(&idx) = positions.get(&value) {
            counts[idx].count += 1;
        } else {
            positions.insert(value.clone(), counts.len());
            counts.push(CategoryCount { value, count: 1 });
        }
    }
    // Stable sort keeps first-seen order among ties.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    tracing::debug!(categories = counts.len(), "counted car values");
    Ok(counts)
}

/// Positional indexes of `bus` rows whose `bus` value exceeds twice the mean.
///
/// The mean is taken over every row of the table, not only the `car == "bus"`
/// rows. Indexes are positions `0..n` in input order, ascending.
///
/// # Errors
///
/// [`TransformError::EmptyInput`] when no row has a `bus` value.
pub fn get_bus_indexes(df: &DataFrame) -> Result<Vec<usize>> {
    let cars = key_column(df, "car")?;
    let buses = numeric_column(df, "bus")?;
    let mean = buses
        .iter()
        .copied()
        .collect::<RunningMean>()
        .value()
        .ok_or(TransformError::EmptyInput {
            operation: "get_bus_indexes",
        })?;
    let threshold = 2.0 * mean;
    let bus = Key::from("bus");

    let indexes: Vec<usize> = cars
        .iter()
        .zip(&buses)
        .enumerate()
        .filter_map(|(idx, (car, value))| {
            let is_bus = car.as_ref() == Some(&bus);
            (is_bus && value.is_some_and(|value| value > threshold)).then_some(idx)
        })
        .collect();
    tracing::debug!(mean, matches = indexes.len(), "selected bus indexes");
    Ok(indexes)
}

/// Routes whose mean `truck` value is strictly greater than 7, sorted.
pub fn filter_routes(df: &DataFrame) -> Result<Vec<Key>> {
    filter_routes_above(df, ROUTE_TRUCK_THRESHOLD)
}

/// Routes whose mean `truck` value is strictly greater than `threshold`, sorted.
///
/// Rows without a route are ignored; a route whose `truck` values are all
/// null has no mean and is never reported.
pub fn filter_routes_above(df: &DataFrame, threshold: f64) -> Result<Vec<Key>> {
    let routes = key_column(df, "route")?;
    let trucks = numeric_column(df, "truck")?;

    let mut means: BTreeMap<Key, RunningMean> = BTreeMap::new();
    for (route, truck) in routes.into_iter().zip(trucks) {
        if let Some(route) = route {
            means.entry(route).or_default().push(truck);
        }
    }

    Ok(means
        .into_iter()
        .filter(|(_, mean)| mean.value().is_some_and(|mean| mean > threshold))
        .map(|(route, _)| route)
        .collect())
}

/// Doubles every cell greater than 5; other cells are unchanged.
///
/// Not idempotent: applying it twice turns 6 into 24.
pub fn multiply_matrix(matrix: &Matrix) -> Matrix {
    matrix.map_values(|value| {
        if value > MULTIPLY_THRESHOLD {
            value * 2.0
        } else {
            value
        }
    })
}
