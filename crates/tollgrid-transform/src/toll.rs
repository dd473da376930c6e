//! Toll rate columns derived from `distance`.

use polars::prelude::{Column, DataFrame, IdxCa, IdxSize, NamedFrom, NewChunkedArray};
use tollgrid_model::toll::{DEFAULT_FLAT_RATE, DEFAULT_TIME_BASED_RATE};
use tollgrid_model::TollSchedule;

use crate::datetime::{format_time, weekday_name};
use crate::error::{Result, TransformError};
use crate::values::numeric_column;

/// Appends `toll_rate = distance * 0.1`.
pub fn calculate_toll_rate(df: &DataFrame) -> Result<DataFrame> {
    calculate_toll_rate_with(df, DEFAULT_FLAT_RATE)
}

/// Appends `toll_rate = distance * rate`. Null distances give null rates.
pub fn calculate_toll_rate_with(df: &DataFrame, rate: f64) -> Result<DataFrame> {
    let distances = numeric_column(df, "distance")?;
    let tolls: Vec<Option<f64>> = distances
        .iter()
        .map(|distance| distance.map(|distance| distance * rate))
        .collect();

    let mut result = df.clone();
    result.with_column(Column::new("toll_rate".into(), tolls))?;
    Ok(result)
}

/// Expands each row into one row per schedule window with
/// `time_based_toll = distance * 0.05 * factor`.
pub fn calculate_time_based_toll_rates(
    df: &DataFrame,
    schedule: &TollSchedule,
) -> Result<DataFrame> {
    calculate_time_based_toll_rates_with(df, schedule, DEFAULT_TIME_BASED_RATE)
}

/// Expands each row into one row per schedule window.
///
/// Appended columns: `start_day`, `start_time`, `end_day`, `end_time`
/// describing the window, and `time_based_toll = distance * rate * factor`.
/// Rows stay grouped by input row, windows in schedule order.
///
/// # Errors
///
/// [`TransformError::EmptyInput`] when the schedule has no windows.
pub fn calculate_time_based_toll_rates_with(
    df: &DataFrame,
    schedule: &TollSchedule,
    rate: f64,
) -> Result<DataFrame> {
    if schedule.is_empty() {
        return Err(TransformError::EmptyInput {
            operation: "calculate_time_based_toll_rates",
        });
    }
    let distances = numeric_column(df, "distance")?;
    let windows = schedule.windows();
    let total = df.height() * windows.len();

    let mut indices: Vec<IdxSize> = Vec::with_capacity(total);
    let mut start_days = Vec::with_capacity(total);
    let mut start_times = Vec::with_capacity(total);
    let mut end_days = Vec::with_capacity(total);
    let mut end_times = Vec::with_capacity(total);
    let mut tolls: Vec<Option<f64>> = Vec::with_capacity(total);

    for (row, distance) in distances.iter().enumerate() {
        let idx = IdxSize::try_from(row).map_err(|_| TransformError::DataFrame {
            message: format!("row {row} exceeds the supported row index range"),
        })?;
        for window in windows {
            indices.push(idx);
            start_days.push(weekday_name(window.start_day));
            start_times.push(format_time(window.start_time));
            end_days.push(weekday_name(window.end_day));
            end_times.push(format_time(window.end_time));
            tolls.push(distance.map(|distance| distance * rate * window.factor));
        }
    }

    let mut result = df.take(&IdxCa::from_vec("row".into(), indices))?;
    result.with_column(Column::new("start_day".into(), start_days))?;
    result.with_column(Column::new("start_time".into(), start_times))?;
    result.with_column(Column::new("end_day".into(), end_days))?;
    result.with_column(Column::new("end_time".into(), end_times))?;
    result.with_column(Column::new("time_based_toll".into(), tolls))?;

    tracing::debug!(
        input_rows = df.height(),
        windows = windows.len(),
        rows = result.height(),
        "expanded time-based toll rates"
    );
    Ok(result)
}
