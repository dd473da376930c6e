//! Result bundles for each subcommand.
//!
//! Each report runs one chain of transforms over an already loaded frame, so
//! the stages can be exercised without touching the filesystem.

use std::time::Instant;

use polars::prelude::DataFrame;
use serde::Serialize;
use tollgrid_model::{CategoryCount, Key, Matrix, RouteCoverage, TollRates, TollSchedule};
use tollgrid_transform::{
    Result, calculate_distance_matrix, calculate_time_based_toll_rates_with,
    calculate_toll_rate_with, filter_routes, find_ids_within_percentage_threshold,
    generate_car_matrix, get_bus_indexes, get_type_count, multiply_matrix, time_check,
    unroll_distance_matrix,
};
use tracing::{info, info_span};

/// Everything derived from the vehicles dataset.
#[derive(Debug, Clone, Serialize)]
pub struct VehiclesReport {
    pub car_matrix: Matrix,
    pub type_counts: Vec<CategoryCount>,
    pub bus_indexes: Vec<usize>,
    pub routes: Vec<Key>,
    pub multiplied_car_matrix: Matrix,
}

/// Coverage verdicts, one per `(id, id_2)`.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub groups: Vec<RouteCoverage>,
}

impl CoverageReport {
    pub fn complete_count(&self) -> usize {
        self.groups.iter().filter(|group| group.complete).count()
    }
}

/// Inputs of the distance chain that do not come from the CSV file.
#[derive(Debug, Clone)]
pub struct DistanceOptions {
    pub reference: Key,
    pub threshold_percent: f64,
    pub rates: TollRates,
    pub schedule: TollSchedule,
}

/// Everything derived from the distances dataset.
///
/// Threshold selection and toll rates run on the input rows; the matrix and
/// its unrolled form are display results.
#[derive(Debug, Clone)]
pub struct DistancesReport {
    pub matrix: Matrix,
    pub unrolled: DataFrame,
    pub within_threshold: DataFrame,
    pub toll_rates: DataFrame,
    pub time_based_tolls: DataFrame,
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

pub fn vehicles_report(df: &DataFrame) -> Result<VehiclesReport> {
    let span = info_span!("vehicles", rows = df.height());
    let _guard = span.enter();
    let start = Instant::now();

    let car_matrix = generate_car_matrix(df)?;
    let type_counts = get_type_count(df)?;
    let bus_indexes = get_bus_indexes(df)?;
    let routes = filter_routes(df)?;
    let multiplied_car_matrix = multiply_matrix(&car_matrix);

    info!(
        ids = car_matrix.shape().0,
        categories = type_counts.len(),
        bus_indexes = bus_indexes.len(),
        routes = routes.len(),
        duration_ms = elapsed_ms(start),
        "vehicles complete"
    );
    Ok(VehiclesReport {
        car_matrix,
        type_counts,
        bus_indexes,
        routes,
        multiplied_car_matrix,
    })
}

pub fn coverage_report(df: &DataFrame) -> Result<CoverageReport> {
    let span = info_span!("coverage", rows = df.height());
    let _guard = span.enter();
    let start = Instant::now();

    let report = CoverageReport {
        groups: time_check(df)?,
    };

    info!(
        groups = report.groups.len(),
        complete = report.complete_count(),
        duration_ms = elapsed_ms(start),
        "coverage complete"
    );
    Ok(report)
}

pub fn distances_report(df: &DataFrame, options: &DistanceOptions) -> Result<DistancesReport> {
    let span = info_span!(
        "distances",
        rows = df.height(),
        reference = %options.reference
    );
    let _guard = span.enter();

    let start = Instant::now();
    let matrix = calculate_distance_matrix(df)?;
    let unrolled = unroll_distance_matrix(&matrix)?;
    info!(
        ids = matrix.shape().0,
        unrolled_rows = unrolled.height(),
        duration_ms = elapsed_ms(start),
        "distance matrix complete"
    );

    let start = Instant::now();
    let within_threshold = find_ids_within_percentage_threshold(
        df,
        &options.reference,
        options.threshold_percent,
    )?;
    info!(
        rows = within_threshold.height(),
        threshold_percent = options.threshold_percent,
        duration_ms = elapsed_ms(start),
        "threshold selection complete"
    );

    let start = Instant::now();
    let toll_rates = calculate_toll_rate_with(df, options.rates.flat)?;
    let time_based_tolls = calculate_time_based_toll_rates_with(
        df,
        &options.schedule,
        options.rates.time_based,
    )?;
    info!(
        windows = options.schedule.len(),
        rows = time_based_tolls.height(),
        duration_ms = elapsed_ms(start),
        "toll rates complete"
    );

    Ok(DistancesReport {
        matrix,
        unrolled,
        within_threshold,
        toll_rates,
        time_based_tolls,
    })
}
