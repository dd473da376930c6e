//! CLI argument definitions for tollgrid.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tollgrid_model::toll::{DEFAULT_FLAT_RATE, DEFAULT_TIME_BASED_RATE};
use tollgrid_transform::DEFAULT_THRESHOLD_PERCENT;

#[derive(Parser)]
#[command(
    name = "tollgrid",
    version,
    about = "Toll network analytics over vehicle, coverage and distance CSV files",
    long_about = "Reshape and aggregate toll network CSV datasets.\n\n\
                  Builds id-by-id matrices, checks weekly time coverage, selects ids\n\
                  by mean distance and derives flat and time-window toll rates."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Result format written to stdout.
    #[arg(long = "output", value_enum, default_value = "table", global = true)]
    pub output: OutputArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Car matrix, type counts, bus indexes and truck-heavy routes.
    Vehicles(DatasetArgs),

    /// Weekly time coverage per (id, id_2).
    Coverage(DatasetArgs),

    /// Distance matrix, threshold selection and toll rates.
    Distances(DistanceArgs),
}

#[derive(Args)]
pub struct DatasetArgs {
    /// Path to the CSV file.
    #[arg(value_name = "CSV")]
    pub path: PathBuf,
}

#[derive(Args)]
pub struct DistanceArgs {
    /// Path to the CSV file with id_start, id_end and distance columns.
    #[arg(value_name = "CSV")]
    pub path: PathBuf,

    /// Reference id for the threshold selection (read from stdin when absent).
    #[arg(long = "reference-id", value_name = "ID")]
    pub reference_id: Option<String>,

    /// Allowed deviation from the reference mean distance, in percent.
    #[arg(
        long = "threshold-percent",
        value_name = "P",
        default_value_t = DEFAULT_THRESHOLD_PERCENT
    )]
    pub threshold_percent: f64,

    /// Flat toll rate per distance unit.
    #[arg(long = "flat-rate", value_name = "R", default_value_t = DEFAULT_FLAT_RATE)]
    pub flat_rate: f64,

    /// Base time-based toll rate per distance unit.
    #[arg(long = "time-rate", value_name = "R", default_value_t = DEFAULT_TIME_BASED_RATE)]
    pub time_rate: f64,

    /// Use a single all-week window with factor 1 instead of the weekday schedule.
    #[arg(long = "flat-schedule")]
    pub flat_schedule: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

/// Result rendering choices.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    Table,
    Json,
}
