use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use polars::prelude::DataFrame;
use serde::Serialize;
use tollgrid_cli::render::{
    Section, coverage_sections, distances_json, distances_sections, sections_to_string,
    vehicles_sections,
};
use tollgrid_cli::report::{DistanceOptions, coverage_report, distances_report, vehicles_report};
use tollgrid_ingest::{Dataset, read_dataset};
use tollgrid_model::{Key, TollRates, TollSchedule};
use tracing::{debug, info};

use crate::cli::{DatasetArgs, DistanceArgs, OutputArg};

pub fn run_vehicles(args: &DatasetArgs, output: OutputArg) -> Result<()> {
    let df = load(&args.path, Dataset::Vehicles)?;
    let report = vehicles_report(&df).context("vehicles transforms")?;
    emit(output, &report, || vehicles_sections(&report))
}

pub fn run_coverage(args: &DatasetArgs, output: OutputArg) -> Result<()> {
    let df = load(&args.path, Dataset::Coverage)?;
    let report = coverage_report(&df).context("coverage check")?;
    emit(output, &report, || coverage_sections(&report))
}

pub fn run_distances(args: &DistanceArgs, output: OutputArg) -> Result<()> {
    let df = load(&args.path, Dataset::Distances)?;
    let reference = match &args.reference_id {
        Some(raw) => parse_reference(raw)?,
        None => prompt_reference()?,
    };
    let options = DistanceOptions {
        reference,
        threshold_percent: args.threshold_percent,
        rates: TollRates::default()
            .with_flat(args.flat_rate)
            .with_time_based(args.time_rate),
        schedule: if args.flat_schedule {
            TollSchedule::flat()
        } else {
            TollSchedule::default()
        },
    };
    let report = distances_report(&df, &options).context("distance transforms")?;
    match output {
        OutputArg::Json => {
            let value = distances_json(&report).context("serialize distances")?;
            print_json(&value)
        }
        OutputArg::Table => print_sections(&distances_sections(&report)),
    }
}

fn load(path: &Path, dataset: Dataset) -> Result<DataFrame> {
    let start = Instant::now();
    let df = read_dataset(path, dataset)
        .with_context(|| format!("read {dataset} dataset {}", path.display()))?;
    info!(
        dataset = %dataset,
        rows = df.height(),
        columns = df.width(),
        duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "loaded csv"
    );
    Ok(df)
}

fn emit<T, F>(output: OutputArg, report: &T, sections: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce() -> Vec<Section>,
{
    match output {
        OutputArg::Json => {
            let value = serde_json::to_value(report).context("serialize report")?;
            print_json(&value)
        }
        OutputArg::Table => print_sections(&sections()),
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize report")?;
    println!("{text}");
    Ok(())
}

fn print_sections(sections: &[Section]) -> Result<()> {
    println!("{}", sections_to_string(sections));
    Ok(())
}

fn parse_reference(raw: &str) -> Result<Key> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("reference id is empty");
    }
    Ok(Key::parse(trimmed))
}

/// Reads the reference id from one line of stdin, prompting on a terminal.
fn prompt_reference() -> Result<Key> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("Reference id: ");
        io::stderr().flush().context("flush prompt")?;
    }
    let key = read_reference(stdin.lock())?;
    debug!(reference = %key, "reference id read from stdin");
    Ok(key)
}

fn read_reference<R: BufRead>(mut reader: R) -> Result<Key> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("read reference id from stdin")?;
    parse_reference(&line).context("no reference id given; pass --reference-id or type one")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_reference_becomes_int_key() {
        let key = read_reference("1001400\n".as_bytes()).unwrap();
        assert_eq!(key, Key::Int(1001400));
    }

    #[test]
    fn text_reference_is_kept() {
        assert_eq!(parse_reference(" gate-7 ").unwrap(), Key::from("gate-7"));
    }

    #[test]
    fn blank_reference_is_rejected() {
        assert!(read_reference("\n".as_bytes()).is_err());
        assert!(read_reference("".as_bytes()).is_err());
    }
}
