//! Weekly time coverage completeness per `(id, id_2)` group.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use polars::prelude::DataFrame;
use tollgrid_model::toll::{day_end, day_start};
use tollgrid_model::{Key, RouteCoverage};

use crate::datetime::{WeekPoint, resolve_week_point};
use crate::error::{Result, TransformError};
use crate::values::{key_column, require_column, text_column};

/// Bitmask with one bit per weekday, Monday as bit 0.
const ALL_DAYS: u8 = 0b111_1111;

#[derive(Debug, Clone, Copy)]
struct GroupSpan {
    earliest_start: NaiveTime,
    latest_end: NaiveTime,
    start_days: u8,
    end_days: u8,
}

impl GroupSpan {
    fn new(start: WeekPoint, end: WeekPoint) -> Self {
        Self {
            earliest_start: start.time,
            latest_end: end.time,
            start_days: day_bit(start),
            end_days: day_bit(end),
        }
    }

    fn add(&mut self, start: WeekPoint, end: WeekPoint) {
        self.earliest_start = self.earliest_start.min(start.time);
        self.latest_end = self.latest_end.max(end.time);
        self.start_days |= day_bit(start);
        self.end_days |= day_bit(end);
    }

    fn is_complete(&self) -> bool {
        self.earliest_start == day_start()
            && self.latest_end == day_end()
            && self.start_days == ALL_DAYS
            && self.end_days == ALL_DAYS
    }
}

fn day_bit(point: WeekPoint) -> u8 {
    1 << point.weekday.num_days_from_monday()
}

/// One timestamp column with its optional weekday column.
struct TimestampColumn<'a> {
    name: &'a str,
    times: Vec<Option<String>>,
    days: Option<Vec<Option<String>>>,
}

impl<'a> TimestampColumn<'a> {
    fn load(df: &DataFrame, name: &'a str, day_column: &str) -> Result<Self> {
        let times = text_column(df, name)?;
        let days = if require_column(df, day_column).is_ok() {
            Some(text_column(df, day_column)?)
        } else {
            None
        };
        Ok(Self { name, times, days })
    }

    /// Resolves the weekday and time of `row`; a null timestamp is a failure.
    fn point(&self, row: usize) -> Result<WeekPoint> {
        let time = self.times[row].as_deref().unwrap_or_default();
        let day = self.days.as_ref().and_then(|days| days[row].as_deref());
        resolve_week_point(time, day).ok_or_else(|| TransformError::ParseFailure {
            column: self.name.to_string(),
            row,
            value: time.to_string(),
            expected: "date-time",
        })
    }
}

/// Checks, per `(id, id_2)`, whether the rows cover the whole week.
///
/// A group is complete when its earliest start time of day is 00:00:00, its
/// latest end time of day is 23:59:59, and both its start weekdays and end
/// weekdays include all seven days. Results are sorted by `(id, id_2)`.
///
/// `startTime`/`endTime` may hold full date-times, or bare times alongside
/// `startDay`/`endDay` weekday columns.
///
/// # Errors
///
/// [`TransformError::ParseFailure`] for a timestamp that cannot be resolved
/// to a weekday and time. Rows with a null `id` or `id_2` are skipped before
/// their timestamps are read.
pub fn time_check(df: &DataFrame) -> Result<Vec<RouteCoverage>> {
    let ids = key_column(df, "id")?;
    let ids_2 = key_column(df, "id_2")?;
    let starts = TimestampColumn::load(df, "startTime", "startDay")?;
    let ends = TimestampColumn::load(df, "endTime", "endDay")?;

    let mut groups: BTreeMap<(Key, Key), GroupSpan> = BTreeMap::new();
    for (row, (id, id_2)) in ids.into_iter().zip(ids_2).enumerate() {
        let (Some(id), Some(id_2)) = (id, id_2) else {
            continue;
        };
        let start = starts.point(row)?;
        let end = ends.point(row)?;
        groups
            .entry((id, id_2))
            .and_modify(|span| span.add(start, end))
            .or_insert_with(|| GroupSpan::new(start, end));
    }

    let results: Vec<RouteCoverage> = groups
        .into_iter()
        .map(|((id, id_2), span)| RouteCoverage {
            id,
            id_2,
            complete: span.is_complete(),
        })
        .collect();
    tracing::debug!(
        groups = results.len(),
        complete = results.iter().filter(|result| result.complete).count(),
        "checked time coverage"
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn blank_timestamp_is_a_parse_failure() {
        let df = df! {
            "id" => [1i64],
            "id_2" => [2i64],
            "startTime" => [""],
            "endTime" => ["2023-01-01 23:59:59"],
        }
        .unwrap();

        let err = time_check(&df).unwrap_err();

        assert!(matches!(
            err,
            TransformError::ParseFailure { column, row: 0, .. } if column == "startTime"
        ));
    }

    #[test]
    fn unparsable_timestamp_names_value() {
        let df = df! {
            "id" => [1i64],
            "id_2" => [2i64],
            "startTime" => ["noon"],
            "endTime" => ["2023-01-01 23:59:59"],
        }
        .unwrap();

        let err = time_check(&df).unwrap_err();

        assert!(matches!(
            err,
            TransformError::ParseFailure { value, .. } if value == "noon"
        ));
    }

    #[test]
    fn null_key_rows_skip_timestamp_parsing() {
        let df = df! {
            "id" => [None, Some(1i64)],
            "id_2" => [Some(2i64), Some(2)],
            "startTime" => ["noon", "2023-01-02 00:00:00"],
            "endTime" => ["", "2023-01-02 23:59:59"],
        }
        .unwrap();

        let result = time_check(&df).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, Key::Int(1));
        assert!(!result[0].complete);
    }
}
