//! Toll rate configuration.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Default multiplier applied to `distance` for the flat toll rate.
pub const DEFAULT_FLAT_RATE: f64 = 0.1;

/// Default multiplier applied to `distance` before time-window factors.
pub const DEFAULT_TIME_BASED_RATE: f64 = 0.05;

/// Base rates per unit of distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TollRates {
    pub flat: f64,
    pub time_based: f64,
}

impl Default for TollRates {
    fn default() -> Self {
        Self {
            flat: DEFAULT_FLAT_RATE,
            time_based: DEFAULT_TIME_BASED_RATE,
        }
    }
}

impl TollRates {
    #[must_use]
    pub fn with_flat(mut self, rate: f64) -> Self {
        self.flat = rate;
        self
    }

    #[must_use]
    pub fn with_time_based(mut self, rate: f64) -> Self {
        self.time_based = rate;
        self
    }
}

/// A span of the week with its own rate factor.
///
/// The window runs from `start_time` on `start_day` to `end_time` on `end_day`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TollWindow {
    pub start_day: Weekday,
    pub start_time: NaiveTime,
    pub end_day: Weekday,
    pub end_time: NaiveTime,
    pub factor: f64,
}

impl TollWindow {
    /// A window contained in a single day.
    pub fn same_day(day: Weekday, start_time: NaiveTime, end_time: NaiveTime, factor: f64) -> Self {
        Self {
            start_day: day,
            start_time,
            end_day: day,
            end_time,
            factor,
        }
    }
}

/// Ordered set of toll windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TollSchedule {
    windows: Vec<TollWindow>,
}

const WEEKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

const WEEKEND: [Weekday; 2] = [Weekday::Sat, Weekday::Sun];

fn hms(hour: u32, minute: u32, second: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, second).unwrap_or(NaiveTime::MIN)
}

/// First second of a day.
pub fn day_start() -> NaiveTime {
    hms(0, 0, 0)
}

/// Last second of a day.
pub fn day_end() -> NaiveTime {
    hms(23, 59, 59)
}

impl Default for TollSchedule {
    /// Weekday peak pricing with a discounted weekend.
    ///
    /// | Days    | Window              | Factor |
    /// |---------|---------------------|--------|
    /// | Mon-Fri | 00:00:00 - 10:00:00 | 0.8    |
    /// | Mon-Fri | 10:00:00 - 18:00:00 | 1.2    |
    /// | Mon-Fri | 18:00:00 - 23:59:59 | 0.8    |
    /// | Sat-Sun | 00:00:00 - 23:59:59 | 0.7    |
    fn default() -> Self {
        let mut windows = Vec::with_capacity(WEEKDAYS.len() * 3 + WEEKEND.len());
        for day in WEEKDAYS {
            windows.push(TollWindow::same_day(day, day_start(), hms(10, 0, 0), 0.8));
            windows.push(TollWindow::same_day(day, hms(10, 0, 0), hms(18, 0, 0), 1.2));
            windows.push(TollWindow::same_day(day, hms(18, 0, 0), day_end(), 0.8));
        }
        for day in WEEKEND {
            windows.push(TollWindow::same_day(day, day_start(), day_end(), 0.7));
        }
        Self { windows }
    }
}

impl TollSchedule {
    pub fn new(windows: Vec<TollWindow>) -> Self {
        Self { windows }
    }

    /// One window for the whole week at factor 1.0.
    pub fn flat() -> Self {
        Self {
            windows: vec![TollWindow {
                start_day: Weekday::Mon,
                start_time: day_start(),
                end_day: Weekday::Sun,
                end_time: day_end(),
                factor: 1.0,
            }],
        }
    }

    pub fn windows(&self) -> &[TollWindow] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rates() {
        let rates = TollRates::default();
        assert_eq!(rates.flat, 0.1);
        assert_eq!(rates.time_based, 0.05);
        assert_eq!(rates.with_flat(0.2).flat, 0.2);
    }

    #[test]
    fn default_schedule_covers_every_day() {
        let schedule = TollSchedule::default();
        assert_eq!(schedule.len(), 17);
        for day in WEEKDAYS.iter().chain(WEEKEND.iter()) {
            let windows: Vec<&TollWindow> = schedule
                .windows()
                .iter()
                .filter(|window| window.start_day == *day)
                .collect();
            assert_eq!(windows.first().unwrap().start_time, day_start());
            assert_eq!(windows.last().unwrap().end_time, day_end());
        }
    }

    #[test]
    fn weekend_factor_is_discounted() {
        let schedule = TollSchedule::default();
        let sunday = schedule
            .windows()
            .iter()
            .find(|window| window.start_day == Weekday::Sun)
            .unwrap();
        assert_eq!(sunday.factor, 0.7);
    }

    #[test]
    fn flat_schedule_spans_week() {
        let schedule = TollSchedule::flat();
        let window = &schedule.windows()[0];
        assert_eq!(window.start_day, Weekday::Mon);
        assert_eq!(window.end_day, Weekday::Sun);
        assert_eq!(window.factor, 1.0);
    }
}
