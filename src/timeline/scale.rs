use std::fmt;

use chrono::{Months, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

/// Column width in pixels for each zoom level.
pub const DAY_COLUMN_WIDTH: f32 = 40.0;
pub const WEEK_COLUMN_WIDTH: f32 = 80.0;
pub const MONTH_COLUMN_WIDTH: f32 = 120.0;

/// Average Gregorian month length, used so month zoom keeps a constant density.
pub const AVERAGE_DAYS_IN_MONTH: f32 = 30.4375;

/// Discrete zoom levels, ordered from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ViewMode {
    Day,
    #[default]
    Week,
    Month,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Day, ViewMode::Week, ViewMode::Month];

    /// Parse a mode name. Anything unrecognised falls back to the day scale.
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "week" | "weeks" => ViewMode::Week,
            "month" | "months" => ViewMode::Month,
            _ => ViewMode::Day,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Day => "Day",
            ViewMode::Week => "Week",
            ViewMode::Month => "Month",
        }
    }

    /// One level finer, saturating at day.
    pub fn finer(self) -> Self {
        match self {
            ViewMode::Day | ViewMode::Week => ViewMode::Day,
            ViewMode::Month => ViewMode::Week,
        }
    }

    /// One level coarser, saturating at month.
    pub fn coarser(self) -> Self {
        match self {
            ViewMode::Day => ViewMode::Week,
            ViewMode::Week | ViewMode::Month => ViewMode::Month,
        }
    }
}

impl From<String> for ViewMode {
    fn from(s: String) -> Self {
        ViewMode::parse_lossy(&s)
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fixed pixel width of one axis column.
pub fn column_width(mode: ViewMode) -> f32 {
    match mode {
        ViewMode::Day => DAY_COLUMN_WIDTH,
        ViewMode::Week => WEEK_COLUMN_WIDTH,
        ViewMode::Month => MONTH_COLUMN_WIDTH,
    }
}

/// How many pixels a single day spans at the given zoom level.
pub fn pixels_per_day(mode: ViewMode) -> f32 {
    match mode {
        ViewMode::Day => DAY_COLUMN_WIDTH,
        ViewMode::Week => WEEK_COLUMN_WIDTH / 7.0,
        ViewMode::Month => MONTH_COLUMN_WIDTH / AVERAGE_DAYS_IN_MONTH,
    }
}

/// One labelled column of the time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisColumn {
    /// Boundary date as `YYYY-MM-DD`; stable across frames.
    pub key: String,
    pub label: String,
    pub date: NaiveDate,
    pub width: f32,
}

/// The columns spanning `[start, end]` inclusive at one zoom level.
///
/// This is a cheap `Copy` description; call [`TimeAxis::iter`] as often as
/// needed, each call restarts from the first column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAxis {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub mode: ViewMode,
}

pub fn axis_columns(start: NaiveDate, end: NaiveDate, mode: ViewMode) -> TimeAxis {
    TimeAxis { start, end, mode }
}

impl TimeAxis {
    pub fn iter(&self) -> AxisColumns {
        AxisColumns {
            axis: *self,
            // Extend the bound one day past `end` so its column is included.
            bound: self.end.succ_opt(),
            step: 0,
        }
    }
}

impl IntoIterator for &TimeAxis {
    type Item = AxisColumn;
    type IntoIter = AxisColumns;

    fn into_iter(self) -> AxisColumns {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct AxisColumns {
    axis: TimeAxis,
    bound: Option<NaiveDate>,
    step: u32,
}

impl AxisColumns {
    fn date_at(&self, step: u32) -> Option<NaiveDate> {
        let start = self.axis.start;
        match self.axis.mode {
            ViewMode::Day => start.checked_add_signed(TimeDelta::try_days(i64::from(step))?),
            ViewMode::Week => start.checked_add_signed(TimeDelta::try_weeks(i64::from(step))?),
            ViewMode::Month => start.checked_add_months(Months::new(step)),
        }
    }
}

impl Iterator for AxisColumns {
    type Item = AxisColumn;

    fn next(&mut self) -> Option<AxisColumn> {
        let date = self.date_at(self.step)?;
        // Without a representable bound the end is the last date chrono knows.
        if let Some(bound) = self.bound {
            if date >= bound {
                return None;
            }
        }
        self.step = self.step.checked_add(1)?;

        let label = match self.axis.mode {
            ViewMode::Day | ViewMode::Week => date.format("%b %-d").to_string(),
            ViewMode::Month => date.format("%B %Y").to_string(),
        };
        Some(AxisColumn {
            key: date.format("%Y-%m-%d").to_string(),
            label,
            date,
            width: column_width(self.axis.mode),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn density_is_positive_and_decreases_with_coarseness() {
        let day = pixels_per_day(ViewMode::Day);
        let week = pixels_per_day(ViewMode::Week);
        let month = pixels_per_day(ViewMode::Month);
        assert!(month > 0.0);
        assert!(day > week && week > month);
        assert_eq!(day, 40.0);
        assert!((week - 11.428_572).abs() < 1e-4);
        assert!((month - 3.942_505).abs() < 1e-4);
    }

    #[test]
    fn unknown_mode_names_fall_back_to_day() {
        assert_eq!(ViewMode::parse_lossy("month"), ViewMode::Month);
        assert_eq!(ViewMode::parse_lossy(" Week "), ViewMode::Week);
        assert_eq!(ViewMode::parse_lossy("quarter"), ViewMode::Day);
        let mode: ViewMode = serde_json::from_str("\"fortnight\"").unwrap();
        assert_eq!(mode, ViewMode::Day);
        assert_eq!(serde_json::to_string(&ViewMode::Month).unwrap(), "\"month\"");
    }

    #[test]
    fn ten_day_range_yields_eleven_day_columns() {
        let axis = axis_columns(date(2025, 1, 1), date(2025, 1, 11), ViewMode::Day);
        let columns: Vec<_> = axis.iter().collect();
        assert_eq!(columns.len(), 11);
        assert_eq!(columns[0].label, "Jan 1");
        assert_eq!(columns[10].key, "2025-01-11");
        assert!(columns.iter().all(|c| c.width == 40.0));
    }

    #[test]
    fn axis_is_restartable() {
        let axis = axis_columns(date(2025, 1, 1), date(2025, 1, 20), ViewMode::Week);
        let first: Vec<_> = axis.iter().map(|c| c.key).collect();
        let second: Vec<_> = (&axis).into_iter().map(|c| c.key).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["2025-01-01", "2025-01-08", "2025-01-15"]);
    }

    #[test]
    fn week_column_on_end_boundary_is_included() {
        let axis = axis_columns(date(2025, 1, 1), date(2025, 1, 15), ViewMode::Week);
        assert_eq!(axis.iter().count(), 3);
    }

    #[test]
    fn month_columns_use_long_labels_and_do_not_drift() {
        let axis = axis_columns(date(2025, 1, 31), date(2025, 4, 29), ViewMode::Month);
        let columns: Vec<_> = axis.iter().collect();
        let labels: Vec<_> = columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["January 2025", "February 2025", "March 2025"]);
        assert_eq!(columns[1].date, date(2025, 2, 28));
        assert_eq!(columns[2].date, date(2025, 3, 31));
        assert_eq!(columns[0].width, 120.0);
    }

    #[test]
    fn inverted_range_yields_no_columns() {
        let axis = axis_columns(date(2025, 2, 1), date(2025, 1, 1), ViewMode::Day);
        assert_eq!(axis.iter().next(), None);
    }

    #[test]
    fn zoom_steps_saturate() {
        assert_eq!(ViewMode::Day.finer(), ViewMode::Day);
        assert_eq!(ViewMode::Week.finer(), ViewMode::Day);
        assert_eq!(ViewMode::Month.coarser(), ViewMode::Month);
        assert_eq!(ViewMode::Day.coarser(), ViewMode::Week);
        assert!(ViewMode::Day < ViewMode::Month);
    }
}
