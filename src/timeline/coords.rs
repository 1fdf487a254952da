use chrono::{NaiveDateTime, NaiveTime, TimeDelta};

use crate::model::Task;

/// Height of one row (swimlane) in pixels.
pub const ROW_HEIGHT: f32 = 48.0;
/// Vertical gap between a row's top edge and its task bars.
pub const TASK_TOP_INSET: f32 = 8.0;
/// Height of a task bar. `TASK_TOP_INSET + TASK_HEIGHT` stays within `ROW_HEIGHT`.
pub const TASK_HEIGHT: f32 = 32.0;

const MS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// On-screen rectangle of a task, relative to the timeline body origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl TaskRect {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / MS_PER_DAY
}

/// Horizontal offset of `date` from `view_start`. Not clamped: dates before
/// the view are negative, dates past its end exceed the total width.
pub fn position(date: NaiveDateTime, view_start: NaiveDateTime, pixels_per_day: f32) -> f32 {
    (days_between(view_start, date) * f64::from(pixels_per_day)) as f32
}

/// Pixel width of a date span, never narrower than one pixel.
pub fn duration_width(start: NaiveDateTime, end: NaiveDateTime, pixels_per_day: f32) -> f32 {
    let raw = (days_between(start, end) * f64::from(pixels_per_day)).round() as f32;
    raw.max(1.0)
}

/// Date at pixel offset `px`, snapped to whole days and truncated to midnight.
///
/// A zero density (or any input that yields no finite day count, or a date
/// chrono cannot represent) returns `view_start` unchanged.
pub fn date_from_position(px: f32, view_start: NaiveDateTime, pixels_per_day: f32) -> NaiveDateTime {
    if pixels_per_day == 0.0 {
        return view_start;
    }
    let days = (f64::from(px) / f64::from(pixels_per_day)).round();
    if !days.is_finite() {
        return view_start;
    }
    TimeDelta::try_days(days as i64)
        .and_then(|delta| view_start.date().checked_add_signed(delta))
        .map(|date| date.and_time(NaiveTime::MIN))
        .unwrap_or(view_start)
}

/// Rectangle of `task` when drawn in the row at `row_index`.
pub fn task_rect(
    task: &Task,
    view_start: NaiveDateTime,
    pixels_per_day: f32,
    row_index: usize,
) -> TaskRect {
    TaskRect {
        left: position(task.start, view_start, pixels_per_day),
        top: row_index as f32 * ROW_HEIGHT + TASK_TOP_INSET,
        width: duration_width(task.start, task.end, pixels_per_day),
        height: TASK_HEIGHT,
    }
}

/// A view origin paired with a density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub origin: NaiveDateTime,
    pub pixels_per_day: f32,
}

impl Projection {
    pub fn new(origin: NaiveDateTime, pixels_per_day: f32) -> Self {
        Self {
            origin,
            pixels_per_day,
        }
    }

    pub fn x(&self, date: NaiveDateTime) -> f32 {
        position(date, self.origin, self.pixels_per_day)
    }

    pub fn width(&self, start: NaiveDateTime, end: NaiveDateTime) -> f32 {
        duration_width(start, end, self.pixels_per_day)
    }

    pub fn date_at(&self, px: f32) -> NaiveDateTime {
        date_from_position(px, self.origin, self.pixels_per_day)
    }

    pub fn task_rect(&self, task: &Task, row_index: usize) -> TaskRect {
        task_rect(task, self.origin, self.pixels_per_day, row_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RowId;
    use crate::timeline::scale::{pixels_per_day, ViewMode};
    use chrono::NaiveDate;

    fn at(m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn position_is_unclamped() {
        let origin = at(1, 10);
        assert_eq!(position(at(1, 12), origin, 40.0), 80.0);
        assert_eq!(position(at(1, 8), origin, 40.0), -80.0);
        let half_day = origin + TimeDelta::hours(12);
        assert_eq!(position(half_day, origin, 40.0), 20.0);
    }

    #[test]
    fn duration_width_has_one_pixel_floor() {
        assert_eq!(duration_width(at(1, 5), at(1, 5), 40.0), 1.0);
        assert_eq!(duration_width(at(1, 10), at(1, 5), 40.0), 1.0);
        assert_eq!(duration_width(at(1, 5), at(1, 10), 40.0), 200.0);
        // 3 days at 80/7 px/day = 34.28..., rounded
        assert_eq!(duration_width(at(1, 5), at(1, 8), 80.0 / 7.0), 34.0);
    }

    #[test]
    fn date_from_position_snaps_to_midnight() {
        let origin = at(1, 10) + TimeDelta::hours(15);
        assert_eq!(date_from_position(59.0, origin, 40.0), at(1, 11));
        assert_eq!(date_from_position(61.0, origin, 40.0), at(1, 12));
        assert_eq!(date_from_position(-40.0, origin, 40.0), at(1, 9));
    }

    #[test]
    fn zero_density_returns_view_start() {
        let origin = at(1, 10) + TimeDelta::hours(3);
        assert_eq!(date_from_position(500.0, origin, 0.0), origin);
        assert_eq!(date_from_position(f32::NAN, origin, 40.0), origin);
        assert_eq!(date_from_position(f32::MAX, origin, 1e-30), origin);
    }

    #[test]
    fn round_trip_is_within_one_day() {
        let origin = at(1, 1);
        for mode in ViewMode::ALL {
            let ppd = pixels_per_day(mode);
            for p in [-250.0_f32, -3.3, 0.0, 7.9, 123.4, 999.0, 4321.0] {
                let back = position(date_from_position(p, origin, ppd), origin, ppd);
                assert!((back - p).abs() <= ppd, "{mode}: {p} came back as {back}");
            }
        }
    }

    #[test]
    fn rects_fit_inside_their_row() {
        let row = RowId::new();
        let a = Task::new("A", row, at(1, 2), at(1, 6));
        let b = Task::new("B", row, at(2, 1), at(2, 3));
        let projection = Projection::new(at(1, 1), 40.0);
        let ra = projection.task_rect(&a, 3);
        let rb = projection.task_rect(&b, 3);
        assert_eq!(ra.top, rb.top);
        assert_eq!(ra.top, 3.0 * ROW_HEIGHT + TASK_TOP_INSET);
        assert!(ra.height <= ROW_HEIGHT);
        assert!(ra.top + ra.height <= 4.0 * ROW_HEIGHT);
        assert_eq!(ra.left, 40.0);
        assert_eq!(ra.width, 160.0);
        assert_eq!(ra.right(), 200.0);
    }

    #[test]
    fn milestone_rect_is_still_hit_testable() {
        let m = Task::new_milestone("Launch", RowId::new(), at(1, 5));
        let rect = task_rect(&m, at(1, 1), 3.9, 0);
        assert_eq!(rect.width, 1.0);
    }
}
