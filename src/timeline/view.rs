use chrono::NaiveDateTime;

use super::coords::Projection;
use super::scale::{self, TimeAxis, ViewMode};

const MS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// The zoom level and fixed visible range of one timeline instance.
///
/// Density and width are derived on every call so they can never disagree
/// with the current mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub view_mode: ViewMode,
    /// First visible instant.
    pub start: NaiveDateTime,
    /// Last visible instant (inclusive).
    pub end: NaiveDateTime,
}

impl ViewState {
    /// The range is taken as given; `start <= end` is the caller's concern.
    pub fn new(view_mode: ViewMode, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            view_mode,
            start,
            end,
        }
    }

    pub fn switch_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Zoom in one level (towards day).
    pub fn zoom_in(&mut self) {
        self.view_mode = self.view_mode.finer();
    }

    /// Zoom out one level (towards month).
    pub fn zoom_out(&mut self) {
        self.view_mode = self.view_mode.coarser();
    }

    pub fn pixels_per_day(&self) -> f32 {
        scale::pixels_per_day(self.view_mode)
    }

    pub fn total_days(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / MS_PER_DAY
    }

    /// Width of the whole range in pixels, never negative.
    pub fn total_width(&self) -> f32 {
        (self.total_days() * f64::from(self.pixels_per_day())).max(0.0) as f32
    }

    pub fn projection(&self) -> Projection {
        Projection::new(self.start, self.pixels_per_day())
    }

    pub fn axis(&self) -> TimeAxis {
        scale::axis_columns(self.start.date(), self.end.date(), self.view_mode)
    }
}
