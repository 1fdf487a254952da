use chrono::NaiveDateTime;

use crate::model::Task;

/// Screen-reader names for the resize handles.
pub const RESIZE_START_LABEL: &str = "Resize start date";
pub const RESIZE_END_LABEL: &str = "Resize end date";

/// Progress as a whole percentage, e.g. `"85%"`. Values outside 0..=100 are
/// clamped and NaN shows as `"0%"`.
pub fn format_progress(progress: f32) -> String {
    let clamped = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 100.0) };
    format!("{}%", clamped.round() as i32)
}

/// `MM/DD/YYYY`.
pub fn format_standard_date(date: NaiveDateTime) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// Inclusive day count shown next to a bar, e.g. `"5 days"`.
pub fn format_span(start: NaiveDateTime, end: NaiveDateTime) -> String {
    let days = (end.date() - start.date()).num_days() + 1;
    if days == 1 {
        "1 day".to_owned()
    } else {
        format!("{days} days")
    }
}

/// Accessible name of a bar or milestone, e.g.
/// `"Backend. Progress: 85%. Drag to move."`.
pub fn task_bar_label(task: &Task) -> String {
    format!("{}. Progress: {}. Drag to move.", task.title, format_progress(task.progress))
}
