use chrono::NaiveDateTime;
use thiserror::Error;

use crate::model::{Task, TaskId, TaskPatch};

/// A broken domain rule. `Display` yields the message shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("The start date cannot be after the end date.")]
    StartAfterEnd,
    #[error("Task title cannot be empty.")]
    EmptyTitle,
    #[error("Progress must be between 0 and 100.")]
    ProgressOutOfRange,
    #[error("Dependency violation: task starts before prerequisite \"{prerequisite}\" finishes.")]
    DependencyOrder {
        prerequisite: String,
        prerequisite_id: TaskId,
    },
}

/// Check `patch` against `task` using the default rule set.
///
/// Fields absent from the patch keep the task's current value. Every rule is
/// checked, so one call can report several violations.
pub fn validate_task_update(task: &Task, patch: &TaskPatch) -> Vec<Violation> {
    let mut violations = Vec::new();

    let start = patch.start.unwrap_or(task.start);
    let end = patch.end.unwrap_or(task.end);
    let title = patch.title.as_deref().unwrap_or(&task.title);
    let progress = patch.progress.unwrap_or(task.progress);

    if start > end {
        violations.push(Violation::StartAfterEnd);
    }
    if title.trim().is_empty() {
        violations.push(Violation::EmptyTitle);
    }
    if !(0.0..=100.0).contains(&progress) {
        violations.push(Violation::ProgressOutOfRange);
    }
    violations
}

/// True when the dependent starts on or after the day the prerequisite ends.
/// Only calendar days are compared, so same-day hand-off is allowed.
pub fn validate_dependency_order(prerequisite_end: NaiveDateTime, dependent_start: NaiveDateTime) -> bool {
    dependent_start.date() >= prerequisite_end.date()
}

/// Run the dependency-order rule for every prerequisite of `task` that
/// `lookup` can resolve, using the patched start date.
///
/// Not part of [`validate_task_update`]; callers opt in.
pub fn dependency_violations<'a>(
    task: &Task,
    patch: &TaskPatch,
    lookup: impl Fn(TaskId) -> Option<&'a Task>,
) -> Vec<Violation> {
    let start = patch.start.unwrap_or(task.start);
    task.dependencies
        .iter()
        .filter_map(|id| lookup(*id))
        .filter(|prerequisite| !validate_dependency_order(prerequisite.end, start))
        .map(|prerequisite| Violation::DependencyOrder {
            prerequisite: prerequisite.title.clone(),
            prerequisite_id: prerequisite.id,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dataset, RowId};
    use chrono::{NaiveDate, TimeDelta};
    use pretty_assertions::assert_eq;

    fn at(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn task() -> Task {
        let mut t = Task::new("Write docs", RowId::new(), at(5), at(10));
        t.progress = 50.0;
        t
    }

    #[test]
    fn valid_patch_has_no_violations() {
        let patch = TaskPatch {
            title: Some("Write more docs".into()),
            progress: Some(100.0),
            ..Default::default()
        };
        assert!(validate_task_update(&task(), &patch).is_empty());
        assert!(validate_task_update(&task(), &TaskPatch::default()).is_empty());
    }

    #[test]
    fn all_rules_fire_together() {
        let patch = TaskPatch {
            title: Some("   ".into()),
            start: Some(at(10)),
            end: Some(at(5)),
            progress: Some(150.0),
        };
        let violations = validate_task_update(&task(), &patch);
        assert_eq!(
            violations,
            vec![
                Violation::StartAfterEnd,
                Violation::EmptyTitle,
                Violation::ProgressOutOfRange,
            ]
        );
        let messages: Vec<String> = violations.iter().map(ToString::to_string).collect();
        assert_eq!(messages[1], "Task title cannot be empty.");
    }

    #[test]
    fn partial_patch_is_checked_against_existing_fields() {
        let patch = TaskPatch {
            start: Some(at(11)),
            ..Default::default()
        };
        assert_eq!(validate_task_update(&task(), &patch), vec![Violation::StartAfterEnd]);
    }

    #[test]
    fn negative_and_nan_progress_are_out_of_range() {
        for progress in [-0.5, f32::NAN] {
            let patch = TaskPatch {
                progress: Some(progress),
                ..Default::default()
            };
            assert_eq!(validate_task_update(&task(), &patch), vec![Violation::ProgressOutOfRange]);
        }
    }

    #[test]
    fn validation_does_not_mutate() {
        let original = task();
        let copy = original.clone();
        let _ = validate_task_update(
            &original,
            &TaskPatch {
                title: Some(String::new()),
                ..Default::default()
            },
        );
        assert_eq!(original, copy);
    }

    #[test]
    fn dependency_order_compares_calendar_days() {
        assert!(validate_dependency_order(at(10), at(10)));
        assert!(!validate_dependency_order(at(10), at(9)));
        assert!(validate_dependency_order(at(10) + TimeDelta::hours(18), at(10) + TimeDelta::hours(2)));
        assert!(validate_dependency_order(at(10), at(12)));
    }

    #[test]
    fn dependency_violations_name_the_prerequisite() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let dataset = Dataset::sample(today);
        let testing = dataset
            .tasks
            .values()
            .find(|t| t.title == "Testing & QA")
            .unwrap();
        let lookup = |id| dataset.task(id);

        // Backend runs past the day testing starts; UI Design does not.
        let found = dependency_violations(testing, &TaskPatch::default(), lookup);
        assert_eq!(found.len(), 1);

        let late_start = TaskPatch {
            start: Some(today.and_hms_opt(0, 0, 0).unwrap() + TimeDelta::days(28)),
            ..Default::default()
        };
        assert!(dependency_violations(testing, &late_start, lookup).is_empty());
        assert!(found
            .iter()
            .any(|v| v.to_string().contains("\"Backend\"")));
    }
}
