use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use egui::Color32;
use serde::{Deserialize, Serialize};

use super::row::{Row, RowId};
use super::task::{Task, TaskId, TaskPatch};
use crate::timeline::MutationSink;

/// The dataset of record: ordered rows plus a task lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub rows: Vec<Row>,
    pub tasks: HashMap<TaskId, Task>,
}

impl Dataset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// Insert a task and append it to its row, if that row exists.
    pub fn insert_task(&mut self, task: Task) -> TaskId {
        let id = task.id;
        if let Some(row) = self.rows.iter_mut().find(|r| r.id == task.row_id) {
            if !row.tasks.contains(&id) {
                row.tasks.push(id);
            }
        }
        self.tasks.insert(id, task);
        id
    }

    /// Apply a partial update to a task. Returns false for unknown ids.
    pub fn apply_update(&mut self, id: TaskId, patch: &TaskPatch) -> bool {
        match self.tasks.get_mut(&id) {
            Some(task) => {
                task.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Tasks in display order: row by row, then by position within the row.
    /// Ids that do not resolve are skipped.
    pub fn ordered_tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.rows
            .iter()
            .flat_map(|row| row.tasks.iter())
            .filter_map(|id| self.tasks.get(id))
    }

    /// Span of all tasks widened by `padding_days` on each side.
    pub fn padded_range(&self, padding_days: i64) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let min = self.tasks.values().map(|t| t.start).min()?;
        let max = self.tasks.values().map(|t| t.end).max()?;
        let pad = TimeDelta::try_days(padding_days.max(0)).unwrap_or_default();
        let start = min.date().and_time(NaiveTime::MIN);
        let end = max.date().and_time(NaiveTime::MIN);
        Some((
            start.checked_sub_signed(pad).unwrap_or(start),
            end.checked_add_signed(pad).unwrap_or(end),
        ))
    }

    /// Generate a sample dataset anchored on `today`.
    pub fn sample(today: NaiveDate) -> Self {
        let day = |offset: i64| {
            (today + TimeDelta::days(offset)).and_time(NaiveTime::MIN)
        };
        let mut dataset = Dataset::new("Sample Project");

        let planning = Row::new("Planning");
        let design = Row::new("Design");
        let engineering = Row::new("Engineering");
        let qa = Row::new("QA & Release");
        let (planning_id, design_id, engineering_id, qa_id) =
            (planning.id, design.id, engineering.id, qa.id);
        dataset.rows = vec![planning, design, engineering, qa];

        let mut kickoff = Task::new("Project Kickoff", planning_id, day(-5), day(-2));
        kickoff.progress = 100.0;
        kickoff.color = Some(Color32::from_rgb(70, 130, 180));

        let mut requirements =
            Task::new("Requirements", planning_id, day(-2), day(5)).depends_on(kickoff.id);
        requirements.progress = 60.0;
        requirements.color = Some(Color32::from_rgb(60, 179, 113));
        requirements.assignee = Some("Dana".to_owned());

        let mut ui_design =
            Task::new("UI Design", design_id, day(6), day(18)).depends_on(requirements.id);
        ui_design.progress = 10.0;
        ui_design.color = Some(Color32::from_rgb(218, 112, 214));

        let mut backend =
            Task::new("Backend", engineering_id, day(6), day(28)).depends_on(requirements.id);
        backend.color = Some(Color32::from_rgb(106, 90, 205));
        backend.assignee = Some("Sam".to_owned());

        let mut testing = Task::new("Testing & QA", qa_id, day(22), day(30))
            .depends_on(ui_design.id)
            .depends_on(backend.id);
        testing.color = Some(Color32::from_rgb(220, 20, 60));

        let launch = Task::new_milestone("Launch", qa_id, day(32)).depends_on(testing.id);

        for task in [kickoff, requirements, ui_design, backend, testing, launch] {
            dataset.insert_task(task);
        }
        dataset
    }
}

impl MutationSink for Dataset {
    fn apply_update(&mut self, task: TaskId, patch: TaskPatch) {
        if !Dataset::apply_update(self, task, &patch) {
            tracing::warn!(?task, "update for unknown task dropped");
        }
    }
}
