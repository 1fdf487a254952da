use std::collections::HashMap;

use super::coords::{TaskRect, ROW_HEIGHT};
use super::dependency::{self, DependencySegment};
use super::view::ViewState;
use crate::model::{Dataset, RowId, TaskId};

/// Vertical band of one row, for labels and row backgrounds.
#[derive(Debug, Clone, PartialEq)]
pub struct RowBand {
    pub row_id: RowId,
    pub label: String,
    pub index: usize,
    pub top: f32,
    pub height: f32,
}

/// Everything the renderer needs for one frame.
///
/// Built fresh from the dataset and view on each pass; nothing here outlives
/// the inputs it was computed from.
#[derive(Debug, Clone, Default)]
pub struct TimelineLayout {
    pub rows: Vec<RowBand>,
    pub tasks: HashMap<TaskId, TaskRect>,
    /// Task ids in paint order.
    pub order: Vec<TaskId>,
    pub segments: Vec<DependencySegment>,
    pub total_width: f32,
    pub total_height: f32,
}

impl TimelineLayout {
    pub fn compute(dataset: &Dataset, view: &ViewState) -> Self {
        let projection = view.projection();
        let mut layout = TimelineLayout {
            total_width: view.total_width(),
            total_height: dataset.rows.len() as f32 * ROW_HEIGHT,
            ..Default::default()
        };

        for (index, row) in dataset.rows.iter().enumerate() {
            layout.rows.push(RowBand {
                row_id: row.id,
                label: row.label.clone(),
                index,
                top: index as f32 * ROW_HEIGHT,
                height: ROW_HEIGHT,
            });
            for task in row.tasks.iter().filter_map(|id| dataset.task(*id)) {
                layout.tasks.insert(task.id, projection.task_rect(task, index));
                layout.order.push(task.id);
            }
        }

        layout.segments = dependency::segments(dataset.ordered_tasks(), &layout.tasks);
        layout
    }

    pub fn rect(&self, id: TaskId) -> Option<&TaskRect> {
        self.tasks.get(&id)
    }
}
