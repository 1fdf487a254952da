use chrono::NaiveDateTime;
use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::row::RowId;

/// Stable identity of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

/// A single task or milestone on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Percentage complete, 0 to 100.
    pub progress: f32,
    pub row_id: RowId,
    /// Tasks that must finish before this one may start.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    /// Display color override (stored as RGBA).
    #[serde(default, with = "color_serde")]
    pub color: Option<Color32>,
    /// Rendered as a diamond instead of a bar.
    #[serde(default)]
    pub is_milestone: bool,
    /// Person responsible, shown in the tooltip.
    #[serde(default)]
    pub assignee: Option<String>,
}

impl Task {
    /// Create a new task with sensible defaults.
    pub fn new(
        title: impl Into<String>,
        row_id: RowId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            start,
            end,
            progress: 0.0,
            row_id,
            dependencies: Vec::new(),
            color: None,
            is_milestone: false,
            assignee: None,
        }
    }

    /// Create a new milestone (zero duration).
    pub fn new_milestone(title: impl Into<String>, row_id: RowId, at: NaiveDateTime) -> Self {
        Self {
            is_milestone: true,
            ..Self::new(title, row_id, at, at)
        }
    }

    pub fn depends_on(mut self, prerequisite: TaskId) -> Self {
        self.dependencies.push(prerequisite);
        self
    }

    /// Apply a partial update. Absent fields are left untouched.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(start) = patch.start {
            self.start = start;
        }
        if let Some(end) = patch.end {
            self.end = end;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
    }
}

/// A proposed partial change to a task's editable fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub progress: Option<f32>,
}

impl TaskPatch {
    pub fn dates(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.start.is_none() && self.end.is_none() && self.progress.is_none()
    }
}

/// Serde helper for an optional `Color32`.
mod color_serde {
    use egui::Color32;
    use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(color: &Option<Color32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        color
            .map(|c| [c.r(), c.g(), c.b(), c.a()])
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Color32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rgba: Option<[u8; 4]> = Deserialize::deserialize(deserializer)?;
        Ok(rgba.map(|[r, g, b, a]| Color32::from_rgba_premultiplied(r, g, b, a)))
    }
}
