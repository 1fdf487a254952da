use std::collections::HashMap;

use super::coords::TaskRect;
use crate::model::{Task, TaskId};

/// Horizontal run out of the prerequisite before the connector turns.
pub const ELBOW_OFFSET: f32 = 15.0;

/// One dependency edge: from the prerequisite's rect to the dependent's rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DependencySegment {
    pub prerequisite: TaskId,
    pub dependent: TaskId,
    pub from: TaskRect,
    pub to: TaskRect,
}

/// Derive every drawable dependency edge.
///
/// Tasks without a rect, and dependency ids without a rect (deleted, unknown
/// or not laid out), produce no edge.
pub fn segments<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    coordinates: &HashMap<TaskId, TaskRect>,
) -> Vec<DependencySegment> {
    let mut out = Vec::new();
    for task in tasks {
        if task.dependencies.is_empty() {
            continue;
        }
        let Some(to) = coordinates.get(&task.id) else {
            continue;
        };
        for prerequisite in &task.dependencies {
            if let Some(from) = coordinates.get(prerequisite) {
                out.push(DependencySegment {
                    prerequisite: *prerequisite,
                    dependent: task.id,
                    from: *from,
                    to: *to,
                });
            }
        }
    }
    out
}

/// Orthogonal connector: right edge of the prerequisite, out by
/// [`ELBOW_OFFSET`], vertically to the dependent's middle, then across to its
/// left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElbowPath {
    pub points: [(f32, f32); 4],
}

impl ElbowPath {
    pub fn route(segment: &DependencySegment) -> Self {
        let start = (segment.from.right(), segment.from.center_y());
        let end = (segment.to.left, segment.to.center_y());
        let elbow_x = start.0 + ELBOW_OFFSET;
        Self {
            points: [start, (elbow_x, start.1), (elbow_x, end.1), end],
        }
    }

    pub fn end(&self) -> (f32, f32) {
        self.points[3]
    }

    /// Direction of the last leg: `1.0` pointing right, `-1.0` pointing left.
    pub fn arrow_direction(&self) -> f32 {
        if self.points[3].0 >= self.points[2].0 {
            1.0
        } else {
            -1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RowId;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn rect(left: f32, top: f32, width: f32) -> TaskRect {
        TaskRect {
            left,
            top,
            width,
            height: 32.0,
        }
    }

    #[test]
    fn emits_one_segment_per_resolvable_dependency() {
        let row = RowId::new();
        let a = Task::new("A", row, at(1), at(3));
        let b = Task::new("B", row, at(4), at(6));
        let c = Task::new("C", row, at(7), at(9)).depends_on(a.id).depends_on(b.id);
        let coords = HashMap::from([
            (a.id, rect(0.0, 8.0, 80.0)),
            (b.id, rect(120.0, 56.0, 80.0)),
            (c.id, rect(240.0, 104.0, 80.0)),
        ]);

        let edges = segments([&a, &b, &c], &coords);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].prerequisite, a.id);
        assert_eq!(edges[0].dependent, c.id);
        assert_eq!(edges[0].from, coords[&a.id]);
        assert_eq!(edges[0].to, coords[&c.id]);
        assert_eq!(edges[1].prerequisite, b.id);
    }

    #[test]
    fn dangling_dependencies_are_skipped() {
        let row = RowId::new();
        let b = Task::new("B", row, at(1), at(3));
        let a = Task::new("A", row, at(4), at(6)).depends_on(b.id);
        let ghost = Task::new("Ghost", row, at(1), at(2)).depends_on(TaskId::new());
        let coords = HashMap::from([(a.id, rect(0.0, 8.0, 40.0)), (ghost.id, rect(0.0, 56.0, 40.0))]);

        let edges = segments([&a, &b, &ghost], &coords);
        assert!(edges.iter().all(|e| e.prerequisite != b.id));
        assert!(edges.is_empty());
    }

    #[test]
    fn dependent_without_rect_produces_nothing() {
        let row = RowId::new();
        let b = Task::new("B", row, at(1), at(3));
        let a = Task::new("A", row, at(4), at(6)).depends_on(b.id);
        let coords = HashMap::from([(b.id, rect(0.0, 8.0, 40.0))]);
        assert!(segments([&a, &b], &coords).is_empty());
    }

    #[test]
    fn elbow_route_is_orthogonal() {
        let segment = DependencySegment {
            prerequisite: TaskId::new(),
            dependent: TaskId::new(),
            from: rect(10.0, 8.0, 100.0),
            to: rect(200.0, 56.0, 50.0),
        };
        let path = ElbowPath::route(&segment);
        assert_eq!(
            path.points,
            [(110.0, 24.0), (125.0, 24.0), (125.0, 72.0), (200.0, 72.0)]
        );
        for pair in path.points.windows(2) {
            let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
            assert!(x0 == x1 || y0 == y1);
        }
        assert_eq!(path.arrow_direction(), 1.0);
    }

    #[test]
    fn overlapping_dependent_arrow_points_left() {
        let segment = DependencySegment {
            prerequisite: TaskId::new(),
            dependent: TaskId::new(),
            from: rect(100.0, 8.0, 100.0),
            to: rect(150.0, 56.0, 50.0),
        };
        let path = ElbowPath::route(&segment);
        assert_eq!(path.end(), (150.0, 72.0));
        assert_eq!(path.arrow_direction(), -1.0);
    }
}
