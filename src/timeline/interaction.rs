//! Drag and resize gestures on task bars.
//!
//! Each pointer runs its own `Idle -> Dragging -> Idle` state machine. While a
//! pointer is dragging, the engine holds its [`PointerCapture`] so the host
//! keeps delivering move and release events for it even when the pointer
//! leaves the bar. Every exit path (`end`, `cancel_all`, dropping the engine)
//! releases the capture.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;

use super::coords::Projection;
use crate::model::{Task, TaskId, TaskPatch};

/// Minimum spacing between two evaluated move samples of one gesture.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

impl PointerId {
    /// The mouse, or the first touch.
    pub const PRIMARY: PointerId = PointerId(0);
}

/// What part of the task the gesture grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// The bar body: shift both dates, keep the duration.
    Move,
    /// The left handle: change the start date only.
    ResizeStart,
    /// The right handle: change the end date only.
    ResizeEnd,
}

/// State held for the lifetime of one gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub task: TaskId,
    pub kind: GestureKind,
    pub anchor_x: f32,
    pub original_start: NaiveDateTime,
    pub original_end: NaiveDateTime,
    last_evaluated: Option<Instant>,
}

impl DragSession {
    /// Dates the gesture proposes for pointer position `x`, or `None` when
    /// they would put the start after the end.
    fn propose(&self, x: f32, projection: &Projection) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let delta_x = x - self.anchor_x;
        let (start, end) = match self.kind {
            GestureKind::Move => {
                let start = projection.date_at(projection.x(self.original_start) + delta_x);
                let duration = self.original_end - self.original_start;
                (start, start.checked_add_signed(duration)?)
            }
            GestureKind::ResizeStart => (
                projection.date_at(projection.x(self.original_start) + delta_x),
                self.original_end,
            ),
            GestureKind::ResizeEnd => (
                self.original_start,
                projection.date_at(projection.x(self.original_end) + delta_x),
            ),
        };
        (start <= end).then_some((start, end))
    }

    fn patch(&self, start: NaiveDateTime, end: NaiveDateTime) -> TaskPatch {
        match self.kind {
            GestureKind::Move => TaskPatch::dates(start, end),
            GestureKind::ResizeStart => TaskPatch {
                start: Some(start),
                ..Default::default()
            },
            GestureKind::ResizeEnd => TaskPatch {
                end: Some(end),
                ..Default::default()
            },
        }
    }
}

/// Per-pointer view of the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState<'a> {
    Idle,
    Dragging(&'a DragSession),
}

/// What a pointer-move sample turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// The patch was handed to the sink.
    Applied(TaskPatch),
    /// Arrived inside the throttle window and was dropped.
    Throttled,
    /// Would have inverted the task; nothing was changed.
    Rejected,
    /// Degenerate projection (zero density).
    Ignored,
    /// No gesture is active for this pointer.
    Idle,
}

/// Receives every accepted date change.
pub trait MutationSink {
    fn apply_update(&mut self, task: TaskId, patch: TaskPatch);
}

impl<F> MutationSink for F
where
    F: FnMut(TaskId, TaskPatch),
{
    fn apply_update(&mut self, task: TaskId, patch: TaskPatch) {
        self(task, patch)
    }
}

/// Host hook for routing a pointer's events to the timeline while it drags.
pub trait PointerCapture {
    fn acquire(&mut self, pointer: PointerId);
    fn release(&mut self, pointer: PointerId);
}

/// Capture for hosts that already deliver every event to the engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn acquire(&mut self, _pointer: PointerId) {}
    fn release(&mut self, _pointer: PointerId) {}
}

pub struct InteractionEngine<C: PointerCapture = NoCapture> {
    sessions: HashMap<PointerId, DragSession>,
    throttle: Duration,
    capture: C,
}

impl Default for InteractionEngine<NoCapture> {
    fn default() -> Self {
        Self::new(NoCapture)
    }
}

impl<C: PointerCapture> InteractionEngine<C> {
    pub fn new(capture: C) -> Self {
        Self::with_throttle(capture, DEFAULT_THROTTLE)
    }

    pub fn with_throttle(capture: C, throttle: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            throttle,
            capture,
        }
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }

    pub fn throttle(&self) -> Duration {
        self.throttle
    }

    pub fn state(&self, pointer: PointerId) -> InteractionState<'_> {
        match self.sessions.get(&pointer) {
            Some(session) => InteractionState::Dragging(session),
            None => InteractionState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        !self.sessions.is_empty()
    }

    /// Whether any pointer is dragging `task`.
    pub fn is_dragging_task(&self, task: TaskId) -> bool {
        self.sessions.values().any(|s| s.task == task)
    }

    /// Begin a gesture on `task`. A pointer that is already dragging ends its
    /// previous gesture first, and so does any other pointer holding `task`:
    /// one task is edited by at most one gesture at a time.
    pub fn start(&mut self, pointer: PointerId, task: &Task, kind: GestureKind, anchor_x: f32) {
        let superseded: Vec<PointerId> = self
            .sessions
            .iter()
            .filter(|(other, session)| **other == pointer || session.task == task.id)
            .map(|(other, _)| *other)
            .collect();
        for other in superseded {
            self.end(other);
        }
        tracing::debug!(?pointer, task = ?task.id, ?kind, anchor_x, "drag started");
        self.capture.acquire(pointer);
        self.sessions.insert(
            pointer,
            DragSession {
                task: task.id,
                kind,
                anchor_x,
                original_start: task.start,
                original_end: task.end,
                last_evaluated: None,
            },
        );
    }

    /// Evaluate a pointer-move sample at horizontal position `x`.
    pub fn pointer_move(
        &mut self,
        pointer: PointerId,
        x: f32,
        now: Instant,
        projection: &Projection,
        sink: &mut impl MutationSink,
    ) -> MoveOutcome {
        let Some(session) = self.sessions.get_mut(&pointer) else {
            return MoveOutcome::Idle;
        };
        if let Some(last) = session.last_evaluated {
            if now.saturating_duration_since(last) < self.throttle {
                return MoveOutcome::Throttled;
            }
        }
        session.last_evaluated = Some(now);

        if projection.pixels_per_day == 0.0 {
            return MoveOutcome::Ignored;
        }
        match session.propose(x, projection) {
            Some((start, end)) => {
                let patch = session.patch(start, end);
                tracing::trace!(task = ?session.task, %start, %end, "drag update");
                sink.apply_update(session.task, patch.clone());
                MoveOutcome::Applied(patch)
            }
            None => {
                tracing::debug!(task = ?session.task, x, "drag sample would invert task, ignored");
                MoveOutcome::Rejected
            }
        }
    }

    /// Finish the pointer's gesture. Updates already applied stay applied.
    pub fn end(&mut self, pointer: PointerId) -> Option<DragSession> {
        let session = self.sessions.remove(&pointer)?;
        self.capture.release(pointer);
        tracing::debug!(?pointer, task = ?session.task, "drag ended");
        Some(session)
    }

    /// End every active gesture.
    pub fn cancel_all(&mut self) {
        let pointers: Vec<PointerId> = self.sessions.keys().copied().collect();
        for pointer in pointers {
            self.end(pointer);
        }
    }
}

impl<C: PointerCapture> Drop for InteractionEngine<C> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
