//! The timeline engine: date/pixel geometry, zoom levels, drag gestures,
//! dependency edges, validation and scroll synchronisation. Nothing in here
//! touches egui; the `ui` module renders what it produces.

pub mod coords;
pub mod dependency;
pub mod interaction;
pub mod layout;
pub mod scale;
pub mod scroll;
pub mod validation;
pub mod view;

pub use coords::{Projection, TaskRect, ROW_HEIGHT, TASK_HEIGHT, TASK_TOP_INSET};
pub use dependency::{DependencySegment, ElbowPath};
pub use interaction::{
    GestureKind, InteractionEngine, InteractionState, MoveOutcome, MutationSink, PointerCapture,
    PointerId,
};
pub use layout::{RowBand, TimelineLayout};
pub use scale::{AxisColumn, TimeAxis, ViewMode};
pub use scroll::{PanelId, ScrollSync};
pub use validation::{validate_dependency_order, validate_task_update, Violation};
pub use view::ViewState;
