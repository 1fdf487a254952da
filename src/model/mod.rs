pub mod dataset;
pub mod row;
pub mod task;

pub use dataset::Dataset;
pub use row::{Row, RowId};
pub use task::{Task, TaskId, TaskPatch};
