pub mod format;
pub mod row_panel;
pub mod task_sidebar;
pub mod theme;
pub mod timeline_chart;
pub mod toolbar;
