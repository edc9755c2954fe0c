pub mod details;
pub mod dialogs;
pub mod row_list;
pub mod theme;
pub mod timeline_chart;
pub mod toolbar;
