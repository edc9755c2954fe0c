pub mod project;
pub mod task;
pub mod temporal;
pub mod timeline;

pub use project::{ProjectBounds, RawBounds, TimelineSnapshot};
pub use task::{RiskLevel, Segment, SubtaskRecord, TaskKind, TaskRecord};
pub use temporal::TemporalValue;
pub use timeline::TimelineWindow;
