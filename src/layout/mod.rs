//! The timeline layout engine.
//!
//! Raw task and subtask records go in, positioned rows, bars and markers
//! come out. Everything here is synchronous and free of I/O; the only
//! mutable state lives in [`InteractionController`].

pub mod bars;
pub mod fields;
pub mod interaction;
pub mod markers;
pub mod normalize;
pub mod pipeline;
pub mod rows;
pub mod segment;
pub mod subtasks;

pub use bars::{Bar, BarKind, BarTarget};
pub use interaction::{AutoScrollGuard, InteractionController, ScrollCommand, Selection, SelectionSink};
pub use markers::MilestoneMarker;
pub use normalize::{normalize_tasks, TARGET_MILESTONE_ID};
pub use pipeline::{compute_layout, LayoutMemo, PreparedData, TimelineLayout};
pub use rows::{ExpandState, Row, RowKind};
pub use segment::SegmentMap;
pub use subtasks::SubtaskIndex;
