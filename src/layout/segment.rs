use std::collections::HashMap;

use super::subtasks::SubtaskIndex;
use crate::model::temporal::whole_days_between;
use crate::model::{Segment, SubtaskRecord, TaskRecord};

/// Segments per parent id, in time order.
pub type SegmentMap = HashMap<String, Vec<Segment>>;

/// Merge a parent's start-sorted subtasks into contiguous segments.
///
/// A subtask starting more than `gap_days` whole days after the running
/// segment's end opens a new segment; anything closer (or overlapping)
/// extends it.
pub fn segment_subtasks(parent_id: &str, subtasks: &[SubtaskRecord], gap_days: i64) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();

    for subtask in subtasks {
        if let Some(current) = segments.last_mut() {
            if whole_days_between(current.end, subtask.start) <= gap_days {
                current.end = current.end.max(subtask.end);
                current.member_subtask_ids.push(subtask.id.clone());
                continue;
            }
        }
        segments.push(Segment {
            id: format!("{parent_id}/seg{}", segments.len()),
            parent_id: parent_id.to_string(),
            start: subtask.start,
            end: subtask.end,
            member_subtask_ids: vec![subtask.id.clone()],
        });
    }

    segments
}

/// Build segments for every live parent. Subtasks whose parent is not in
/// `tasks` are left out entirely.
pub fn build_segments(tasks: &[TaskRecord], index: &SubtaskIndex, gap_days: i64) -> SegmentMap {
    let mut map = SegmentMap::with_capacity(tasks.len());
    for task in tasks {
        let segments = index
            .get(&task.id)
            .map(|subtasks| segment_subtasks(&task.id, subtasks, gap_days))
            .unwrap_or_default();
        map.insert(task.id.clone(), segments);
    }

    let orphans: usize = index
        .iter()
        .filter(|(parent, _)| !map.contains_key(*parent))
        .map(|(_, subs)| subs.len())
        .sum();
    if orphans > 0 {
        tracing::debug!(orphans, "subtasks without a live parent excluded from segmentation");
    }
    map
}
