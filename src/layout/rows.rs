use std::collections::BTreeSet;

use super::segment::SegmentMap;
use super::subtasks::SubtaskIndex;
use crate::model::TaskRecord;

/// Which parents and segments are currently expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ExpandState {
    pub parents: BTreeSet<String>,
    pub segments: BTreeSet<String>,
}

impl ExpandState {
    /// Every parent and segment in `segments` expanded.
    pub fn fully_expanded(segments: &SegmentMap) -> Self {
        Self {
            parents: segments.keys().cloned().collect(),
            segments: segments.values().flatten().map(|s| s.id.clone()).collect(),
        }
    }

    pub fn is_parent_expanded(&self, id: &str) -> bool {
        self.parents.contains(id)
    }

    pub fn is_segment_expanded(&self, id: &str) -> bool {
        self.segments.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty() && self.segments.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Parent,
    Segment,
    Subtask,
}

/// One line of the timeline. Its index in the row list is its vertical slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub kind: RowKind,
    /// Id of the task, segment or subtask this row shows.
    pub id: String,
    /// Nesting depth: 0 parent, 1 segment, 2 subtask.
    pub level: u8,
    pub parent_id: String,
    pub segment_id: Option<String>,
    pub label: String,
    /// Whether the row has children that an expand toggle would reveal.
    pub expandable: bool,
}

/// Flatten parents, segments and subtasks into display order.
///
/// Milestone tasks are drawn as markers and get no row.
pub fn flatten_rows(
    tasks: &[TaskRecord],
    segments: &SegmentMap,
    subtasks: &SubtaskIndex,
    expand: &ExpandState,
) -> Vec<Row> {
    let mut rows = Vec::new();

    for task in tasks.iter().filter(|t| !t.is_milestone()) {
        let parent_segments = segments.get(&task.id).map(Vec::as_slice).unwrap_or_default();
        rows.push(Row {
            kind: RowKind::Parent,
            id: task.id.clone(),
            level: 0,
            parent_id: task.id.clone(),
            segment_id: None,
            label: display_name(&task.name),
            expandable: !parent_segments.is_empty(),
        });
        if !expand.is_parent_expanded(&task.id) {
            continue;
        }

        let children = subtasks.get(&task.id).map(Vec::as_slice).unwrap_or_default();
        for (n, segment) in parent_segments.iter().enumerate() {
            rows.push(Row {
                kind: RowKind::Segment,
                id: segment.id.clone(),
                level: 1,
                parent_id: task.id.clone(),
                segment_id: Some(segment.id.clone()),
                label: format!("Block {} ({})", n + 1, segment.member_subtask_ids.len()),
                expandable: !segment.member_subtask_ids.is_empty(),
            });
            if !expand.is_segment_expanded(&segment.id) {
                continue;
            }
            // Index lists are start-sorted, so filtering keeps member order.
            for subtask in children
                .iter()
                .filter(|s| segment.member_subtask_ids.contains(&s.id))
            {
                rows.push(Row {
                    kind: RowKind::Subtask,
                    id: subtask.id.clone(),
                    level: 2,
                    parent_id: task.id.clone(),
                    segment_id: Some(segment.id.clone()),
                    label: display_name(&subtask.name),
                    expandable: false,
                });
            }
        }
    }

    rows
}

fn display_name(name: &str) -> String {
    if name.is_empty() {
        "Untitled".to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::segment::build_segments;
    use crate::layout::subtasks::index_subtasks;
    use crate::layout::normalize::normalize_tasks;
    use serde_json::json;

    fn fixture() -> (Vec<TaskRecord>, SubtaskIndex, SegmentMap) {
        let tasks = normalize_tasks(
            &[
                json!({"id": "venue", "name": "Venue", "start": "2025-01-01", "end": "2025-04-01"}),
                json!({"id": "music", "name": "Music", "start": "2025-02-01", "end": "2025-05-01"}),
                json!({"id": "m", "name": "Save the date", "type": "milestone", "start": "2025-03-01"}),
            ],
            None,
            "Wedding",
        );
        let index = index_subtasks(&[
            json!({"id": "v1", "parentId": "venue", "start": "2025-01-02", "end": "2025-01-04"}),
            json!({"id": "v2", "parentId": "venue", "start": "2025-01-06", "end": "2025-01-07"}),
            json!({"id": "v3", "parentId": "venue", "start": "2025-02-20", "end": "2025-02-22"}),
        ]);
        let segments = build_segments(&tasks, &index, 10);
        (tasks, index, segments)
    }

    #[test]
    fn collapsed_state_lists_only_parents() {
        let (tasks, index, segments) = fixture();
        let rows = flatten_rows(&tasks, &segments, &index, &ExpandState::default());
        let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["venue", "music"]);
        assert!(rows[0].expandable);
        assert!(!rows[1].expandable);
    }

    #[test]
    fn fully_expanded_state_lists_everything_in_order() {
        let (tasks, index, segments) = fixture();
        let expand = ExpandState::fully_expanded(&segments);
        let rows = flatten_rows(&tasks, &segments, &index, &expand);
        let shape: Vec<_> = rows.iter().map(|r| (r.level, r.id.as_str())).collect();
        assert_eq!(
            shape,
            vec![
                (0, "venue"),
                (1, "venue/seg0"),
                (2, "v1"),
                (2, "v2"),
                (1, "venue/seg1"),
                (2, "v3"),
                (0, "music"),
            ]
        );
    }

    #[test]
    fn segment_expansion_is_independent_of_other_segments() {
        let (tasks, index, segments) = fixture();
        let mut expand = ExpandState::default();
        expand.parents.insert("venue".into());
        expand.segments.insert("venue/seg1".into());
        let rows = flatten_rows(&tasks, &segments, &index, &expand);
        let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["venue", "venue/seg0", "venue/seg1", "v3", "music"]);
    }

    #[test]
    fn expanded_segment_under_collapsed_parent_stays_hidden() {
        let (tasks, index, segments) = fixture();
        let mut expand = ExpandState::default();
        expand.segments.insert("venue/seg0".into());
        let rows = flatten_rows(&tasks, &segments, &index, &expand);
        assert_eq!(rows.len(), 2);
    }
}
