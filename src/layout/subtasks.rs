use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::fields::{date_field, progress_field, text_field, END_KEYS, NAME_KEYS, PARENT_KEYS, START_KEYS};
use crate::model::SubtaskRecord;

/// Subtasks grouped by parent id, each list sorted by start.
pub type SubtaskIndex = BTreeMap<String, Vec<SubtaskRecord>>;

fn parse_subtask(index: usize, record: &Map<String, Value>) -> Option<SubtaskRecord> {
    let parent_id = text_field(record, PARENT_KEYS)?;
    let start = date_field(record, START_KEYS)?;
    let end = date_field(record, END_KEYS)?;
    if end < start {
        return None;
    }
    let id = text_field(record, &["id"]).unwrap_or_else(|| format!("{parent_id}#{index}"));
    Some(SubtaskRecord {
        id,
        name: text_field(record, NAME_KEYS).unwrap_or_default(),
        start,
        end,
        parent_id,
        progress: progress_field(record),
    })
}

/// Validate raw subtasks and group the survivors by parent.
///
/// Parents are not checked for existence here; orphans are filtered out
/// later, when segments are built for live parents only.
pub fn index_subtasks(raw: &[Value]) -> SubtaskIndex {
    let mut index = SubtaskIndex::new();
    let mut dropped = 0usize;

    for (i, value) in raw.iter().enumerate() {
        match value.as_object().and_then(|record| parse_subtask(i, record)) {
            Some(subtask) => index.entry(subtask.parent_id.clone()).or_default().push(subtask),
            None => dropped += 1,
        }
    }

    for list in index.values_mut() {
        list.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
    }

    if dropped > 0 {
        tracing::debug!(dropped, parents = index.len(), "dropped invalid subtask records");
    }
    index
}
