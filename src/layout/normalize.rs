//! Parent task normalization: validation, canonicalization and deduplication.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::fields::{
    bool_field, date_field, field, id_list_field, progress_field, text_field, END_KEYS, NAME_KEYS,
    START_KEYS,
};
use crate::model::task::{RiskLevel, TaskKind, TaskRecord};

/// Id of the milestone synthesized from the target date. Input records that
/// claim it are rejected, so it never collides with real data.
pub const TARGET_MILESTONE_ID: &str = "__timeline:target-date__";

/// Normalize a name into a comparison key: trimmed, whitespace collapsed,
/// lowercased, diacritics stripped.
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

struct Candidate {
    record: TaskRecord,
    has_id: bool,
    order: usize,
}

/// Parse one raw record. `None` for anything without a valid, ordered date range.
fn parse_task(record: &Map<String, Value>) -> Option<(TaskRecord, bool)> {
    let id = text_field(record, &["id"]);
    if id.as_deref() == Some(TARGET_MILESTONE_ID) {
        return None;
    }

    let kind = text_field(record, &["type", "kind"])
        .and_then(|t| TaskKind::parse(&t))
        .unwrap_or_else(|| {
            if bool_field(record, &["isMilestone", "milestone"]) {
                TaskKind::Milestone
            } else {
                TaskKind::Task
            }
        });

    let start = date_field(record, START_KEYS)?;
    let end = match date_field(record, END_KEYS) {
        Some(end) => end,
        // A milestone is a point in time; its end may be left out.
        None if kind == TaskKind::Milestone && field(record, END_KEYS).is_none() => start,
        None => return None,
    };
    if end < start {
        return None;
    }

    let name = text_field(record, NAME_KEYS).unwrap_or_default();
    let slug = slugify(&name);
    let risk_level = text_field(record, &["riskLevel", "risk_level", "risk"])
        .and_then(|r| RiskLevel::parse(&r));
    let risk_message = text_field(record, &["riskMessage", "risk_message"]);

    let has_id = id.is_some();
    let id = id.unwrap_or_else(|| derived_id(kind, &slug, start, end));

    Some((
        TaskRecord {
            id,
            name,
            start,
            end,
            kind,
            progress: progress_field(record),
            risk_level,
            risk_message,
            dependencies: id_list_field(record, &["dependencies"]),
            slug,
        },
        has_id,
    ))
}

fn derived_id(kind: TaskKind, slug: &str, start: NaiveDateTime, end: NaiveDateTime) -> String {
    let kind = match kind {
        TaskKind::Task => "task",
        TaskKind::Milestone => "milestone",
        TaskKind::ProjectBound => "project",
    };
    let slug = if slug.is_empty() { "untitled" } else { slug };
    format!(
        "auto:{kind}:{slug}:{}-{}",
        start.and_utc().timestamp_millis(),
        end.and_utc().timestamp_millis()
    )
}

/// `true` when `challenger` should replace `incumbent` for the same id.
fn prefers(challenger: &Candidate, incumbent: &Candidate) -> bool {
    let (a, b) = (&challenger.record, &incumbent.record);
    if a.start != b.start {
        return a.start < b.start;
    }
    let (a_slug, b_slug) = (!a.slug.is_empty(), !b.slug.is_empty());
    if a_slug != b_slug {
        return a_slug;
    }
    challenger.order < incumbent.order
}

fn by_start_then_id(a: &TaskRecord, b: &TaskRecord) -> Ordering {
    a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id))
}

/// Validate, canonicalize and deduplicate raw parent tasks, sorted by start
/// and then id.
///
/// When `target` is given and no milestone already falls on that day, a
/// milestone named `target_label` with id [`TARGET_MILESTONE_ID`] is added.
/// Dependencies are narrowed to ids present in the output.
pub fn normalize_tasks(
    raw: &[Value],
    target: Option<NaiveDateTime>,
    target_label: &str,
) -> Vec<TaskRecord> {
    let mut by_id: HashMap<String, Candidate> = HashMap::new();
    let mut by_shape: HashMap<(TaskKind, String, NaiveDateTime, NaiveDateTime), Candidate> =
        HashMap::new();
    let mut dropped = 0usize;

    for (order, value) in raw.iter().enumerate() {
        let Some((record, has_id)) = value.as_object().and_then(parse_task) else {
            dropped += 1;
            continue;
        };
        let candidate = Candidate { record, has_id, order };

        if candidate.has_id {
            match by_id.get(&candidate.record.id) {
                Some(incumbent) if !prefers(&candidate, incumbent) => {}
                _ => {
                    by_id.insert(candidate.record.id.clone(), candidate);
                }
            }
        } else {
            let key = (
                candidate.record.kind,
                candidate.record.slug.clone(),
                candidate.record.start,
                candidate.record.end,
            );
            by_shape.entry(key).or_insert(candidate);
        }
    }

    let mut tasks: Vec<TaskRecord> = by_id
        .into_values()
        .chain(by_shape.into_values())
        .map(|c| c.record)
        .collect();
    tasks.sort_by(by_start_then_id);

    if dropped > 0 {
        tracing::debug!(dropped, kept = tasks.len(), "dropped invalid task records");
    }

    if let Some(target) = target {
        let already_marked = tasks
            .iter()
            .any(|t| t.is_milestone() && t.start.date() == target.date());
        if !already_marked {
            tasks.push(TaskRecord {
                id: TARGET_MILESTONE_ID.to_string(),
                name: target_label.to_string(),
                start: target,
                end: target,
                kind: TaskKind::Milestone,
                progress: 0.0,
                risk_level: None,
                risk_message: None,
                dependencies: Vec::new(),
                slug: slugify(target_label),
            });
            tasks.sort_by(by_start_then_id);
        }
    }

    let live: HashSet<String> = tasks.iter().map(|t| t.id.clone()).collect();
    let mut dangling = 0usize;
    for task in &mut tasks {
        let before = task.dependencies.len();
        task.dependencies.retain(|dep| live.contains(dep));
        dangling += before - task.dependencies.len();
    }
    if dangling > 0 {
        tracing::debug!(dangling, "dropped dependencies on unknown tasks");
    }

    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    #[test]
    fn slug_strips_accents_and_spacing() {
        assert_eq!(slugify("  Reservar   Lugar de  Celebración "), "reservar lugar de celebracion");
        assert_eq!(slugify("Menú\tnupcial"), "menu nupcial");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn invalid_and_inverted_records_are_dropped() {
        let raw = vec![
            json!({"id": "a", "name": "ok", "start": "2025-01-01", "end": "2025-02-01"}),
            json!({"id": "b", "name": "inverted", "start": "2025-03-01", "end": "2025-02-01"}),
            json!({"id": "c", "name": "no end", "start": "2025-03-01"}),
            json!({"id": "d", "name": "garbage", "start": "soon", "end": "later"}),
            json!("not an object"),
        ];
        let tasks = normalize_tasks(&raw, None, "Wedding");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "a");
        assert!(tasks.iter().all(|t| t.end >= t.start));
    }

    #[test]
    fn alias_keys_are_understood() {
        let raw = vec![
            json!({
                "id": 7,
                "title": "Catering",
                "startDate": {"seconds": 1_735_689_600},
                "finish": 1_738_368_000_000i64,
                "riskLevel": "warning",
                "riskMessage": "Deposit overdue",
                "dependencies": "1, 2",
                "progress": "30"
            }),
            json!({"id": "1", "name": "Venue", "start": "2025-03-01", "end": "2025-03-02"}),
            json!({"id": "2", "name": "Guests", "start": "2025-03-01", "end": "2025-03-02"}),
        ];
        let tasks = normalize_tasks(&raw, None, "Wedding");
        let t = &tasks[0];
        assert_eq!(t.id, "7");
        assert_eq!(t.name, "Catering");
        assert_eq!(t.start, ymd(2025, 1, 1));
        assert_eq!(t.end, ymd(2025, 2, 1));
        assert_eq!(t.risk_level, Some(RiskLevel::Warning));
        assert_eq!(t.risk_message.as_deref(), Some("Deposit overdue"));
        assert_eq!(t.dependencies, vec!["1", "2"]);
        assert_eq!(t.progress, 30.0);
    }

    #[test]
    fn duplicate_ids_keep_the_earliest_start() {
        let raw = vec![
            json!({"id": "x", "name": "Late", "start": "2025-05-01", "end": "2025-06-01"}),
            json!({"id": "x", "name": "Early", "start": "2025-02-01", "end": "2025-06-01"}),
            json!({"id": "x", "name": "Middle", "start": "2025-03-01", "end": "2025-06-01"}),
        ];
        let tasks = normalize_tasks(&raw, None, "Wedding");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "Early");
        assert_eq!(tasks[0].start, ymd(2025, 2, 1));
    }

    #[test]
    fn duplicate_id_ties_prefer_a_named_record() {
        let raw = vec![
            json!({"id": "x", "start": "2025-02-01", "end": "2025-03-01"}),
            json!({"id": "x", "name": "Named", "start": "2025-02-01", "end": "2025-04-01"}),
        ];
        let tasks = normalize_tasks(&raw, None, "Wedding");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "Named");
    }

    #[test]
    fn id_less_records_dedupe_by_shape() {
        let raw = vec![
            json!({"name": "Send invitations", "start": "2025-02-01", "end": "2025-03-01"}),
            json!({"name": "  send   INVITATIONS ", "start": "2025-02-01", "end": "2025-03-01"}),
            json!({"name": "Send invitations", "start": "2025-02-01", "end": "2025-03-15"}),
        ];
        let tasks = normalize_tasks(&raw, None, "Wedding");
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.id.starts_with("auto:task:send invitations:")));
        assert_ne!(tasks[0].id, tasks[1].id);
    }

    #[test]
    fn output_is_sorted_by_start() {
        let raw = vec![
            json!({"id": "c", "name": "c", "start": "2025-03-01", "end": "2025-03-02"}),
            json!({"id": "a", "name": "a", "start": "2025-01-01", "end": "2025-03-02"}),
            json!({"id": "b", "name": "b", "start": "2025-02-01", "end": "2025-03-02"}),
        ];
        let ids: Vec<_> = normalize_tasks(&raw, None, "W").into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn equal_starts_are_ordered_by_id() {
        let raw = vec![
            json!({"id": "zeta", "name": "z", "start": "2025-01-01", "end": "2025-03-02"}),
            json!({"id": "alpha", "name": "a", "start": "2025-01-01", "end": "2025-02-02"}),
            json!({"id": "mid", "name": "m", "start": "2025-01-01", "end": "2025-01-02"}),
        ];
        let ids: Vec<_> = normalize_tasks(&raw, None, "W").into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);

        let target = ymd(2025, 1, 1);
        let ids: Vec<_> = normalize_tasks(&raw, Some(target), "W").into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TARGET_MILESTONE_ID, "alpha", "mid", "zeta"]);
    }

    #[test]
    fn dependencies_only_name_tasks_that_survive() {
        let raw = vec![
            json!({"id": "venue", "name": "Venue", "start": "2025-01-01", "end": "2025-02-01"}),
            json!({"id": "broken", "name": "Broken", "start": "2025-03-01", "end": "2025-02-01"}),
            json!({"id": "menu", "name": "Menu", "start": "2025-02-01", "end": "2025-03-01",
                   "dependencies": ["venue", "broken", "ghost"]}),
        ];
        let tasks = normalize_tasks(&raw, None, "W");
        let menu = tasks.iter().find(|t| t.id == "menu").unwrap();
        assert_eq!(menu.dependencies, vec!["venue"]);
    }

    #[test]
    fn milestone_type_comes_from_type_or_flag() {
        let raw = vec![
            json!({"id": "m1", "name": "m1", "type": "milestone", "start": "2025-01-01"}),
            json!({"id": "m2", "name": "m2", "isMilestone": true, "date": "2025-01-02"}),
            json!({"id": "p", "name": "p", "type": "project", "start": "2025-01-03", "end": "2025-02-01"}),
        ];
        let tasks = normalize_tasks(&raw, None, "W");
        assert_eq!(tasks[0].kind, TaskKind::Milestone);
        assert_eq!(tasks[0].end, tasks[0].start);
        assert_eq!(tasks[1].kind, TaskKind::Milestone);
        assert_eq!(tasks[2].kind, TaskKind::ProjectBound);
    }

    #[test]
    fn target_milestone_is_injected_once() {
        let target = ymd(2026, 9, 12);
        let tasks = normalize_tasks(&[], Some(target), "Wedding day");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, TARGET_MILESTONE_ID);
        assert_eq!(tasks[0].name, "Wedding day");
        assert!(tasks[0].is_milestone());

        let raw = vec![json!({
            "id": "w", "name": "Boda", "type": "milestone",
            "start": "2026-09-12T17:00:00"
        })];
        let tasks = normalize_tasks(&raw, Some(target), "Wedding day");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "w");
    }

    #[test]
    fn records_claiming_the_reserved_id_are_rejected() {
        let raw = vec![json!({
            "id": TARGET_MILESTONE_ID, "name": "impostor",
            "start": "2025-01-01", "end": "2025-01-02"
        })];
        assert!(normalize_tasks(&raw, None, "W").is_empty());
    }
}
