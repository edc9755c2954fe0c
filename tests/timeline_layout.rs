use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::json;
use wedding_timeline::config::TimelineConfig;
use wedding_timeline::io::{load_snapshot, parse_csv, save_snapshot};
use wedding_timeline::layout::{
    compute_layout, BarKind, BarTarget, InteractionController, PreparedData, RowKind, ScrollCommand,
    Selection, TARGET_MILESTONE_ID,
};
use wedding_timeline::model::TimelineSnapshot;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
}

fn millis(y: i32, m: u32, d: u32) -> i64 {
    ymd(y, m, d).and_utc().timestamp_millis()
}

/// Tasks and subtasks in every date shape a producer might send.
fn mixed_snapshot() -> TimelineSnapshot {
    let mut snapshot = TimelineSnapshot::new("Ana & Joe");
    snapshot.tasks = vec![
        json!({"id": "venue", "name": "Venue", "start": "2025-01-01", "end": "2025-04-30", "riskLevel": "critical"}),
        json!({"id": "music", "title": "Music", "startDate": millis(2025, 2, 1), "endDate": millis(2025, 5, 1)}),
        json!({"id": "attire", "name": "Attire", "start": {"seconds": ymd(2025, 3, 1).and_utc().timestamp(), "nanoseconds": 0}, "end": "01/06/2025"}),
        json!({"id": "venue", "name": "Venue (late copy)", "start": "2025-02-01", "end": "2025-04-30"}),
        json!({"name": "No dates"}),
        json!({"name": "Reversed", "start": "2025-05-01", "end": "2025-01-01"}),
    ];
    snapshot.subtasks = vec![
        json!({"id": "v1", "parentId": "venue", "name": "Visit", "start": "2025-01-01", "end": "2025-01-03"}),
        json!({"id": "v2", "parentId": "venue", "name": "Shortlist", "start": "2025-01-05", "end": "2025-01-06"}),
        json!({"id": "v3", "parentId": "venue", "name": "Contract", "start": "2025-01-20", "end": "2025-01-22"}),
        json!({"id": "x1", "parentId": "ghost", "name": "Orphan", "start": "2025-01-20", "end": "2025-01-22"}),
    ];
    snapshot.bounds.project_start = json!("2025-01-01");
    snapshot.bounds.target_date = json!({"seconds": ymd(2025, 9, 13).and_utc().timestamp(), "nanoseconds": 0});
    snapshot
}

#[test]
fn mixed_inputs_normalize_into_a_clean_task_list() {
    let prepared = PreparedData::build(&mixed_snapshot(), &TimelineConfig::default(), 1);

    let ids: Vec<_> = prepared.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["venue", "music", "attire", TARGET_MILESTONE_ID]);
    assert!(prepared.tasks.iter().all(|t| t.end >= t.start));

    // Duplicate id keeps the earliest start.
    assert_eq!(prepared.task("venue").map(|t| t.start), Some(ymd(2025, 1, 1)));
    assert_eq!(prepared.task("attire").map(|t| t.end), Some(ymd(2025, 6, 1)));
    assert_eq!(prepared.task(TARGET_MILESTONE_ID).map(|t| t.start), Some(ymd(2025, 9, 13)));
}

#[test]
fn gap_segmentation_feeds_collapsed_bars() {
    let config = TimelineConfig::default();
    let prepared = PreparedData::build(&mixed_snapshot(), &config, 1);
    let segments = &prepared.segments["venue"];
    assert_eq!(segments.len(), 2);
    assert_eq!((segments[0].start, segments[0].end), (ymd(2025, 1, 1), ymd(2025, 1, 6)));
    assert_eq!((segments[1].start, segments[1].end), (ymd(2025, 1, 20), ymd(2025, 1, 22)));

    let controller = InteractionController::new();
    let layout = compute_layout(&prepared, controller.expand_state(), false, 1600.0, ymd(2025, 3, 1), &config);

    assert_eq!(layout.rows.len(), 3);
    assert!(layout.rows.iter().all(|r| r.kind == RowKind::Parent));
    let venue: Vec<_> = layout.bars_on_row(0).collect();
    assert_eq!(venue.len(), 2);
    assert!(venue.iter().all(|b| b.kind == BarKind::ParentSegment));
    assert!(venue.iter().all(|b| b.tooltip.as_deref().is_some_and(|t| t.starts_with("Venue"))));
    assert_eq!(layout.bars_on_row(1).next().map(|b| b.kind), Some(BarKind::Condensed));
    assert_eq!(layout.milestones.len(), 1);
}

#[test]
fn detail_mode_walkthrough() {
    let config = TimelineConfig::default();
    let prepared = PreparedData::build(&mixed_snapshot(), &config, 1);
    let mut controller = InteractionController::new();

    // Toggles are ignored until detail mode is on.
    assert!(!controller.toggle_parent("venue"));

    controller.set_detail_mode(true, &prepared.segments);
    let expanded = compute_layout(&prepared, controller.expand_state(), true, 1600.0, ymd(2025, 3, 1), &config);
    let shape: Vec<_> = expanded.rows.iter().map(|r| (r.level, r.id.as_str())).collect();
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
            (0, "attire"),
        ]
    );
    let span = expanded
        .bars
        .iter()
        .find(|b| b.kind == BarKind::ParentSpan && b.row_index == 0)
        .expect("venue span");
    assert!(!span.interactive);

    controller.toggle_segment("venue/seg0");
    let partly = compute_layout(&prepared, controller.expand_state(), true, 1600.0, ymd(2025, 3, 1), &config);
    assert_eq!(partly.rows.len(), 6);

    controller.set_detail_mode(false, &prepared.segments);
    let collapsed = compute_layout(&prepared, controller.expand_state(), false, 1600.0, ymd(2025, 3, 1), &config);
    assert_eq!(collapsed.rows.len(), 3);
}

#[test]
fn clicks_select_the_matching_records() {
    let config = TimelineConfig::default();
    let prepared = PreparedData::build(&mixed_snapshot(), &config, 1);
    let mut controller = InteractionController::new();
    controller.set_detail_mode(true, &prepared.segments);
    let layout = compute_layout(&prepared, controller.expand_state(), true, 1600.0, ymd(2025, 3, 1), &config);
    let mut selection: Option<Selection> = None;

    let subtask_bar = layout
        .bars
        .iter()
        .find(|b| matches!(&b.target, BarTarget::Subtask { subtask_id, .. } if subtask_id == "v3"))
        .expect("v3 bar");
    assert!(controller.handle_click(subtask_bar, &prepared.tasks, &prepared.subtasks, &mut selection));
    assert!(matches!(&selection, Some(Selection::Subtask(s)) if s.name == "Contract"));

    let segment_bar = layout
        .bars
        .iter()
        .find(|b| b.kind == BarKind::Segment)
        .expect("segment bar");
    assert!(controller.handle_click(segment_bar, &prepared.tasks, &prepared.subtasks, &mut selection));
    assert!(matches!(&selection, Some(Selection::Parent(t)) if t.id == "venue"));
}

#[test]
fn narrow_viewport_shrinks_then_scrolls_to_today_once() {
    let config = TimelineConfig::default();
    let mut snapshot = mixed_snapshot();
    snapshot.bounds.project_end = json!("2027-12-31");
    let prepared = PreparedData::build(&snapshot, &config, 1);
    let mut controller = InteractionController::new();
    let today = ymd(2026, 6, 1);

    let layout = compute_layout(&prepared, controller.expand_state(), false, 700.0, today, &config);
    assert_eq!(layout.window.shrink_factor, config.min_shrink);
    assert!(layout.window.overflow);

    let command = controller.auto_scroll(&layout.window, today);
    assert!(matches!(command, Some(ScrollCommand::CenterOn(x)) if x > 0.0));
    assert_eq!(controller.auto_scroll(&layout.window, today), None);

    // A wider viewport changes the overflow state and opens a new epoch.
    let wide = compute_layout(&prepared, controller.expand_state(), false, 20_000.0, today, &config);
    assert_eq!(controller.auto_scroll(&wide.window, today), Some(ScrollCommand::ResetToOrigin));
}

#[test]
fn csv_rows_flow_through_a_saved_snapshot() {
    let csv = "Task Name;Start Date;End Date;Parent;Status\n\
               Catering;01/02/2025;30/05/2025;;in progress\n\
               Tasting;10/02/2025;10/02/2025;Catering;done\n\
               Headcount;20/05/2025;25/05/2025;catering;\n";
    let imported = parse_csv(csv).unwrap();

    let mut snapshot = TimelineSnapshot::new("Imported");
    snapshot.tasks = imported.tasks;
    snapshot.subtasks = imported.subtasks;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("imported.timeline.json");
    save_snapshot(&snapshot, &path).unwrap();
    let reloaded = load_snapshot(&path).unwrap();

    let prepared = PreparedData::build(&reloaded, &TimelineConfig::default(), 1);
    assert_eq!(prepared.tasks.len(), 1);
    let catering = &prepared.tasks[0];
    assert_eq!(catering.progress, 50.0);
    assert_eq!(prepared.subtasks[&catering.id].len(), 2);
    assert_eq!(prepared.segments[&catering.id].len(), 2);
}
