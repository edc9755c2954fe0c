use chrono::NaiveDateTime;

use crate::model::{TaskRecord, TimelineWindow};

/// A zero-width vertical marker for a milestone.
#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneMarker {
    pub task_id: String,
    pub name: String,
    pub date: NaiveDateTime,
    pub x: f32,
}

/// Markers for every milestone inside the window, in chronological order.
pub fn milestone_markers(tasks: &[TaskRecord], window: &TimelineWindow) -> Vec<MilestoneMarker> {
    let mut markers: Vec<MilestoneMarker> = tasks
        .iter()
        .filter(|t| t.is_milestone() && window.contains(t.start))
        .map(|t| MilestoneMarker {
            task_id: t.id.clone(),
            name: t.name.clone(),
            date: t.start,
            x: window.x_for(t.start).max(0.0),
        })
        .collect();
    markers.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.task_id.cmp(&b.task_id)));
    markers
}

/// Offset of the "today" line, if today is inside the window.
pub fn today_marker(window: &TimelineWindow, today: NaiveDateTime) -> Option<f32> {
    window.contains(today).then(|| window.x_for(today).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimelineConfig;
    use crate::layout::normalize::normalize_tasks;
    use crate::model::ProjectBounds;
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    fn window() -> TimelineWindow {
        let bounds = ProjectBounds {
            project_start: Some(ymd(2025, 1, 1)),
            project_end: Some(ymd(2025, 9, 1)),
            ..Default::default()
        };
        TimelineWindow::compute(&bounds, &[], 2000.0, ymd(2025, 1, 1), &TimelineConfig::default())
    }

    #[test]
    fn only_milestones_in_bounds_sorted_by_date() {
        let tasks = normalize_tasks(
            &[
                json!({"id": "late", "name": "Invitations", "type": "milestone", "start": "2025-06-15"}),
                json!({"id": "early", "name": "Save the date", "type": "milestone", "start": "2025-02-01"}),
                json!({"id": "gone", "name": "Engagement", "type": "milestone", "start": "2024-06-01"}),
                json!({"id": "task", "name": "Venue", "start": "2025-03-01", "end": "2025-04-01"}),
            ],
            Some(ymd(2025, 9, 1)),
            "Wedding day",
        );
        let markers = milestone_markers(&tasks, &window());
        let ids: Vec<_> = markers.iter().map(|m| m.task_id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late", crate::layout::TARGET_MILESTONE_ID]);
        assert!((markers[0].x - 90.0).abs() < 1e-3);
    }

    #[test]
    fn today_marker_only_inside_bounds() {
        let w = window();
        assert!(today_marker(&w, ymd(2025, 3, 1)).is_some());
        assert_eq!(today_marker(&w, ymd(2030, 1, 1)), None);
    }
}
