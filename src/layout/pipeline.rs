//! End-to-end layout: snapshot in, positioned rows, bars and markers out.
//!
//! [`PreparedData`] holds everything that only depends on the data. It is
//! rebuilt when a new snapshot arrives. [`compute_layout`] adds the parts
//! that depend on the viewport and the interaction state, and
//! [`LayoutMemo`] skips that step while none of its inputs moved.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::bars::{build_bars, Bar, BarContext};
use super::markers::{milestone_markers, today_marker, MilestoneMarker};
use super::normalize::normalize_tasks;
use super::rows::{flatten_rows, ExpandState, Row};
use super::segment::{build_segments, SegmentMap};
use super::subtasks::{index_subtasks, SubtaskIndex};
use crate::config::TimelineConfig;
use crate::model::{ProjectBounds, TaskRecord, TimelineSnapshot, TimelineWindow};

/// Normalized, indexed and segmented data for one snapshot revision.
#[derive(Debug, Clone, Default)]
pub struct PreparedData {
    pub tasks: Vec<TaskRecord>,
    pub subtasks: SubtaskIndex,
    pub segments: SegmentMap,
    pub bounds: ProjectBounds,
    /// Bumped by the owner on every data change; part of the memo key.
    pub revision: u64,
}

impl PreparedData {
    pub fn build(snapshot: &TimelineSnapshot, config: &TimelineConfig, revision: u64) -> Self {
        let bounds = snapshot.bounds.resolve();
        let tasks = normalize_tasks(&snapshot.tasks, bounds.target_date, &config.target_milestone_label);
        let subtasks = index_subtasks(&snapshot.subtasks);
        let segments = build_segments(&tasks, &subtasks, config.segment_gap_days);

        tracing::info!(
            name = %snapshot.name,
            tasks = tasks.len(),
            subtask_parents = subtasks.len(),
            revision,
            "prepared timeline data"
        );

        Self {
            tasks,
            subtasks,
            segments,
            bounds,
            revision,
        }
    }

    pub fn task(&self, id: &str) -> Option<&TaskRecord> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

/// Everything the viewer needs to paint one frame.
#[derive(Debug, Clone)]
pub struct TimelineLayout {
    pub window: TimelineWindow,
    pub rows: Vec<Row>,
    pub bars: Vec<Bar>,
    pub milestones: Vec<MilestoneMarker>,
    pub today_x: Option<f32>,
    /// Scrollable canvas size: `(width, height)` including the month header.
    pub canvas_size: (f32, f32),
}

impl TimelineLayout {
    /// Bars on one row, in emission order.
    pub fn bars_on_row(&self, row_index: usize) -> impl Iterator<Item = &Bar> {
        self.bars.iter().filter(move |b| b.row_index == row_index)
    }
}

pub fn compute_layout(
    prepared: &PreparedData,
    expand: &ExpandState,
    detail_mode: bool,
    viewport_width_px: f32,
    today: NaiveDateTime,
    config: &TimelineConfig,
) -> TimelineLayout {
    let window = TimelineWindow::compute(&prepared.bounds, &prepared.tasks, viewport_width_px, today, config);
    let rows = flatten_rows(&prepared.tasks, &prepared.segments, &prepared.subtasks, expand);
    let ctx = BarContext::new(
        &window,
        config,
        detail_mode,
        &prepared.tasks,
        &prepared.segments,
        &prepared.subtasks,
    );
    let bars = build_bars(&ctx, &rows);
    let milestones = milestone_markers(&prepared.tasks, &window);
    let today_x = today_marker(&window, today);
    let canvas_size = (
        window.total_width(),
        config.header_height_px + rows.len() as f32 * config.row_height_px,
    );

    TimelineLayout {
        window,
        rows,
        bars,
        milestones,
        today_x,
        canvas_size,
    }
}

#[derive(Debug, Clone, PartialEq)]
struct MemoKey {
    revision: u64,
    expand: ExpandState,
    detail_mode: bool,
    viewport_bits: u32,
    today: NaiveDate,
    config: TimelineConfig,
}

/// Caches the last [`TimelineLayout`] and recomputes only when an input changes.
///
/// `today` is compared by calendar date, so the layout is not rebuilt every
/// frame just because the clock ticked.
#[derive(Debug, Default)]
pub struct LayoutMemo {
    cached: Option<(MemoKey, TimelineLayout)>,
    misses: u64,
}

impl LayoutMemo {
    pub fn get(
        &mut self,
        prepared: &PreparedData,
        expand: &ExpandState,
        detail_mode: bool,
        viewport_width_px: f32,
        today: NaiveDateTime,
        config: &TimelineConfig,
    ) -> &TimelineLayout {
        // Half-pixel jitter in the reported width should not bust the cache.
        let viewport = (viewport_width_px * 2.0).round() / 2.0;
        let key = MemoKey {
            revision: prepared.revision,
            expand: expand.clone(),
            detail_mode,
            viewport_bits: viewport.to_bits(),
            today: today.date(),
            config: config.clone(),
        };

        let fresh = matches!(&self.cached, Some((cached, _)) if *cached == key);
        if !fresh {
            self.misses += 1;
            tracing::debug!(revision = prepared.revision, viewport, detail_mode, "layout cache miss");
            self.cached = None;
        }

        let (_, layout) = self.cached.get_or_insert_with(|| {
            let midnight = key.today.and_time(NaiveTime::MIN);
            let layout = compute_layout(prepared, expand, detail_mode, viewport, midnight, config);
            (key, layout)
        });
        layout
    }

    /// Number of recomputations so far.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
