//! Pixel geometry for timeline rows.
//!
//! Each [`Row`] turns into zero or more [`Bar`]s. Parent rows have three
//! variants depending on detail mode and whether the parent has segments:
//!
//! | detail | segments | bars                                           |
//! |--------|----------|------------------------------------------------|
//! | off    | yes      | one `ParentSegment` per segment                |
//! | off    | no       | one `Condensed` over the whole parent          |
//! | on     | any      | hidden `ParentSpan` + the visible bars above   |
//!
//! Every bar is clipped to the window; bars entirely outside are omitted.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use super::rows::{Row, RowKind};
use super::segment::SegmentMap;
use super::subtasks::SubtaskIndex;
use crate::config::TimelineConfig;
use crate::model::task::clamp_progress;
use crate::model::{RiskLevel, Segment, SubtaskRecord, TaskRecord, TimelineWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarKind {
    /// A parent without subtasks, drawn as one bar.
    Condensed,
    /// One segment of a parent, drawn on the parent's row.
    ParentSegment,
    /// Invisible full-range backdrop of a parent in detail mode.
    ParentSpan,
    /// A segment on its own row.
    Segment,
    Subtask,
}

/// What a click on a bar selects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BarTarget {
    Parent(String),
    Subtask { parent_id: String, subtask_id: String },
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub key: String,
    pub row_index: usize,
    pub left: f32,
    pub width: f32,
    pub kind: BarKind,
    pub risk_level: Option<RiskLevel>,
    /// Clipped start and end dates.
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Percent complete, 0 to 100.
    pub progress: f32,
    pub visible: bool,
    pub interactive: bool,
    pub target: BarTarget,
    pub tooltip: Option<String>,
}

/// Lookup tables shared by every row of one layout pass.
pub struct BarContext<'a> {
    pub window: &'a TimelineWindow,
    pub config: &'a TimelineConfig,
    pub detail_mode: bool,
    tasks: HashMap<&'a str, &'a TaskRecord>,
    segments: &'a SegmentMap,
    /// Keyed by `(parent_id, subtask_id)`; subtask ids are only unique per parent.
    subtasks: HashMap<(&'a str, &'a str), &'a SubtaskRecord>,
}

impl<'a> BarContext<'a> {
    pub fn new(
        window: &'a TimelineWindow,
        config: &'a TimelineConfig,
        detail_mode: bool,
        tasks: &'a [TaskRecord],
        segments: &'a SegmentMap,
        index: &'a SubtaskIndex,
    ) -> Self {
        Self {
            window,
            config,
            detail_mode,
            tasks: tasks.iter().map(|t| (t.id.as_str(), t)).collect(),
            segments,
            subtasks: index
                .iter()
                .flat_map(|(parent_id, list)| list.iter().map(move |s| ((parent_id.as_str(), s.id.as_str()), s)))
                .collect(),
        }
    }

    fn segment(&self, parent_id: &str, segment_id: &str) -> Option<&'a Segment> {
        self.segments
            .get(parent_id)?
            .iter()
            .find(|s| s.id == segment_id)
    }

    /// Mean progress of a segment's members, or the parent's own progress
    /// when the segment has none.
    fn segment_progress(&self, segment: &Segment, parent: &TaskRecord) -> f32 {
        let members: Vec<f32> = segment
            .member_subtask_ids
            .iter()
            .filter_map(|id| self.subtasks.get(&(parent.id.as_str(), id.as_str())))
            .map(|s| s.progress)
            .collect();
        if members.is_empty() {
            return clamp_progress(parent.progress);
        }
        clamp_progress(members.iter().sum::<f32>() / members.len() as f32)
    }

    /// Horizontal placement of a clipped range: `(left, width)`.
    fn place(&self, start: NaiveDateTime, end: NaiveDateTime) -> (f32, f32) {
        let left = self.window.x_for(start).max(0.0);
        let right = self.window.x_for(end);
        let width = (right - left + self.config.bar_padding_px).max(self.config.min_bar_width_px);
        (left, width.max(0.0))
    }
}

struct BarSpec {
    key: String,
    kind: BarKind,
    start: NaiveDateTime,
    end: NaiveDateTime,
    progress: f32,
    risk_level: Option<RiskLevel>,
    target: BarTarget,
    tooltip: Option<String>,
}

fn emit(ctx: &BarContext<'_>, row_index: usize, spec: BarSpec, out: &mut Vec<Bar>) {
    let Some((start, end)) = ctx.window.clip(spec.start, spec.end) else {
        return;
    };
    let (left, width) = ctx.place(start, end);
    let hidden = spec.kind == BarKind::ParentSpan;
    out.push(Bar {
        key: spec.key,
        row_index,
        left,
        width,
        kind: spec.kind,
        risk_level: spec.risk_level,
        start,
        end,
        progress: clamp_progress(spec.progress),
        visible: !hidden,
        interactive: !hidden,
        target: spec.target,
        tooltip: spec.tooltip,
    });
}

/// Tooltip text: name, period and (when present) the risk message.
pub fn tooltip(name: &str, start: NaiveDateTime, end: NaiveDateTime, risk_message: Option<&str>) -> String {
    let mut text = format!(
        "{}\n{} → {}",
        if name.is_empty() { "Untitled" } else { name },
        start.format("%d/%m/%Y"),
        end.format("%d/%m/%Y")
    );
    if let Some(message) = risk_message.filter(|m| !m.is_empty()) {
        text.push('\n');
        text.push_str(message);
    }
    text
}

fn parent_bars(ctx: &BarContext<'_>, row_index: usize, parent: &TaskRecord, out: &mut Vec<Bar>) {
    let segments = ctx
        .segments
        .get(&parent.id)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let parent_tooltip = tooltip(&parent.name, parent.start, parent.end, parent.risk_message.as_deref());

    if ctx.detail_mode {
        emit(
            ctx,
            row_index,
            BarSpec {
                key: format!("{}:span", parent.id),
                kind: BarKind::ParentSpan,
                start: parent.start,
                end: parent.end,
                progress: parent.progress,
                risk_level: parent.risk_level,
                target: BarTarget::None,
                tooltip: None,
            },
            out,
        );
    }

    if segments.is_empty() {
        emit(
            ctx,
            row_index,
            BarSpec {
                key: format!("{}:condensed", parent.id),
                kind: BarKind::Condensed,
                start: parent.start,
                end: parent.end,
                progress: parent.progress,
                risk_level: parent.risk_level,
                target: BarTarget::Parent(parent.id.clone()),
                tooltip: Some(parent_tooltip),
            },
            out,
        );
        return;
    }

    for segment in segments {
        emit(
            ctx,
            row_index,
            BarSpec {
                key: format!("{}:parent", segment.id),
                kind: BarKind::ParentSegment,
                start: segment.start,
                end: segment.end,
                progress: ctx.segment_progress(segment, parent),
                risk_level: parent.risk_level,
                target: BarTarget::Parent(parent.id.clone()),
                tooltip: Some(parent_tooltip.clone()),
            },
            out,
        );
    }
}

/// Bars for one row.
pub fn build_row_bars(ctx: &BarContext<'_>, row_index: usize, row: &Row, out: &mut Vec<Bar>) {
    let Some(parent) = ctx.tasks.get(row.parent_id.as_str()).copied() else {
        return;
    };

    match row.kind {
        RowKind::Parent => parent_bars(ctx, row_index, parent, out),
        RowKind::Segment => {
            let Some(segment) = ctx.segment(&parent.id, &row.id) else {
                return;
            };
            emit(
                ctx,
                row_index,
                BarSpec {
                    key: format!("{}:row", segment.id),
                    kind: BarKind::Segment,
                    start: segment.start,
                    end: segment.end,
                    progress: ctx.segment_progress(segment, parent),
                    risk_level: parent.risk_level,
                    target: BarTarget::Parent(parent.id.clone()),
                    tooltip: Some(tooltip(
                        &parent.name,
                        segment.start,
                        segment.end,
                        parent.risk_message.as_deref(),
                    )),
                },
                out,
            );
        }
        RowKind::Subtask => {
            let Some(subtask) = ctx.subtasks.get(&(parent.id.as_str(), row.id.as_str())).copied() else {
                return;
            };
            emit(
                ctx,
                row_index,
                BarSpec {
                    key: format!("{}/{}:subtask", parent.id, subtask.id),
                    kind: BarKind::Subtask,
                    start: subtask.start,
                    end: subtask.end,
                    progress: subtask.progress,
                    risk_level: None,
                    target: BarTarget::Subtask {
                        parent_id: parent.id.clone(),
                        subtask_id: subtask.id.clone(),
                    },
                    tooltip: Some(tooltip(&subtask.name, subtask.start, subtask.end, None)),
                },
                out,
            );
        }
    }
}

/// Bars for every row, in row order.
pub fn build_bars(ctx: &BarContext<'_>, rows: &[Row]) -> Vec<Bar> {
    let mut bars = Vec::with_capacity(rows.len() * 2);
    for (row_index, row) in rows.iter().enumerate() {
        build_row_bars(ctx, row_index, row, &mut bars);
    }
    bars
}
