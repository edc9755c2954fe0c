//! Interaction state: detail mode, expand/collapse sets, click routing and
//! the one-shot scroll to today.
//!
//! This is the only mutable state in the layout engine. Layout functions
//! receive it by shared reference and never change it.

use chrono::NaiveDateTime;

use super::bars::{Bar, BarTarget};
use super::markers::today_marker;
use super::rows::ExpandState;
use super::segment::SegmentMap;
use super::subtasks::SubtaskIndex;
use crate::model::{SubtaskRecord, TaskRecord, TimelineWindow};

/// Receives selection events produced by clicks on bars.
pub trait SelectionSink {
    fn parent_selected(&mut self, task: &TaskRecord);
    fn subtask_selected(&mut self, subtask: &SubtaskRecord);
}

/// An owned selection, for callers that just want to remember the last click.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Parent(TaskRecord),
    Subtask(SubtaskRecord),
}

impl SelectionSink for Option<Selection> {
    fn parent_selected(&mut self, task: &TaskRecord) {
        *self = Some(Selection::Parent(task.clone()));
    }

    fn subtask_selected(&mut self, subtask: &SubtaskRecord) {
        *self = Some(Selection::Subtask(subtask.clone()));
    }
}

/// Where the horizontal scroll position should jump to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollCommand {
    CenterOn(f32),
    ResetToOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollEpoch {
    start: NaiveDateTime,
    end: NaiveDateTime,
    overflow: bool,
}

impl ScrollEpoch {
    fn of(window: &TimelineWindow) -> Self {
        Self {
            start: window.start,
            end: window.end,
            // Content only; the half-column lookahead alone never forces scrolling.
            overflow: window.overflow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollState {
    Pending,
    Done,
}

/// Fires one scroll command per `(start, end, overflow)` epoch.
#[derive(Debug, Clone, Default)]
pub struct AutoScrollGuard {
    epoch: Option<ScrollEpoch>,
    state: Option<ScrollState>,
}

impl AutoScrollGuard {
    /// Returns a command the first time it is polled within a new epoch.
    pub fn poll(&mut self, window: &TimelineWindow, today: NaiveDateTime) -> Option<ScrollCommand> {
        let epoch = ScrollEpoch::of(window);
        if self.epoch != Some(epoch) {
            self.epoch = Some(epoch);
            self.state = Some(ScrollState::Pending);
        }
        if self.state != Some(ScrollState::Pending) {
            return None;
        }
        self.state = Some(ScrollState::Done);

        let viewport = window.available_width_px;
        let command = match today_marker(window, today) {
            Some(x) if epoch.overflow => {
                let max_scroll = (window.total_width() - viewport).max(0.0);
                ScrollCommand::CenterOn((x - viewport / 2.0).clamp(0.0, max_scroll))
            }
            _ => ScrollCommand::ResetToOrigin,
        };
        tracing::debug!(?command, "auto-scroll");
        Some(command)
    }

    /// Forget the current epoch so the next poll fires again.
    pub fn rearm(&mut self) {
        self.epoch = None;
        self.state = None;
    }
}

/// Owns detail mode, expand/collapse sets and the auto-scroll guard.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    detail_mode: bool,
    expand: ExpandState,
    scroll: AutoScrollGuard,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detail_mode(&self) -> bool {
        self.detail_mode
    }

    pub fn expand_state(&self) -> &ExpandState {
        &self.expand
    }

    /// Switch detail mode. Turning it on expands everything in `segments`,
    /// turning it off collapses everything. Returns whether anything changed.
    pub fn set_detail_mode(&mut self, on: bool, segments: &SegmentMap) -> bool {
        if on == self.detail_mode {
            return false;
        }
        self.detail_mode = on;
        self.expand = if on {
            ExpandState::fully_expanded(segments)
        } else {
            ExpandState::default()
        };
        tracing::debug!(detail_mode = on, "detail mode toggled");
        true
    }

    /// Flip one parent. No effect outside detail mode.
    pub fn toggle_parent(&mut self, id: &str) -> bool {
        self.detail_mode && toggle(&mut self.expand.parents, id)
    }

    /// Flip one segment. No effect outside detail mode.
    pub fn toggle_segment(&mut self, id: &str) -> bool {
        self.detail_mode && toggle(&mut self.expand.segments, id)
    }

    /// Route a click on `bar` to the matching record. Returns whether a
    /// selection was delivered.
    pub fn handle_click(
        &self,
        bar: &Bar,
        tasks: &[TaskRecord],
        subtasks: &SubtaskIndex,
        sink: &mut dyn SelectionSink,
    ) -> bool {
        if !bar.interactive {
            return false;
        }
        match &bar.target {
            BarTarget::Parent(id) => match tasks.iter().find(|t| &t.id == id) {
                Some(task) => {
                    sink.parent_selected(task);
                    true
                }
                None => false,
            },
            BarTarget::Subtask { parent_id, subtask_id } => {
                let found = subtasks
                    .get(parent_id)
                    .and_then(|list| list.iter().find(|s| &s.id == subtask_id));
                match found {
                    Some(subtask) => {
                        sink.subtask_selected(subtask);
                        true
                    }
                    None => false,
                }
            }
            BarTarget::None => false,
        }
    }

    /// Poll the one-shot scroll guard for the current window.
    pub fn auto_scroll(&mut self, window: &TimelineWindow, today: NaiveDateTime) -> Option<ScrollCommand> {
        self.scroll.poll(window, today)
    }

    pub fn rearm_auto_scroll(&mut self) {
        self.scroll.rearm();
    }
}

fn toggle(set: &mut std::collections::BTreeSet<String>, id: &str) -> bool {
    if !set.remove(id) {
        set.insert(id.to_string());
    }
    true
}
