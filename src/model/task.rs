use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// What a parent task represents on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    Task,
    Milestone,
    ProjectBound,
}

impl TaskKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "task" => Some(TaskKind::Task),
            "milestone" => Some(TaskKind::Milestone),
            "project" | "project-bound" | "projectbound" | "project_bound" => {
                Some(TaskKind::ProjectBound)
            }
            _ => None,
        }
    }
}

/// Externally computed risk classification. Only consumed for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Ok,
    Warning,
    Critical,
}

impl RiskLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ok" | "low" | "none" => Some(RiskLevel::Ok),
            "warning" | "warn" | "medium" => Some(RiskLevel::Warning),
            "critical" | "high" | "danger" => Some(RiskLevel::Critical),
            _ => None,
        }
    }
}

/// A normalized long-running task (or milestone).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub kind: TaskKind,
    /// Percent complete, 0 to 100.
    pub progress: f32,
    pub risk_level: Option<RiskLevel>,
    pub risk_message: Option<String>,
    pub dependencies: Vec<String>,
    /// Normalized name, used as identity when a record has no id.
    pub slug: String,
}

impl TaskRecord {
    pub fn is_milestone(&self) -> bool {
        self.kind == TaskKind::Milestone
    }
}

/// A normalized short-lived subtask hanging off a parent task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtaskRecord {
    pub id: String,
    pub name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub parent_id: String,
    /// Percent complete, 0 to 100.
    pub progress: f32,
}

/// A contiguous run of time-adjacent subtasks under one parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub parent_id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Member subtask ids in start order.
    pub member_subtask_ids: Vec<String>,
}

/// Clamp a progress value into `[0, 100]`, mapping NaN to 0.
pub fn clamp_progress(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
