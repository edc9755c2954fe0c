use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::temporal::normalize_json;

/// Project-bound hints as they come from the profile store, in any temporal shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawBounds {
    pub project_start: Value,
    pub project_end: Value,
    pub registered_at: Value,
    pub target_date: Value,
}

impl RawBounds {
    pub fn resolve(&self) -> ProjectBounds {
        ProjectBounds {
            project_start: normalize_json(&self.project_start),
            project_end: normalize_json(&self.project_end),
            registered_at: normalize_json(&self.registered_at),
            target_date: normalize_json(&self.target_date),
        }
    }
}

/// Normalized project-bound hints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ProjectBounds {
    pub project_start: Option<NaiveDateTime>,
    pub project_end: Option<NaiveDateTime>,
    /// When the couple registered; fallback for the timeline start.
    pub registered_at: Option<NaiveDateTime>,
    /// The wedding date; fallback for the timeline end.
    pub target_date: Option<NaiveDateTime>,
}

/// Read-only snapshot of everything the timeline consumes.
///
/// Tasks and subtasks stay as raw JSON objects: their shape varies between
/// producers and is only resolved by the normalizers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSnapshot {
    pub name: String,
    pub tasks: Vec<Value>,
    pub subtasks: Vec<Value>,
    pub bounds: RawBounds,
}

impl Default for TimelineSnapshot {
    fn default() -> Self {
        Self {
            name: "Untitled Timeline".to_string(),
            tasks: Vec::new(),
            subtasks: Vec::new(),
            bounds: RawBounds::default(),
        }
    }
}

impl TimelineSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
