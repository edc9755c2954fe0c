//! Timeline settings, persisted as JSON in the OS config directory.
//!
//! Every field carries `#[serde(default)]`, so a partial file is valid and a
//! missing file simply yields the built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_NAME: &str = "WeddingTimeline";
const CONFIG_FILE: &str = "config.json";

/// Bounds for the requested month column width.
pub const MIN_COLUMN_WIDTH_PX: f32 = 20.0;
pub const MAX_COLUMN_WIDTH_PX: f32 = 400.0;
const ZOOM_STEP: f32 = 1.2;
/// Upper bound for month offsets, a century.
const MAX_SPAN_MONTHS: i32 = 1200;

/// Layout knobs for the timeline engine and viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Requested width of one month column before shrink-to-fit.
    pub column_width_px: f32,
    /// Lower bound for the shrink factor; below it the timeline scrolls instead.
    pub min_shrink: f32,
    /// Width reserved for the row label panel and margins.
    pub side_panel_width_px: f32,
    pub row_height_px: f32,
    pub header_height_px: f32,
    /// Subtasks further apart than this many days start a new segment.
    pub segment_gap_days: i64,
    /// Months appended after the project end / target date.
    pub extension_months: i32,
    /// Span used when no end bound is known.
    pub default_span_months: i32,
    pub min_bar_width_px: f32,
    pub bar_padding_px: f32,
    /// Label for the milestone synthesized from the target date.
    pub target_milestone_label: String,
    /// Whether the viewer opens with detail mode on.
    pub detail_mode: bool,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            column_width_px: 90.0,
            min_shrink: 0.2,
            side_panel_width_px: 120.0,
            row_height_px: 32.0,
            header_height_px: 44.0,
            segment_gap_days: 10,
            extension_months: 1,
            default_span_months: 24,
            min_bar_width_px: 4.0,
            bar_padding_px: 0.0,
            target_milestone_label: "Wedding day".into(),
            detail_mode: false,
        }
    }
}

impl TimelineConfig {
    /// Load from the default location, falling back to defaults on any problem.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable timeline config");
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json)?;
        Ok(config.sanitized())
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Widen the requested month column.
    pub fn zoom_in(&mut self) {
        self.column_width_px = (self.column_width_px * ZOOM_STEP).min(MAX_COLUMN_WIDTH_PX);
    }

    /// Narrow the requested month column.
    pub fn zoom_out(&mut self) {
        self.column_width_px = (self.column_width_px / ZOOM_STEP).max(MIN_COLUMN_WIDTH_PX);
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", APP_NAME)
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Clamp every field into a range the layout engine can work with.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.column_width_px.is_finite() && self.column_width_px > 0.0) {
            self.column_width_px = defaults.column_width_px;
        }
        self.column_width_px = self.column_width_px.clamp(MIN_COLUMN_WIDTH_PX, MAX_COLUMN_WIDTH_PX);
        if !(self.min_shrink.is_finite() && self.min_shrink > 0.0) {
            self.min_shrink = defaults.min_shrink;
        }
        self.min_shrink = self.min_shrink.min(1.0);
        if !(self.side_panel_width_px.is_finite() && self.side_panel_width_px >= 0.0) {
            self.side_panel_width_px = defaults.side_panel_width_px;
        }
        if !(self.row_height_px.is_finite() && self.row_height_px > 0.0) {
            self.row_height_px = defaults.row_height_px;
        }
        if !(self.header_height_px.is_finite() && self.header_height_px >= 0.0) {
            self.header_height_px = defaults.header_height_px;
        }
        self.segment_gap_days = self.segment_gap_days.max(0);
        self.extension_months = self.extension_months.clamp(0, MAX_SPAN_MONTHS);
        if self.default_span_months <= 0 {
            self.default_span_months = defaults.default_span_months;
        }
        self.default_span_months = self.default_span_months.min(MAX_SPAN_MONTHS);
        if !(self.min_bar_width_px.is_finite() && self.min_bar_width_px >= 0.0) {
            self.min_bar_width_px = defaults.min_bar_width_px;
        }
        if !(self.bar_padding_px.is_finite() && self.bar_padding_px >= 0.0) {
            self.bar_padding_px = defaults.bar_padding_px;
        }
        if self.target_milestone_label.trim().is_empty() {
            self.target_milestone_label = defaults.target_milestone_label;
        }
        self
    }
}
